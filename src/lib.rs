//! This crate compiles a XOR-shift pseudo-random generator with cycle detection into the
//! transition table of a single-tape Turing machine, and runs it.
//! It includes modules for synthesizing transition-table fragments, composing them into a
//! program, analyzing the result, executing it and rendering its state graph.

pub mod analyzer;
pub mod graph;
pub mod layout;
pub mod loader;
pub mod machine;
pub mod orchestrator;
pub mod presets;
pub mod subroutines;
pub mod tape;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the state graph view from the graph module.
pub use graph::{graph, StateEdge, StateGraph, StateNode};
/// Re-exports the tape geometry from the layout module.
pub use layout::Layout;
/// Re-exports the `ConfigLoader` struct from the loader module.
pub use loader::ConfigLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the program synthesizer and its configuration from the orchestrator module.
pub use orchestrator::{synthesize, XorShiftConfig, ACCEPT_STATE, START_STATE};
/// Re-exports `PresetInfo`, `PresetManager`, and `PRESETS` from the presets module.
pub use presets::{PresetInfo, PresetManager, PRESETS};
/// Re-exports the fragment builder and namespaces from the subroutines module.
pub use subroutines::{Fragment, Namespace};
/// Re-exports the tape from the tape module.
pub use tape::Tape;
/// Re-exports various types related to program definition and execution from the types module.
pub use types::{
    Configuration, Direction, Outcome, Program, Step, TakenTransition, Transition,
    TransitionTable, TuringMachineError, MAX_EXECUTION_STEPS,
};
