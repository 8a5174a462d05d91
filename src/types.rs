//! This module defines the core data structures and types shared by the synthesizer and the
//! execution engine: transition tables, programs, configuration snapshots, step outcomes and
//! error types.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// The blank symbol used on every synthesized tape.
pub const DEFAULT_BLANK_SYMBOL: char = '_';
/// The default step bound used by callers that do not pick their own.
pub const MAX_EXECUTION_STEPS: usize = 1_000_000;

/// The complete `(state, symbol) -> transition` mapping that drives the machine.
///
/// A missing entry for a `(state, symbol)` pair means the machine halts there.
pub type TransitionTable = HashMap<String, HashMap<char, Transition>>;

/// Represents a single-tape Turing Machine program.
///
/// A program bundles the synthesized transition table with everything needed to start a run:
/// the initial state, the initial tape and head position, the blank symbol and the set of
/// accepting states. The table sits behind an `Arc`, so cloning a program (or building several
/// machines from it) never copies the rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// The name of the program.
    pub name: String,
    /// The state the machine starts in.
    pub initial_state: String,
    /// The initial tape contents, left to right.
    pub tape: Vec<char>,
    /// The initial head position, as an index into `tape`.
    pub head: usize,
    /// The blank symbol used for cells outside the materialized tape.
    pub blank: char,
    /// States whose reach counts as successful termination.
    pub accepting: HashSet<String>,
    /// The transition rules.
    pub rules: Arc<TransitionTable>,
}

impl Program {
    /// Returns the initial tape as a `String`.
    pub fn initial_tape(&self) -> String {
        self.tape.iter().collect()
    }

    /// Looks up the transition for `state` reading `symbol`.
    pub fn transition(&self, state: &str, symbol: char) -> Option<&Transition> {
        self.rules.get(state).and_then(|rules| rules.get(&symbol))
    }

    /// Returns the total number of `(state, symbol)` rules in the table.
    pub fn transition_count(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    /// Checks whether `state` is one of the accepting states.
    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting.contains(state)
    }
}

/// Represents a single transition rule: what to write, where to move and which state comes next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The next state the machine transitions to.
    pub next_state: String,
    /// The symbol written under the head.
    pub write: char,
    /// The direction the head moves after writing.
    pub direction: Direction,
}

impl Transition {
    pub fn new(next_state: impl Into<String>, write: char, direction: Direction) -> Self {
        Self {
            next_state: next_state.into(),
            write,
            direction,
        }
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// The one-letter form used in edge labels.
    pub fn symbol(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a transition.
    Continue,
    /// No rule exists for the current state and symbol; nothing was changed.
    Halt,
}

/// The reason a bounded run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// An accepting state was reached.
    Accepted,
    /// The machine halted in a non-accepting state.
    Halted,
    /// The step bound ran out before the machine halted or accepted. Inconclusive.
    Exhausted,
}

impl Outcome {
    pub fn is_accepted(self) -> bool {
        self == Outcome::Accepted
    }
}

/// An immutable snapshot of the machine: current state, full tape contents and head index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub state: String,
    pub tape: String,
    pub head: usize,
}

impl Configuration {
    /// Returns the symbol under the head.
    pub fn symbol(&self) -> Option<char> {
        self.tape.chars().nth(self.head)
    }
}

/// The most recently taken edge of the state diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakenTransition {
    /// The state the machine was in before the step.
    pub from: String,
    /// The symbol that was read.
    pub read: char,
    /// The rule that was applied.
    pub transition: Transition,
}

/// Represents the errors that can occur while synthesizing, validating or loading programs.
///
/// The engine itself has no error path: an unmapped `(state, symbol)` pair is a normal halt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// Two fragments define the same state. This is a namespace collision in program composition.
    #[error("State '{0}' is defined by more than one fragment")]
    StateRedefined(String),
    /// Indicates an invalid xorshift configuration (seed, shifts or layout).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Indicates that a program failed structural validation.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates an error while reading configuration files.
    #[error("File error: {0}")]
    FileError(String),
    /// Indicates a configuration document that could not be parsed.
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
}

impl From<serde_json::Error> for TuringMachineError {
    fn from(error: serde_json::Error) -> Self {
        TuringMachineError::ParseError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let stay = Direction::Stay;

        let left_json = serde_json::to_string(&left).unwrap();
        let stay_json = serde_json::to_string(&stay).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(stay_json, "\"Stay\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, left_deserialized);
    }

    #[test]
    fn test_direction_symbols() {
        assert_eq!(Direction::Left.symbol(), 'L');
        assert_eq!(Direction::Right.symbol(), 'R');
        assert_eq!(Direction::Stay.symbol(), 'S');
    }

    #[test]
    fn test_program_transition_lookup() {
        let mut rules = TransitionTable::new();
        rules
            .entry("start".to_string())
            .or_default()
            .insert('a', Transition::new("done", 'b', Direction::Right));

        let program = Program {
            name: "lookup".to_string(),
            initial_state: "start".to_string(),
            tape: vec!['a'],
            head: 0,
            blank: DEFAULT_BLANK_SYMBOL,
            accepting: HashSet::from(["done".to_string()]),
            rules: Arc::new(rules),
        };

        let transition = program.transition("start", 'a').unwrap();
        assert_eq!(transition.next_state, "done");
        assert_eq!(transition.write, 'b');
        assert!(program.transition("start", 'z').is_none());
        assert!(program.transition("done", 'a').is_none());
        assert_eq!(program.transition_count(), 1);
        assert!(program.is_accepting("done"));
        assert_eq!(program.initial_tape(), "a");
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::StateRedefined("copy.find".to_string());

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("copy.find"));
        assert!(error_msg.contains("more than one fragment"));
    }

    #[test]
    fn test_outcome_is_accepted() {
        assert!(Outcome::Accepted.is_accepted());
        assert!(!Outcome::Halted.is_accepted());
        assert!(!Outcome::Exhausted.is_accepted());
    }
}
