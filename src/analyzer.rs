//! This module provides functions for analyzing transition tables to detect common errors and
//! inconsistencies before execution. This includes checks for valid head positions, defined
//! states, dangling subroutine exits, reachable states, and handled tape symbols.

use crate::types::{Program, TuringMachineError};
use std::collections::HashSet;

/// Represents various errors that can be found during the analysis of a program.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Indicates an invalid head position, out of bounds for the initial tape.
    InvalidHead(usize),
    /// Indicates that the initial state is neither defined in the rules nor accepting.
    InvalidStartState(String),
    /// Indicates transitions into states that have no rules and are not accepting.
    UndefinedNextStates(Vec<String>),
    /// Indicates states that are defined in the rules but cannot be reached from the initial state.
    UnreachableStates(Vec<String>),
    /// Indicates that the initial tape contains symbols no rule ever reads.
    InvalidTapeSymbols(Vec<char>),
    /// Indicates structural problems with the program (empty tape, rules on accepting states).
    StructuralError(String),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidHead(pos) => {
                TuringMachineError::ValidationError(format!("Invalid head position: {}", pos))
            }
            AnalysisError::InvalidStartState(state) => {
                TuringMachineError::ValidationError(format!("Invalid start state: {}", state))
            }
            AnalysisError::UndefinedNextStates(transitions) => TuringMachineError::ValidationError(
                format!("Transitions reference undefined states: {:?}", transitions),
            ),
            AnalysisError::UnreachableStates(states) => TuringMachineError::ValidationError(
                format!("Unreachable states detected: {:?}", states),
            ),
            AnalysisError::InvalidTapeSymbols(symbols) => {
                TuringMachineError::ValidationError(format!(
                    "Initial tape contains symbols not handled by any transition: {:?}",
                    symbols
                ))
            }
            AnalysisError::StructuralError(msg) => TuringMachineError::ValidationError(msg),
        }
    }
}

/// Analyzes a given `Program` for structural and logical errors.
///
/// The synthesizer runs this on every program it produces, so a composition bug (a subroutine
/// exit that nothing defines, an orphaned state) is reported before the machine ever runs.
///
/// # Arguments
///
/// * `program` - A reference to the `Program` to be analyzed.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError::ValidationError)` describing the first violated rule.
pub fn analyze(program: &Program) -> Result<(), TuringMachineError> {
    [
        check_structure,
        check_head,
        check_valid_start_state,
        check_undefined_next_states,
        check_unreachable_states,
        check_tape_symbols,
    ]
    .iter()
    .find_map(|check| check(program).err())
    .map_or(Ok(()), |error| Err(error.into()))
}

/// Checks that the tape is non-empty and that accepting states carry no rules.
///
/// A run stops as soon as it enters an accepting state, so rules defined there can never fire.
fn check_structure(program: &Program) -> Result<(), AnalysisError> {
    if program.tape.is_empty() {
        return Err(AnalysisError::StructuralError("No tape defined".to_string()));
    }

    let mut dead: Vec<&String> = program
        .accepting
        .iter()
        .filter(|state| program.rules.get(*state).is_some_and(|r| !r.is_empty()))
        .collect();

    if !dead.is_empty() {
        dead.sort();
        return Err(AnalysisError::StructuralError(format!(
            "Accepting states have transitions: {:?}",
            dead
        )));
    }

    Ok(())
}

/// Checks that the initial head position lies on the initial tape.
fn check_head(program: &Program) -> Result<(), AnalysisError> {
    if program.head >= program.tape.len() {
        return Err(AnalysisError::InvalidHead(program.head));
    }

    Ok(())
}

/// Checks whether the initial state has rules, or is itself accepting.
///
/// # Returns
///
/// * `Ok(())` if the initial state is usable.
/// * `Err(AnalysisError::InvalidStartState)` otherwise.
fn check_valid_start_state(program: &Program) -> Result<(), AnalysisError> {
    if !program.rules.contains_key(&program.initial_state)
        && !program.is_accepting(&program.initial_state)
    {
        return Err(AnalysisError::InvalidStartState(
            program.initial_state.clone(),
        ));
    }

    Ok(())
}

/// Checks that every `next_state` either has rules or is accepting.
///
/// In a synthesized table a violation means some subroutine exits into a label that the next
/// subroutine never defined.
///
/// # Returns
///
/// * `Ok(())` if all next states are defined or accepting.
/// * `Err(AnalysisError::UndefinedNextStates)` listing each offending `state[symbol] -> next`.
fn check_undefined_next_states(program: &Program) -> Result<(), AnalysisError> {
    let mut undefined = Vec::new();
    for (state, transitions) in program.rules.iter() {
        for (symbol, transition) in transitions {
            if !program.rules.contains_key(&transition.next_state)
                && !program.is_accepting(&transition.next_state)
            {
                undefined.push(format!("{}[{}] -> {}", state, symbol, transition.next_state));
            }
        }
    }

    if !undefined.is_empty() {
        undefined.sort();
        return Err(AnalysisError::UndefinedNextStates(undefined));
    }

    Ok(())
}

/// Checks for unreachable states by a depth-first traversal of the table from the initial state.
///
/// Any state defined in the rules that no sequence of transitions leads to is reported.
fn check_unreachable_states(program: &Program) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut queue = vec![program.initial_state.as_str()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        if let Some(transitions) = program.rules.get(state) {
            for transition in transitions.values() {
                if !visited.contains(transition.next_state.as_str()) {
                    queue.push(transition.next_state.as_str());
                }
            }
        }
    }

    let mut unreachable: Vec<String> = program
        .rules
        .keys()
        .filter(|state| !visited.contains(state.as_str()))
        .cloned()
        .collect();

    if !unreachable.is_empty() {
        unreachable.sort(); // Sort for deterministic output
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}

/// Checks that every symbol on the initial tape is read by at least one rule.
///
/// The blank symbol is always considered handled.
fn check_tape_symbols(program: &Program) -> Result<(), AnalysisError> {
    let mut handled: HashSet<char> = program
        .rules
        .values()
        .flat_map(|transitions| transitions.keys().copied())
        .collect();
    handled.insert(program.blank);

    let mut unhandled: Vec<char> = program
        .tape
        .iter()
        .filter(|c| !handled.contains(*c))
        .copied()
        .collect();

    if !unhandled.is_empty() {
        unhandled.sort();
        unhandled.dedup();
        return Err(AnalysisError::InvalidTapeSymbols(unhandled));
    }

    Ok(())
}
