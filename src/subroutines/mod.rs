//! Transition-table synthesizers.
//!
//! Each subroutine is a pure function from an entry state, one or more exit states, its own
//! parameters and a [`Namespace`] to a [`Fragment`] of rules. Internal states are always
//! namespaced; entry states are not, so the orchestrator can point a previous subroutine's exit
//! straight at them. Fragments are combined with [`Fragment::merge`], which refuses to let two
//! fragments define the same state, or a fragment define the same rule twice.

pub mod copy;
pub mod cycle;
pub mod marker;
pub mod seed_update;
pub mod shift_xor;
pub mod walk;

pub use copy::bit_copy;
pub use cycle::cycle_detection;
pub use seed_update::seed_update;
pub use shift_xor::shift_xor;

use crate::types::{Direction, Transition, TransitionTable, TuringMachineError};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use tracing::error;

/// Prefix that keeps one subroutine's internal states apart from every other subroutine's.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// Returns the namespaced label for the local state name `local`.
    pub fn state(&self, local: impl fmt::Display) -> String {
        format!("{}.{}", self.0, local)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An owned piece of a transition table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    rules: TransitionTable,
    /// First state given two rules for the same symbol. Reported by `merge`.
    conflict: Option<String>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the rule `(state, read) -> (next, write, direction)`.
    ///
    /// A second rule for the same `(state, read)` pair is not applied. It is remembered instead and
    /// the next `merge` involving this fragment fails with `StateRedefined`.
    pub fn rule(
        &mut self,
        state: &str,
        read: char,
        write: char,
        direction: Direction,
        next: &str,
    ) -> &mut Self {
        match self.rules.entry(state.to_string()).or_default().entry(read) {
            Entry::Vacant(slot) => {
                slot.insert(Transition::new(next, write, direction));
            }
            Entry::Occupied(_) => {
                error!(state, %read, "rule defined twice");
                self.conflict.get_or_insert_with(|| state.to_string());
            }
        }
        self
    }

    /// Moves over every symbol in `symbols` without changing it, staying in `state`.
    pub fn pass(&mut self, state: &str, symbols: &[char], direction: Direction) -> &mut Self {
        self.goto(state, symbols, direction, state)
    }

    /// Moves over every symbol in `symbols` without changing it, switching to `next`.
    pub fn goto(
        &mut self,
        state: &str,
        symbols: &[char],
        direction: Direction,
        next: &str,
    ) -> &mut Self {
        for &symbol in symbols {
            self.rule(state, symbol, symbol, direction, next);
        }
        self
    }

    /// Moves all states of `other` into this fragment.
    ///
    /// Fails with `StateRedefined` if both fragments define the same state, or if either one was
    /// given two rules for the same state and symbol. With distinct namespaces this cannot happen,
    /// so an error here always means a composition bug.
    pub fn merge(&mut self, other: Fragment) -> Result<(), TuringMachineError> {
        if let Some(state) = self.conflict.as_ref().or(other.conflict.as_ref()) {
            return Err(TuringMachineError::StateRedefined(state.clone()));
        }
        if let Some(state) = other.rules.keys().find(|s| self.rules.contains_key(*s)) {
            error!(%state, "state redefined while merging fragments");
            return Err(TuringMachineError::StateRedefined(state.clone()));
        }

        self.rules.extend(other.rules);
        Ok(())
    }

    /// Returns the rules of `state`.
    pub fn get(&self, state: &str) -> Option<&HashMap<char, Transition>> {
        self.rules.get(state)
    }

    pub fn contains(&self, state: &str) -> bool {
        self.rules.contains_key(state)
    }

    /// Returns the number of states defined by this fragment.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates the states defined by this fragment.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn into_table(self) -> TransitionTable {
        self.rules
    }
}

impl From<Fragment> for TransitionTable {
    fn from(fragment: Fragment) -> Self {
        fragment.rules
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers for running a single fragment on a hand-built tape.

    use super::Fragment;
    use crate::layout::BLANK;
    use crate::machine::TuringMachine;
    use crate::types::{Outcome, Program};
    use std::collections::HashSet;
    use std::sync::Arc;

    pub const STEP_LIMIT: usize = 100_000;

    /// Runs `fragment` from `entry` on `tape` with the head at `head` until one of `exits`.
    pub fn run(
        fragment: Fragment,
        entry: &str,
        exits: &[&str],
        tape: &str,
        head: usize,
    ) -> TuringMachine {
        let program = Program {
            name: "fragment".to_string(),
            initial_state: entry.to_string(),
            tape: tape.chars().collect(),
            head,
            blank: BLANK,
            accepting: exits.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
            rules: Arc::new(fragment.into_table()),
        };

        let mut machine = TuringMachine::new(program);
        assert_eq!(machine.run(STEP_LIMIT), Outcome::Accepted);
        machine
    }

    /// Returns the tape of `machine` without the blanks on either end.
    pub fn trimmed(machine: &TuringMachine) -> String {
        machine.tape().to_string().trim_matches(BLANK).to_string()
    }
}
