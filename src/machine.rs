//! This module defines the `TuringMachine` struct, which executes a single-tape program one
//! transition at a time. It owns the tape, head and current state, records every configuration
//! it passes through, and never inspects or rewrites the transition table it runs.

use crate::tape::Tape;
use crate::types::{Configuration, Outcome, Program, Step, TakenTransition, Transition};
use tracing::{debug, trace};

/// Represents a single-tape Turing Machine.
///
/// The machine shares its program's transition table (it is held behind an `Arc`), so any number
/// of machines can run the same synthesized program side by side.
pub struct TuringMachine {
    state: String,
    tape: Tape,
    program: Program,
    history: Vec<Configuration>,
    last_transition: Option<TakenTransition>,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` from a `Program`.
    ///
    /// The machine starts in the program's initial state, with its initial tape and head position.
    pub fn new(program: Program) -> Self {
        Self {
            state: program.initial_state.clone(),
            tape: Tape::new(program.tape.iter().copied(), program.head, program.blank),
            program,
            history: Vec::new(),
            last_transition: None,
            step_count: 0,
        }
    }

    /// Executes a single step.
    ///
    /// The pre-step configuration is always appended to the history first. If the table has no
    /// rule for the current state and symbol, the machine is left untouched and `Step::Halt` is
    /// returned. Otherwise the rule's symbol is written, the state changes, the head moves
    /// (extending the tape if needed) and `Step::Continue` is returned.
    pub fn step(&mut self) -> Step {
        self.history.push(self.configuration());

        let symbol = self.tape.read();
        let transition = match self.program.transition(&self.state, symbol) {
            Some(t) => t.clone(),
            None => return Step::Halt,
        };

        trace!(
            state = %self.state,
            %symbol,
            head = self.tape.head(),
            next = %transition.next_state,
            "step"
        );

        self.tape.write(transition.write);
        self.tape.shift(transition.direction);

        let from = std::mem::replace(&mut self.state, transition.next_state.clone());
        self.last_transition = Some(TakenTransition {
            from,
            read: symbol,
            transition,
        });
        self.step_count += 1;

        Step::Continue
    }

    /// Runs the machine for at most `max_steps` steps.
    ///
    /// Stops as soon as an accepting state is reached or the machine halts. The bound exists
    /// because a synthesized program is not guaranteed to terminate; running out of steps is
    /// reported as `Outcome::Exhausted`, never as a rejection.
    pub fn run(&mut self, max_steps: usize) -> Outcome {
        let mut taken = 0;
        let outcome = loop {
            if self.is_accepting() {
                break Outcome::Accepted;
            }
            if taken == max_steps {
                break Outcome::Exhausted;
            }
            if self.step() == Step::Halt {
                break Outcome::Halted;
            }
            taken += 1;
        };

        debug!(?outcome, steps = taken, state = %self.state, "run finished");
        outcome
    }

    /// Returns the current state.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the initial state of the program.
    pub fn initial_state(&self) -> &str {
        &self.program.initial_state
    }

    /// Returns the program this machine executes.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Restores the earliest captured configuration and discards the history.
    ///
    /// If nothing has been captured yet this only clears the (empty) history.
    pub fn reset(&mut self) {
        if let Some(first) = self.history.first() {
            self.state = first.state.clone();
            self.tape = Tape::new(first.tape.chars(), first.head, self.program.blank);
        }

        self.history.clear();
        self.last_transition = None;
        self.step_count = 0;
    }

    /// Returns the number of transitions executed since construction or the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Checks whether no rule exists for the current state and the symbol under the head.
    pub fn is_halted(&self) -> bool {
        self.transition().is_none()
    }

    /// Checks whether the current state is an accepting state.
    pub fn is_accepting(&self) -> bool {
        self.program.is_accepting(&self.state)
    }

    /// Returns the rule that the next step would apply, if any.
    pub fn transition(&self) -> Option<&Transition> {
        self.program.transition(&self.state, self.tape.read())
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> char {
        self.tape.read()
    }

    /// Returns the tape.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the head index into the materialized tape.
    pub fn head(&self) -> usize {
        self.tape.head()
    }

    /// Returns a deep copy of the current state, tape contents and head index.
    pub fn configuration(&self) -> Configuration {
        Configuration {
            state: self.state.clone(),
            tape: self.tape.to_string(),
            head: self.tape.head(),
        }
    }

    /// Returns every configuration captured by `step`, oldest first.
    pub fn history(&self) -> &[Configuration] {
        &self.history
    }

    /// Returns the edge taken by the most recent successful step.
    pub fn last_transition(&self) -> Option<&TakenTransition> {
        self.last_transition.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, TransitionTable, DEFAULT_BLANK_SYMBOL};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn rule(
        rules: &mut TransitionTable,
        state: &str,
        read: char,
        write: char,
        direction: Direction,
        next: &str,
    ) {
        rules
            .entry(state.to_string())
            .or_default()
            .insert(read, Transition::new(next, write, direction));
    }

    /// Flips `a`/`b` while walking right and accepts on the first blank.
    fn create_flip_program() -> Program {
        let mut rules = TransitionTable::new();
        rule(&mut rules, "start", 'a', 'b', Direction::Right, "start");
        rule(&mut rules, "start", 'b', 'a', Direction::Right, "start");
        rule(&mut rules, "start", '_', '_', Direction::Stay, "accept");

        Program {
            name: "Flip".to_string(),
            initial_state: "start".to_string(),
            tape: "abba".chars().collect(),
            head: 0,
            blank: DEFAULT_BLANK_SYMBOL,
            accepting: HashSet::from(["accept".to_string()]),
            rules: Arc::new(rules),
        }
    }

    #[test]
    fn test_machine_creation() {
        let machine = TuringMachine::new(create_flip_program());

        assert_eq!(machine.state(), "start");
        assert_eq!(machine.tape().to_string(), "abba");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.step_count(), 0);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_single_step() {
        let mut machine = TuringMachine::new(create_flip_program());

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.state(), "start");
        assert_eq!(machine.tape().to_string(), "bbba");
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.step_count(), 1);
        assert_eq!(machine.history().len(), 1);
        assert_eq!(machine.history()[0].tape, "abba");

        let last = machine.last_transition().unwrap();
        assert_eq!(last.from, "start");
        assert_eq!(last.read, 'a');
        assert_eq!(last.transition.write, 'b');
    }

    #[test]
    fn test_run_to_acceptance() {
        let mut machine = TuringMachine::new(create_flip_program());

        let outcome = machine.run(100);

        assert_eq!(outcome, Outcome::Accepted);
        assert!(outcome.is_accepted());
        assert_eq!(machine.state(), "accept");
        assert_eq!(machine.configuration().tape, "baab_");
        assert_eq!(machine.step_count(), 5);
    }

    #[test]
    fn test_run_exhausts_step_bound() {
        let mut machine = TuringMachine::new(create_flip_program());

        let outcome = machine.run(2);

        assert_eq!(outcome, Outcome::Exhausted);
        assert_eq!(machine.step_count(), 2);
        assert_eq!(machine.head(), 2);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_run_halts_without_accepting() {
        let mut program = create_flip_program();
        program.tape = "abXa".chars().collect();
        let mut machine = TuringMachine::new(program);

        let outcome = machine.run(100);

        assert_eq!(outcome, Outcome::Halted);
        assert!(machine.is_halted());
        assert!(!machine.is_accepting());
        assert_eq!(machine.head(), 2);
    }

    #[test]
    fn test_step_at_halt_is_noop() {
        let mut program = create_flip_program();
        program.tape = "X".chars().collect();
        let mut machine = TuringMachine::new(program);

        let before = machine.configuration();
        assert_eq!(machine.step(), Step::Halt);
        assert_eq!(machine.step(), Step::Halt);

        assert_eq!(machine.configuration(), before);
        assert_eq!(machine.step_count(), 0);
        assert!(machine.last_transition().is_none());
        // Halting steps are still recorded.
        assert_eq!(machine.history().len(), 2);
    }

    #[test]
    fn test_accepting_state_is_halted() {
        let mut machine = TuringMachine::new(create_flip_program());
        machine.run(100);

        assert!(machine.is_accepting());
        assert!(machine.is_halted());
        assert_eq!(machine.step(), Step::Halt);
    }

    #[test]
    fn test_configuration_is_a_copy() {
        let mut machine = TuringMachine::new(create_flip_program());

        let mut snapshot = machine.configuration();
        snapshot.tape.clear();
        snapshot.state.push_str("-changed");

        assert_eq!(machine.state(), "start");
        assert_eq!(machine.tape().to_string(), "abba");

        machine.step();
        assert_eq!(snapshot.head, 0);
    }

    #[test]
    fn test_reset_restores_first_configuration() {
        let mut machine = TuringMachine::new(create_flip_program());
        machine.run(100);

        machine.reset();

        assert_eq!(machine.state(), "start");
        assert_eq!(machine.tape().to_string(), "abba");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.step_count(), 0);
        assert!(machine.history().is_empty());
        assert!(machine.last_transition().is_none());
    }

    #[test]
    fn test_reset_without_history_is_noop() {
        let mut machine = TuringMachine::new(create_flip_program());
        machine.reset();

        assert_eq!(machine.state(), "start");
        assert_eq!(machine.tape().to_string(), "abba");
    }

    #[test]
    fn test_moving_left_extends_tape() {
        let mut rules = TransitionTable::new();
        rule(&mut rules, "start", 'a', 'a', Direction::Left, "left");
        rule(&mut rules, "left", '_', 'x', Direction::Left, "done");

        let program = Program {
            name: "Left".to_string(),
            initial_state: "start".to_string(),
            tape: vec!['a'],
            head: 0,
            blank: DEFAULT_BLANK_SYMBOL,
            accepting: HashSet::new(),
            rules: Arc::new(rules),
        };
        let mut machine = TuringMachine::new(program);

        assert_eq!(machine.run(10), Outcome::Halted);
        assert_eq!(machine.state(), "done");
        assert_eq!(machine.tape().to_string(), "_xa");
        assert_eq!(machine.head(), 0);
    }

    #[test]
    fn test_machines_share_one_table() {
        let program = create_flip_program();
        let mut first = TuringMachine::new(program.clone());
        let second = TuringMachine::new(program);

        first.run(100);

        assert!(Arc::ptr_eq(&first.program().rules, &second.program().rules));
        assert_eq!(second.tape().to_string(), "abba");
    }
}
