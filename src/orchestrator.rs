//! This module wires the subroutines into one XOR-shift program with cycle detection.
//!
//! The synthesized pipeline, with every arrow a shared state label:
//!
//! ```text
//! start -> scan_initial --continue--> cycle -> shift_a -> commit_a -> shift_b -> commit_b
//!               |                       ^        -> shift_c -> commit_c -> scan --continue--+
//!               |                       +--------------------------------------------------+
//!               +--found--> cycle_found <--found-- scan
//! ```
//!
//! One iteration computes `x ^= x << a; x ^= x >> b; x ^= x << c` on the seed word, with bit 0
//! being the leftmost (most significant) seed bit, and then checks the new seed against every
//! earlier one.

use crate::analyzer::analyze;
use crate::layout::{Layout, BITS, BLANK, SEED_START};
use crate::subroutines::{bit_copy, cycle_detection, seed_update, shift_xor, Fragment, Namespace};
use crate::types::{Direction, Program, TuringMachineError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// The entry state of every synthesized program.
pub const START_STATE: &str = "start";
/// The single accepting state, reached when a seed repeats.
pub const ACCEPT_STATE: &str = "cycle_found";

/// Blanks left of the scratch reservation on a fresh tape.
pub const DEFAULT_LEFT_PADDING: usize = 10;
/// Blanks reserved right of `#` for the history log.
pub const DEFAULT_HISTORY_RESERVE: usize = 500;

/// Parameters of one XOR-shift program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XorShiftConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Initial seed, as a string of `0` and `1`. Its length is the word length.
    pub seed: String,
    /// Left shift of the first step.
    pub a: usize,
    /// Right shift of the second step.
    pub b: usize,
    /// Left shift of the third step.
    pub c: usize,
    #[serde(default = "default_left_padding")]
    pub left_padding: usize,
    #[serde(default = "default_history_reserve")]
    pub history_reserve: usize,
}

fn default_name() -> String {
    "xorshift".to_string()
}

fn default_left_padding() -> usize {
    DEFAULT_LEFT_PADDING
}

fn default_history_reserve() -> usize {
    DEFAULT_HISTORY_RESERVE
}

impl XorShiftConfig {
    pub fn new(seed: impl Into<String>, a: usize, b: usize, c: usize) -> Self {
        Self {
            name: default_name(),
            description: String::new(),
            seed: seed.into(),
            a,
            b,
            c,
            left_padding: DEFAULT_LEFT_PADDING,
            history_reserve: DEFAULT_HISTORY_RESERVE,
        }
    }

    /// Returns the number of bits in a word.
    pub fn word_len(&self) -> usize {
        self.seed.chars().count()
    }

    /// Checks the seed and returns the layout for it.
    ///
    /// Shift amounts are not restricted: a shift of 0 zeroes the word and a shift of at least the
    /// word length leaves it unchanged. Both are legal if unusual.
    pub fn validate(&self) -> Result<Layout, TuringMachineError> {
        if self.seed.is_empty() {
            return Err(TuringMachineError::InvalidConfig(
                "seed must not be empty".to_string(),
            ));
        }

        if let Some(bad) = self.seed.chars().find(|c| !BITS.contains(c)) {
            return Err(TuringMachineError::InvalidConfig(format!(
                "seed may only contain '0' and '1', found '{}'",
                bad
            )));
        }

        Layout::new(self.word_len())
    }

    /// Returns the signed offsets `(+a, -b, +c)` of one iteration.
    ///
    /// Every shift beyond the word length behaves like a shift of exactly the word length, so the
    /// amounts are clamped there and never overflow.
    pub fn offsets(&self, layout: &Layout) -> [isize; 3] {
        let clamp = |shift: usize| shift.min(layout.word_len) as isize;
        [clamp(self.a), -clamp(self.b), clamp(self.c)]
    }

    /// Computes the seed sequence arithmetically, up to and including the first repeated seed.
    ///
    /// This is exactly the history a successful run of the synthesized program leaves on its
    /// tape.
    pub fn reference_history(&self) -> Result<Vec<String>, TuringMachineError> {
        let layout = self.validate()?;
        let offsets = self.offsets(&layout);

        let mut word: Vec<u8> = self.seed.bytes().map(|b| b - b'0').collect();
        let mut seen = HashSet::new();
        let mut history = Vec::new();

        loop {
            let text: String = word.iter().map(|&b| BITS[usize::from(b)]).collect();
            let repeated = !seen.insert(text.clone());
            history.push(text);
            if repeated {
                return Ok(history);
            }

            for offset in offsets {
                xor_shifted(&mut word, offset);
            }
        }
    }
}

/// `word[i] ^= word[i + offset]`, with out-of-range positions reading as zero.
fn xor_shifted(word: &mut [u8], offset: isize) {
    let source = word.to_vec();
    for (i, bit) in word.iter_mut().enumerate() {
        let target = isize::try_from(i)
            .ok()
            .and_then(|i| i.checked_add(offset))
            .and_then(|t| usize::try_from(t).ok());
        if let Some(&other) = target.and_then(|t| source.get(t)) {
            *bit ^= other;
        }
    }
}

/// Synthesizes the full XOR-shift program for `config`.
///
/// # Arguments
///
/// * `config` - The seed, shift amounts and tape reservations.
///
/// # Returns
///
/// * `Ok(Program)` with the initial tape laid out, the head on the first seed bit and
///   `cycle_found` as the only accepting state.
/// * `Err(TuringMachineError::InvalidConfig)` if the seed is not a binary word.
/// * `Err(TuringMachineError::StateRedefined)` if two subroutines collide.
/// * `Err(TuringMachineError::ValidationError)` if the result fails analysis.
pub fn synthesize(config: &XorShiftConfig) -> Result<Program, TuringMachineError> {
    let layout = config.validate()?;
    let mut table = Fragment::new();

    let mut start = Fragment::new();
    start.pass(START_STATE, &BITS, Direction::Left).rule(
        START_STATE,
        SEED_START,
        SEED_START,
        Direction::Stay,
        "scan_initial",
    );
    include(&mut table, START_STATE, start)?;

    let ns = Namespace::new("detect_initial");
    let fragment = cycle_detection("scan_initial", "cycle", ACCEPT_STATE, &layout, &ns)?;
    include(&mut table, ns.as_str(), fragment)?;

    let ns = Namespace::new("copy");
    include(&mut table, ns.as_str(), bit_copy("cycle", "shift_a", &ns))?;

    let [a, b, c] = config.offsets(&layout);
    let steps = [
        ("a", a, "shift_a", "commit_a", "shift_b"),
        ("b", b, "shift_b", "commit_b", "shift_c"),
        ("c", c, "shift_c", "commit_c", "scan"),
    ];
    for (suffix, offset, shift, commit, next) in steps {
        let ns = Namespace::new(format!("xor_{suffix}"));
        let fragment = shift_xor(shift, commit, offset, &layout, &ns)?;
        include(&mut table, ns.as_str(), fragment)?;

        let ns = Namespace::new(format!("update_{suffix}"));
        let fragment = seed_update(commit, next, &layout, &ns)?;
        include(&mut table, ns.as_str(), fragment)?;
    }

    let ns = Namespace::new("detect");
    let fragment = cycle_detection("scan", "cycle", ACCEPT_STATE, &layout, &ns)?;
    include(&mut table, ns.as_str(), fragment)?;

    let (tape, head) =
        layout.initial_tape(&config.seed, config.left_padding, config.history_reserve);
    let program = Program {
        name: config.name.clone(),
        initial_state: START_STATE.to_string(),
        tape,
        head,
        blank: BLANK,
        accepting: HashSet::from([ACCEPT_STATE.to_string()]),
        rules: Arc::new(table.into_table()),
    };

    analyze(&program)?;

    info!(
        name = %program.name,
        word_len = layout.word_len,
        states = program.rules.len(),
        transitions = program.transition_count(),
        "synthesized program"
    );
    Ok(program)
}

fn include(
    table: &mut Fragment,
    namespace: &str,
    fragment: Fragment,
) -> Result<(), TuringMachineError> {
    debug!(namespace, states = fragment.len(), "synthesized fragment");
    table.merge(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{history, seed};
    use crate::machine::TuringMachine;
    use crate::types::{Outcome, MAX_EXECUTION_STEPS};

    const CLASSIC: [&str; 8] = [
        "110010", "110101", "101000", "011010", "101111", "000111", "011101", "110010",
    ];

    fn run_to_accept(config: &XorShiftConfig) -> TuringMachine {
        let program = synthesize(config).unwrap();
        let mut machine = TuringMachine::new(program);
        assert_eq!(machine.run(MAX_EXECUTION_STEPS), Outcome::Accepted);
        machine
    }

    #[test]
    fn test_reference_history() {
        let config = XorShiftConfig::new("110010", 1, 2, 1);
        assert_eq!(config.reference_history().unwrap(), CLASSIC);
    }

    #[test]
    fn test_reference_history_zero_seed() {
        let config = XorShiftConfig::new("0000", 1, 1, 1);
        assert_eq!(config.reference_history().unwrap(), vec!["0000", "0000"]);
    }

    #[test]
    fn test_validate_rejects_bad_seeds() {
        assert!(matches!(
            XorShiftConfig::new("", 1, 2, 1).validate(),
            Err(TuringMachineError::InvalidConfig(_))
        ));
        assert!(matches!(
            XorShiftConfig::new("10a1", 1, 2, 1).validate(),
            Err(TuringMachineError::InvalidConfig(_))
        ));
        assert!(synthesize(&XorShiftConfig::new("1 0", 1, 1, 1)).is_err());
    }

    #[test]
    fn test_validate_accepts_degenerate_shifts() {
        let layout = XorShiftConfig::new("101", 0, 3, 9).validate().unwrap();
        assert_eq!(layout.word_len, 3);
    }

    #[test]
    fn test_offsets_are_clamped_to_word_length() {
        let config = XorShiftConfig::new("1011", isize::MAX as usize, usize::MAX, 2);
        let layout = config.validate().unwrap();

        assert_eq!(config.offsets(&layout), [4, -4, 2]);
    }

    #[test]
    fn test_huge_shifts_act_as_identity() {
        let config = XorShiftConfig::new("1011", isize::MAX as usize, usize::MAX, 1);

        // Only `x ^= x << 1` changes the word: 1011 -> 1101 -> 0111 -> 1001 -> 1011.
        let reference = config.reference_history().unwrap();
        assert_eq!(reference[..3], ["1011", "1101", "0111"]);

        let machine = run_to_accept(&config);
        let tape = machine.tape().to_string();
        assert_eq!(history(&tape), reference);
    }

    #[test]
    fn test_classic_run_accepts_on_repeat() {
        let machine = run_to_accept(&XorShiftConfig::new("110010", 1, 2, 1));
        let tape = machine.tape().to_string();

        assert_eq!(machine.state(), ACCEPT_STATE);
        assert_eq!(machine.symbol(), SEED_START);
        assert_eq!(history(&tape), CLASSIC);
        assert_eq!(seed(&tape), Some("110010"));
    }

    #[test]
    fn test_zero_seed_is_found_after_one_iteration() {
        let machine = run_to_accept(&XorShiftConfig::new("000000", 1, 2, 1));
        let tape = machine.tape().to_string();

        assert_eq!(history(&tape), vec!["000000", "000000"]);
    }

    #[test]
    fn test_single_bit_word() {
        let config = XorShiftConfig::new("1", 1, 1, 1);
        let machine = run_to_accept(&config);
        let tape = machine.tape().to_string();

        assert_eq!(history(&tape), config.reference_history().unwrap());
    }

    #[test]
    fn test_zero_shift_matches_reference() {
        let config = XorShiftConfig::new("1011", 0, 1, 1);
        let machine = run_to_accept(&config);
        let tape = machine.tape().to_string();

        assert_eq!(history(&tape), config.reference_history().unwrap());
    }

    #[test]
    fn test_program_shape() {
        let program = synthesize(&XorShiftConfig::new("110010", 1, 2, 1)).unwrap();

        assert_eq!(program.initial_state, START_STATE);
        assert_eq!(program.tape[program.head], '1');
        assert_eq!(program.tape[program.head - 1], SEED_START);
        assert!(program.is_accepting(ACCEPT_STATE));
        assert_eq!(program.accepting.len(), 1);
        assert!(!program.rules.contains_key(ACCEPT_STATE));

        let entries = [
            "start", "scan_initial", "cycle", "shift_a", "commit_a", "shift_b", "commit_b",
            "shift_c", "commit_c", "scan",
        ];
        for state in program.rules.keys() {
            assert!(
                entries.contains(&state.as_str()) || state.contains('.'),
                "state '{}' is neither an entry nor namespaced",
                state
            );
        }
        for entry in entries {
            assert!(program.rules.contains_key(entry), "missing entry '{}'", entry);
        }
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let config = XorShiftConfig::new("1011", 1, 1, 1);
        assert_eq!(synthesize(&config).unwrap(), synthesize(&config).unwrap());
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: XorShiftConfig =
            serde_json::from_str(r#"{ "seed": "1011", "a": 1, "b": 1, "c": 1 }"#).unwrap();

        assert_eq!(config, XorShiftConfig::new("1011", 1, 1, 1));
        assert_eq!(config.left_padding, DEFAULT_LEFT_PADDING);
        assert_eq!(config.history_reserve, DEFAULT_HISTORY_RESERVE);
    }
}
