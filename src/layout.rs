//! Tape layout shared by every synthesized subroutine.
//!
//! ```text
//!   ..._ _ [scratch] @ [seed] # [entry] $ [entry] $ ... _ _ _...
//! ```
//!
//! The scratch region grows leftwards from `@` and holds intermediate words. The seed region has
//! a fixed word length and is updated in place. The history region after `#` is an append-only
//! log of produced words, each terminated by `$`. Every subroutine leaves these separators where
//! it found them.

use crate::types::{TuringMachineError, DEFAULT_BLANK_SYMBOL};

/// Blank cell.
pub const BLANK: char = DEFAULT_BLANK_SYMBOL;
/// Marks the start of the seed and the end of the scratch region.
pub const SEED_START: char = '@';
/// Marks the end of the seed and the start of the history region.
pub const SEED_END: char = '#';
/// Terminates each history entry.
pub const ENTRY_SEP: char = '$';
/// Transient terminator of the history entry currently being checked for a repeat.
pub const ENTRY_END: char = '&';
/// Transient marker standing in for a `0` bit while the head travels.
pub const MARK_ZERO: char = 'A';
/// Transient marker standing in for a `1` bit while the head travels.
pub const MARK_ONE: char = 'B';

/// The two bit symbols, indexed by bit value.
pub const BITS: [char; 2] = ['0', '1'];
/// The two marker symbols, indexed by the bit value they stand for.
pub const MARKS: [char; 2] = [MARK_ZERO, MARK_ONE];

/// Returns the tape symbol for bit value `bit` (0 or 1).
pub fn bit_symbol(bit: u8) -> char {
    BITS[usize::from(bit & 1)]
}

/// Returns the marker that stands in for `bit`.
pub fn mark_symbol(bit: u8) -> char {
    MARKS[usize::from(bit & 1)]
}

/// Word geometry threaded into every synthesizer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Number of bits in the seed word.
    pub word_len: usize,
}

impl Layout {
    pub fn new(word_len: usize) -> Result<Self, TuringMachineError> {
        if word_len == 0 {
            return Err(TuringMachineError::InvalidConfig(
                "word length must be at least 1".to_string(),
            ));
        }

        Ok(Self { word_len })
    }

    /// Builds the initial tape: `left_padding` blanks, room for one scratch word, `@`, the seed,
    /// `#`, then `history_reserve` blanks. Returns the tape and the index of the first seed bit.
    pub fn initial_tape(
        &self,
        seed: &str,
        left_padding: usize,
        history_reserve: usize,
    ) -> (Vec<char>, usize) {
        let scratch = left_padding + self.word_len;
        let mut tape = Vec::with_capacity(scratch + seed.len() + 2 + history_reserve);

        tape.extend(std::iter::repeat(BLANK).take(scratch));
        tape.push(SEED_START);
        tape.extend(seed.chars());
        tape.push(SEED_END);
        tape.extend(std::iter::repeat(BLANK).take(history_reserve));

        (tape, scratch + 1)
    }
}

/// Returns the seed region of `tape`, between `@` and `#`.
pub fn seed(tape: &str) -> Option<&str> {
    let start = tape.find(SEED_START)?;
    let end = tape[start..].find(SEED_END)? + start;
    Some(&tape[start + 1..end])
}

/// Returns the scratch region of `tape`: the non-blank run directly left of `@`.
pub fn scratch(tape: &str) -> Option<&str> {
    let start = tape.find(SEED_START)?;
    let region = &tape[..start];
    let from = region.rfind(BLANK).map_or(0, |i| i + 1);
    Some(&region[from..])
}

/// Returns the history entries of `tape`, oldest first.
pub fn history(tape: &str) -> Vec<&str> {
    let Some(start) = tape.find(SEED_END) else {
        return Vec::new();
    };

    let log = tape[start + 1..].trim_end_matches(BLANK);
    log.split_terminator(ENTRY_SEP)
        .filter(|entry| !entry.is_empty())
        .collect()
}
