//! Bit-by-bit walk over the scratch word.
//!
//! Shift-XOR and seed-update have the same outer shape. For every scratch bit, left to right, the
//! bit is marked, carried across `@` into the seed region, something is done there, and the head
//! comes back to overwrite the marker. Only the "something" differs, so it is supplied by a
//! visitor that receives a [`Visit`] and returns the fragment implementing it.

use super::marker::{find_mark, mark, Restore};
use super::{Fragment, Namespace};
use crate::layout::{Layout, BITS, BLANK, SEED_START};
use crate::types::{Direction, TuringMachineError};

/// One bit of the walk, handed to the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    /// Index of the scratch bit, counted from the left.
    pub index: usize,
    /// Value of the scratch bit.
    pub bit: u8,
    /// The state the visitor must define. The head sits on the first seed bit.
    pub state: String,
    /// `returns[r]` walks back and writes `r` over the marker. The visitor must move left out of
    /// the seed region into one of them.
    pub returns: [String; 2],
}

/// Builds the walk from `entry` to `exit`.
///
/// The head may start anywhere on the blanks left of the scratch word or on its first bit. An
/// empty scratch region goes straight to `exit`. On exit the head is on the first scratch bit, or
/// on `@` if the scratch region is empty.
pub fn walk_scratch<F>(
    entry: &str,
    exit: &str,
    layout: &Layout,
    ns: &Namespace,
    mut visit: F,
) -> Result<Fragment, TuringMachineError>
where
    F: FnMut(&Visit) -> Fragment,
{
    let word_len = layout.word_len;
    let rewind = ns.state("rewind");
    let mut fragment = Fragment::new();

    for index in 0..word_len {
        let bit_state = if index == 0 {
            entry.to_string()
        } else {
            ns.state(format!("bit_{index}"))
        };
        let carries = [0, 1].map(|b| ns.state(format!("carry_{index}_{b}")));
        let returns = [0, 1].map(|r| ns.state(format!("return_{index}_{r}")));
        let after = if index + 1 == word_len {
            rewind.clone()
        } else {
            ns.state(format!("bit_{}", index + 1))
        };

        if index == 0 {
            fragment.pass(&bit_state, &[BLANK], Direction::Right);
        }
        mark(
            &mut fragment,
            &bit_state,
            Direction::Right,
            [&carries[0], &carries[1]],
        );
        fragment.rule(&bit_state, SEED_START, SEED_START, Direction::Left, &rewind);

        for r in 0..2u8 {
            find_mark(
                &mut fragment,
                &returns[usize::from(r)],
                &[BITS[0], BITS[1], SEED_START],
                Direction::Left,
                Restore::Bit(r),
                Direction::Right,
                &after,
            );
        }

        for bit in 0..2u8 {
            let state = ns.state(format!("act_{index}_{bit}"));
            fragment.pass(&carries[usize::from(bit)], &BITS, Direction::Right).rule(
                &carries[usize::from(bit)],
                SEED_START,
                SEED_START,
                Direction::Right,
                &state,
            );

            fragment.merge(visit(&Visit {
                index,
                bit,
                state,
                returns: returns.clone(),
            }))?;
        }
    }

    fragment
        .pass(&rewind, &[BITS[0], BITS[1], SEED_START], Direction::Left)
        .rule(&rewind, BLANK, BLANK, Direction::Right, exit);

    Ok(fragment)
}
