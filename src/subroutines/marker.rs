//! The marker protocol used by every subroutine.
//!
//! A bit that is being carried somewhere is replaced on the tape by its marker (`A` for `0`, `B`
//! for `1`). The head then travels, does its work, comes back looking for the marker and writes a
//! bit over it again. Since a marker remembers its own bit, finding it both locates the cell and
//! tells the subroutine what was there.

use super::Fragment;
use crate::layout::{mark_symbol, BITS, MARKS};
use crate::types::Direction;

/// What to write when a marker is found again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restore {
    /// Put back the bit the marker stands for.
    Original,
    /// Overwrite the marker with this bit value.
    Bit(u8),
}

/// In `state`, replaces a `0`/`1` with its marker and moves `direction`; bit `b` continues in
/// `next[b]`.
pub fn mark(fragment: &mut Fragment, state: &str, direction: Direction, next: [&str; 2]) {
    for bit in 0..2u8 {
        fragment.rule(
            state,
            BITS[usize::from(bit)],
            mark_symbol(bit),
            direction,
            next[usize::from(bit)],
        );
    }
}

/// In `state`, replaces either marker according to `value` and moves `direction` into `next`.
pub fn restore(
    fragment: &mut Fragment,
    state: &str,
    value: Restore,
    direction: Direction,
    next: &str,
) {
    for (bit, &marker) in MARKS.iter().enumerate() {
        let write = match value {
            Restore::Original => BITS[bit],
            Restore::Bit(b) => BITS[usize::from(b & 1)],
        };
        fragment.rule(state, marker, write, direction, next);
    }
}

/// In `state`, walks `direction` over `crossing` until a marker shows up, then restores it.
pub fn find_mark(
    fragment: &mut Fragment,
    state: &str,
    crossing: &[char],
    direction: Direction,
    value: Restore,
    then: Direction,
    next: &str,
) {
    fragment.pass(state, crossing, direction);
    restore(fragment, state, value, then, next);
}

/// In `state`, walks `direction` over `crossing` until `target`, then moves `then` into `next`
/// leaving `target` in place.
pub fn travel(
    fragment: &mut Fragment,
    state: &str,
    crossing: &[char],
    direction: Direction,
    target: char,
    then: Direction,
    next: &str,
) {
    fragment
        .pass(state, crossing, direction)
        .rule(state, target, target, then, next);
}
