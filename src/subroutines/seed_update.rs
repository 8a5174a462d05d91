//! Commits the scratch word back into the seed.

use super::walk::walk_scratch;
use super::{Fragment, Namespace};
use crate::layout::{bit_symbol, Layout, BITS};
use crate::types::{Direction, TuringMachineError};

/// Builds a fragment that overwrites the seed with the scratch word, bit by bit.
///
/// The scratch word is left in place, so on exit it equals the new seed. The next shift-XOR can
/// consume it directly and the next bit copy clears it anyway. On exit the head is on the first
/// scratch bit.
pub fn seed_update(
    entry: &str,
    exit: &str,
    layout: &Layout,
    ns: &Namespace,
) -> Result<Fragment, TuringMachineError> {
    walk_scratch(entry, exit, layout, ns, |visit| {
        let mut fragment = Fragment::new();

        let mut current = visit.state.clone();
        for step in 1..=visit.index {
            let next = ns.state(format!("seek_{}_{}_{step}", visit.index, visit.bit));
            fragment.goto(&current, &BITS, Direction::Right, &next);
            current = next;
        }

        for symbol in BITS {
            fragment.rule(
                &current,
                symbol,
                bit_symbol(visit.bit),
                Direction::Left,
                &visit.returns[usize::from(visit.bit)],
            );
        }
        fragment
    })
}
