//! XORs a shifted copy of the seed into the scratch word.

use super::walk::{walk_scratch, Visit};
use super::{Fragment, Namespace};
use crate::layout::{Layout, BITS};
use crate::types::{Direction, TuringMachineError};

/// Builds a fragment computing `scratch[i] ^= seed[i + offset]` for every scratch bit `i`.
///
/// Bits are indexed from the left (most significant first), so a positive offset XORs in the seed
/// shifted left and a negative offset the seed shifted right. Seed positions outside
/// `0..word_len` read as zero and leave the scratch bit alone. An offset of zero therefore clears
/// a scratch word that holds a copy of the seed.
///
/// The seed is never written. On exit the head is on the first scratch bit.
pub fn shift_xor(
    entry: &str,
    exit: &str,
    offset: isize,
    layout: &Layout,
    ns: &Namespace,
) -> Result<Fragment, TuringMachineError> {
    let word_len = layout.word_len;

    walk_scratch(entry, exit, layout, ns, |visit| {
        let mut fragment = Fragment::new();
        let keep = &visit.returns[usize::from(visit.bit)];

        let target = isize::try_from(visit.index)
            .ok()
            .and_then(|index| index.checked_add(offset))
            .and_then(|target| usize::try_from(target).ok())
            .filter(|&target| target < word_len);
        let Some(target) = target else {
            fragment.goto(&visit.state, &BITS, Direction::Left, keep);
            return fragment;
        };

        let probe = seek(&mut fragment, visit, ns, target);
        for seed_bit in 0..2u8 {
            fragment.rule(
                &probe,
                BITS[usize::from(seed_bit)],
                BITS[usize::from(seed_bit)],
                Direction::Left,
                &visit.returns[usize::from(visit.bit ^ seed_bit)],
            );
        }
        fragment
    })
}

/// Walks `distance` cells right from the visit state and returns the state that reads the target.
fn seek(fragment: &mut Fragment, visit: &Visit, ns: &Namespace, distance: usize) -> String {
    let mut current = visit.state.clone();
    for step in 1..=distance {
        let next = ns.state(format!("seek_{}_{}_{step}", visit.index, visit.bit));
        fragment.goto(&current, &BITS, Direction::Right, &next);
        current = next;
    }
    current
}
