//! Appends the seed to the history log and checks whether it was seen before.

use super::marker::{find_mark, mark, travel, Restore};
use super::{Fragment, Namespace};
use crate::layout::{Layout, BITS, BLANK, ENTRY_END, ENTRY_SEP, SEED_END, SEED_START};
use crate::types::{Direction, TuringMachineError};

/// Builds the cycle detector.
///
/// First the seed is appended to the history region, temporarily terminated by `&`. Then every
/// history entry, oldest first, is compared with the seed bit by bit. The freshly appended entry
/// always matches, so reaching a match tells the detector which one it was:
///
/// * a match on an entry that ends in `$` is an earlier occurrence of the seed, so the detector
///   seals the new entry and ends in `on_cycle`;
/// * a match on the entry ending in `&` means the seed is new, so it seals the entry and ends in
///   `on_continue`.
///
/// Both exits leave the head on `@`, the history ending in `$` and the seed unchanged.
pub fn cycle_detection(
    entry: &str,
    on_continue: &str,
    on_cycle: &str,
    layout: &Layout,
    ns: &Namespace,
) -> Result<Fragment, TuringMachineError> {
    let mut fragment = Fragment::new();

    fragment.pass(entry, &[BLANK, BITS[0], BITS[1]], Direction::Right).rule(
        entry,
        SEED_START,
        SEED_START,
        Direction::Right,
        &ns.state("append_0"),
    );

    fragment.merge(append(layout, ns))?;
    fragment.merge(compare(layout, ns))?;
    fragment.merge(verdict(on_continue, on_cycle, ns))?;

    Ok(fragment)
}

/// Copies the seed to the end of the log and terminates it with `&`.
fn append(layout: &Layout, ns: &Namespace) -> Fragment {
    let crossing = [BITS[0], BITS[1], SEED_END, ENTRY_SEP];
    let seal = ns.state("seal");
    let mut fragment = Fragment::new();

    for index in 0..layout.word_len {
        let state = ns.state(format!("append_{index}"));
        let carries = [0, 1].map(|b| ns.state(format!("append_{index}_carry_{b}")));
        let back = ns.state(format!("append_{index}_back"));
        let after = if index + 1 == layout.word_len {
            seal.clone()
        } else {
            ns.state(format!("append_{}", index + 1))
        };

        mark(
            &mut fragment,
            &state,
            Direction::Right,
            [&carries[0], &carries[1]],
        );
        for bit in 0..2usize {
            fragment.pass(&carries[bit], &crossing, Direction::Right).rule(
                &carries[bit],
                BLANK,
                BITS[bit],
                Direction::Left,
                &back,
            );
        }
        find_mark(
            &mut fragment,
            &back,
            &crossing,
            Direction::Left,
            Restore::Original,
            Direction::Right,
            &after,
        );
    }

    fragment
        .pass(&seal, &crossing, Direction::Right)
        .rule(&seal, BLANK, ENTRY_END, Direction::Left, &ns.state("rewind"));
    travel(
        &mut fragment,
        &ns.state("rewind"),
        &[BITS[0], BITS[1], ENTRY_SEP],
        Direction::Left,
        SEED_END,
        Direction::Right,
        &ns.state("probe_0"),
    );

    fragment
}

/// Compares the log entry under the head with the seed, one bit at a time.
///
/// A mismatch skips to the next entry and starts over. A full match ends in `verdict` with the
/// head on the entry's terminator.
fn compare(layout: &Layout, ns: &Namespace) -> Fragment {
    let crossing = [BITS[0], BITS[1], SEED_END, ENTRY_SEP];
    let miss = ns.state("back_miss");
    let skip = ns.state("skip");
    let mut fragment = Fragment::new();

    for index in 0..layout.word_len {
        let probe = ns.state(format!("probe_{index}"));
        let seeks = [0, 1].map(|b| ns.state(format!("probe_{index}_seek_{b}")));
        let matched = ns.state(format!("probe_{index}_match"));
        let after = if index + 1 == layout.word_len {
            ns.state("verdict")
        } else {
            ns.state(format!("probe_{}", index + 1))
        };

        mark(&mut fragment, &probe, Direction::Left, [&seeks[0], &seeks[1]]);

        for bit in 0..2usize {
            let mut current = ns.state(format!("probe_{index}_seed_{bit}_0"));
            travel(
                &mut fragment,
                &seeks[bit],
                &[BITS[0], BITS[1], ENTRY_SEP, SEED_END],
                Direction::Left,
                SEED_START,
                Direction::Right,
                &current,
            );
            for step in 1..=index {
                let next = ns.state(format!("probe_{index}_seed_{bit}_{step}"));
                fragment.goto(&current, &BITS, Direction::Right, &next);
                current = next;
            }
            fragment
                .rule(&current, BITS[bit], BITS[bit], Direction::Right, &matched)
                .rule(&current, BITS[1 - bit], BITS[1 - bit], Direction::Right, &miss);
        }

        find_mark(
            &mut fragment,
            &matched,
            &crossing,
            Direction::Right,
            Restore::Original,
            Direction::Right,
            &after,
        );
    }

    find_mark(
        &mut fragment,
        &miss,
        &crossing,
        Direction::Right,
        Restore::Original,
        Direction::Right,
        &skip,
    );
    travel(
        &mut fragment,
        &skip,
        &BITS,
        Direction::Right,
        ENTRY_SEP,
        Direction::Right,
        &ns.state("probe_0"),
    );

    fragment
}

/// Seals the new entry and walks home to `@`.
fn verdict(on_continue: &str, on_cycle: &str, ns: &Namespace) -> Fragment {
    let verdict = ns.state("verdict");
    let seal_found = ns.state("seal_found");
    let home_continue = ns.state("home_continue");
    let home_found = ns.state("home_found");
    let mut fragment = Fragment::new();

    fragment
        .rule(&verdict, ENTRY_SEP, ENTRY_SEP, Direction::Right, &seal_found)
        .rule(&verdict, ENTRY_END, ENTRY_SEP, Direction::Left, &home_continue);
    fragment
        .pass(&seal_found, &[BITS[0], BITS[1], ENTRY_SEP], Direction::Right)
        .rule(&seal_found, ENTRY_END, ENTRY_SEP, Direction::Left, &home_found);

    for (home, exit) in [(&home_continue, on_continue), (&home_found, on_cycle)] {
        travel(
            &mut fragment,
            home,
            &[BITS[0], BITS[1], ENTRY_SEP, SEED_END],
            Direction::Left,
            SEED_START,
            Direction::Stay,
            exit,
        );
    }

    fragment
}
