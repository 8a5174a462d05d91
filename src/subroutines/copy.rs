//! Copies the seed into the scratch region.

use super::marker::{mark, restore, travel, Restore};
use super::{Fragment, Namespace};
use crate::layout::{bit_symbol, BITS, BLANK, MARKS, SEED_END, SEED_START};
use crate::types::Direction;

/// Builds a fragment that replaces the scratch word with a copy of the seed.
///
/// Any stale scratch bits are cleared first. The seed is then copied from its last bit to its
/// first, each bit being marked, carried left past `@` and written on the first blank, so the
/// scratch word ends up in the same order as the seed. Finally all markers are restored.
///
/// The fragment works for any word length. On exit the seed is unchanged and the head is on the
/// first scratch bit.
pub fn bit_copy(entry: &str, exit: &str, ns: &Namespace) -> Fragment {
    let seek_start = ns.state("seek_start");
    let clear = ns.state("clear");
    let to_end = ns.state("to_end");
    let find = ns.state("find");
    let unmark = ns.state("unmark");
    let rewind = ns.state("rewind");
    let home = ns.state("home");
    let carries = [0, 1].map(|b| ns.state(format!("carry_{b}")));
    let drops = [0, 1].map(|b| ns.state(format!("drop_{b}")));

    let mut fragment = Fragment::new();

    travel(
        &mut fragment,
        entry,
        &[BITS[0], BITS[1], BLANK, SEED_START],
        Direction::Right,
        SEED_END,
        Direction::Left,
        &seek_start,
    );
    travel(
        &mut fragment,
        &seek_start,
        &BITS,
        Direction::Left,
        SEED_START,
        Direction::Left,
        &clear,
    );

    for bit in BITS {
        fragment.rule(&clear, bit, BLANK, Direction::Left, &clear);
    }
    fragment.rule(&clear, BLANK, BLANK, Direction::Right, &to_end);

    travel(
        &mut fragment,
        &to_end,
        &[BITS[0], BITS[1], BLANK, SEED_START, MARKS[0], MARKS[1]],
        Direction::Right,
        SEED_END,
        Direction::Left,
        &find,
    );

    fragment.pass(&find, &MARKS, Direction::Left);
    mark(&mut fragment, &find, Direction::Left, [&carries[0], &carries[1]]);
    fragment.rule(&find, SEED_START, SEED_START, Direction::Right, &unmark);

    for bit in 0..2u8 {
        let carry = &carries[usize::from(bit)];
        let drop = &drops[usize::from(bit)];

        travel(
            &mut fragment,
            carry,
            &BITS,
            Direction::Left,
            SEED_START,
            Direction::Left,
            drop,
        );
        fragment
            .pass(drop, &BITS, Direction::Left)
            .rule(drop, BLANK, bit_symbol(bit), Direction::Right, &to_end);
    }

    restore(&mut fragment, &unmark, Restore::Original, Direction::Right, &unmark);
    fragment.rule(&unmark, SEED_END, SEED_END, Direction::Left, &rewind);

    travel(
        &mut fragment,
        &rewind,
        &BITS,
        Direction::Left,
        SEED_START,
        Direction::Left,
        &home,
    );
    travel(
        &mut fragment,
        &home,
        &BITS,
        Direction::Left,
        BLANK,
        Direction::Right,
        exit,
    );

    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{scratch, seed};
    use crate::subroutines::testing::{run, trimmed};

    fn copy(tape: &str, head: usize) -> crate::machine::TuringMachine {
        run(
            bit_copy("copy", "done", &Namespace::new("copy")),
            "copy",
            &["done"],
            tape,
            head,
        )
    }

    #[test]
    fn test_copy_into_empty_scratch() {
        let machine = copy("________@110010#____", 9);
        let tape = machine.tape().to_string();

        assert_eq!(trimmed(&machine), "110010@110010#");
        assert_eq!(scratch(&tape), Some("110010"));
        assert_eq!(seed(&tape), Some("110010"));
        assert_eq!(machine.symbol(), '1');
        assert_eq!(machine.tape().get(machine.head() - 1), BLANK);
    }

    #[test]
    fn test_copy_replaces_stale_scratch() {
        let machine = copy("____0111@1000#____", 0);

        assert_eq!(trimmed(&machine), "1000@1000#");
    }

    #[test]
    fn test_copy_single_bit() {
        let machine = copy("__@0#__", 3);

        assert_eq!(trimmed(&machine), "0@0#");
        assert_eq!(machine.symbol(), '0');
    }

    #[test]
    fn test_copy_leaves_history_alone() {
        let machine = copy("____@01#01$10$___", 5);

        assert_eq!(trimmed(&machine), "01@01#01$10$");
    }

    #[test]
    fn test_copy_state_names() {
        let fragment = bit_copy("cycle", "shift_a", &Namespace::new("copy"));

        assert_eq!(fragment.len(), 12);
        assert!(fragment.contains("cycle"));
        assert!(!fragment.contains("shift_a"));
        assert!(fragment
            .states()
            .filter(|s| *s != "cycle")
            .all(|s| s.starts_with("copy.")));
    }
}
