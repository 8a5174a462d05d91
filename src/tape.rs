//! The conceptually bi-infinite tape, materialized as a growable buffer plus a head index.

use crate::types::Direction;
use std::collections::VecDeque;
use std::fmt;

/// A single tape with a read/write head.
///
/// Cells outside the materialized range read as the blank symbol. They are materialized when the
/// head moves onto them or when something is written there. Growth on either end is amortized
/// constant time, so long runs that extend the tape thousands of times stay cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<char>,
    head: usize,
    blank: char,
}

impl Tape {
    /// Creates a tape from the given cells with the head at `head`.
    ///
    /// An empty tape gets one blank cell. A head beyond the end materializes blanks up to it.
    pub fn new(cells: impl IntoIterator<Item = char>, head: usize, blank: char) -> Self {
        let mut cells: VecDeque<char> = cells.into_iter().collect();
        if head >= cells.len() {
            cells.resize(head + 1, blank);
        }

        Self { cells, head, blank }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> char {
        self.cells.get(self.head).copied().unwrap_or(self.blank)
    }

    /// Writes `symbol` under the head.
    pub fn write(&mut self, symbol: char) {
        self.cells[self.head] = symbol;
    }

    /// Writes `symbol` at `position`, relative to index 0 of the current buffer.
    ///
    /// Negative positions prepend blanks first; the head index is shifted by the same amount so it
    /// keeps pointing at the same logical cell. Returns the buffer index that was written.
    pub fn write_at(&mut self, position: isize, symbol: char) -> usize {
        let index = self.materialize(position);
        self.cells[index] = symbol;
        index
    }

    /// Moves the head one cell, extending the tape with a blank when it walks off either end.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.head == 0 {
                    self.cells.push_front(self.blank);
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head >= self.cells.len() {
                    self.cells.push_back(self.blank);
                }
            }
            Direction::Stay => {}
        }
    }

    /// Returns the head index into the materialized cells.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the blank symbol of this tape.
    pub fn blank(&self) -> char {
        self.blank
    }

    /// Returns the number of materialized cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the symbol at buffer index `index`, or blank outside the materialized range.
    pub fn get(&self, index: usize) -> char {
        self.cells.get(index).copied().unwrap_or(self.blank)
    }

    /// Iterates the materialized cells from left to right.
    pub fn cells(&self) -> impl Iterator<Item = char> + '_ {
        self.cells.iter().copied()
    }

    /// Makes `position` addressable and returns its buffer index.
    fn materialize(&mut self, position: isize) -> usize {
        if position < 0 {
            let missing = position.unsigned_abs();
            self.cells.reserve(missing);
            for _ in 0..missing {
                self.cells.push_front(self.blank);
            }
            self.head += missing;
            return 0;
        }

        let index = position as usize;
        if index >= self.cells.len() {
            self.cells.resize(index + 1, self.blank);
        }
        index
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{cell}")?;
        }
        Ok(())
    }
}
