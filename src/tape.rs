//! This module defines the `Tape` struct: an unbounded, two-way-infinite sequence of
//! symbol cells with one read/write head.

use defaultmap::{defaulthashmap, DefaultHashMap};

use crate::types::{Shift, Symbol};

/// One tape of a multi-tape Turing machine.
///
/// Cells are addressed by an `i64` position and stored sparsely; any position
/// that was never written reads as [`Symbol::Blank`]. The head starts at
/// position 0 and may move arbitrarily far in either direction — the tape
/// never bounds its position range.
#[derive(Debug, Clone)]
pub struct Tape {
    head: i64,
    cells: DefaultHashMap<i64, Symbol>,
}

impl Tape {
    /// Creates an all-blank tape with the head at position 0.
    pub fn new() -> Self {
        Self {
            head: 0,
            // Missing cells yield Symbol::Blank, the symbol's default.
            cells: defaulthashmap!(),
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> Symbol {
        self.cells[self.head]
    }

    /// Writes `symbol` into the cell under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head by the shift's signed offset.
    pub fn shift(&mut self, shift: Shift) {
        self.head += shift.offset();
    }

    /// Writes `symbols` starting at the current head position, advancing the
    /// head one cell to the right per symbol written.
    pub fn set_input(&mut self, symbols: &[Symbol]) {
        for &symbol in symbols {
            self.write(symbol);
            self.shift(Shift::Right);
        }
    }

    /// The current head position.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// Moves the head directly to `position`.
    pub fn seek(&mut self, position: i64) {
        self.head = position;
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}
