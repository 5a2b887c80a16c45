//! This module defines the core data structures and types used throughout the Turing
//! Machine simulator: tape symbols, head shifts, transitions, compiled programs, and
//! error types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Contents of one cell on a tape.
///
/// The alphabet of this machine model is fixed: a cell is either blank or holds
/// one binary digit. Cells that were never written read as [`Symbol::Blank`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// An empty cell. This is the default content of the entire tape.
    #[default]
    Blank,
    /// The binary digit `0`.
    Zero,
    /// The binary digit `1`.
    One,
}

impl Symbol {
    /// Renders the symbol as a single character, `_`/`0`/`1`.
    pub fn as_char(self) -> char {
        match self {
            Symbol::Blank => '_',
            Symbol::Zero => '0',
            Symbol::One => '1',
        }
    }

    /// Maps the lowest bit of `bit` to [`Symbol::Zero`] or [`Symbol::One`].
    pub fn from_bit(bit: u64) -> Self {
        if bit & 1 == 1 {
            Symbol::One
        } else {
            Symbol::Zero
        }
    }
}

/// Movement of a tape head after a transition writes its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shift {
    /// Move the head one position to the left.
    Left,
    /// Keep the head in the same position.
    Stay,
    /// Move the head one position to the right.
    Right,
}

impl Shift {
    /// The signed head displacement: -1, 0, or +1.
    pub fn offset(self) -> i64 {
        match self {
            Shift::Left => -1,
            Shift::Stay => 0,
            Shift::Right => 1,
        }
    }
}

/// Per-tape accept specification used when registering transitions with the builder.
///
/// A pattern constrains what one tape head must be reading for a transition to
/// apply. `AnyOf` lists several acceptable symbols; the builder expands every
/// `AnyOf` into concrete transitions via a Cartesian product, so the compiled
/// [`Transition`]s only ever contain exact symbols. A tape index that is given
/// no pattern at all is unconstrained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Exactly this symbol must be under the head.
    One(Symbol),
    /// Any of these symbols may be under the head.
    AnyOf(Vec<Symbol>),
}

impl Pattern {
    /// The symbols this pattern accepts, in registration order.
    pub fn candidates(&self) -> &[Symbol] {
        match self {
            Pattern::One(symbol) => std::slice::from_ref(symbol),
            Pattern::AnyOf(symbols) => symbols,
        }
    }
}

impl From<Symbol> for Pattern {
    fn from(symbol: Symbol) -> Self {
        Pattern::One(symbol)
    }
}

impl From<Vec<Symbol>> for Pattern {
    fn from(symbols: Vec<Symbol>) -> Self {
        Pattern::AnyOf(symbols)
    }
}

impl<const N: usize> From<[Symbol; N]> for Pattern {
    fn from(symbols: [Symbol; N]) -> Self {
        Pattern::AnyOf(symbols.to_vec())
    }
}

/// A single compiled transition rule.
///
/// Only the tape indices a rule actually cares about are stored. Any index
/// absent from `reads` imposes no constraint, any index absent from `writes`
/// leaves its cell unchanged, and any index absent from `shifts` keeps its
/// head where it is. Storing sparse maps instead of dense per-tape rows is
/// what keeps a T-tape machine from needing 3^T rules between state pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Accept-condition: tape index to the symbol that must be under its head.
    pub reads: BTreeMap<usize, Symbol>,
    /// Symbols to write, by tape index.
    pub writes: BTreeMap<usize, Symbol>,
    /// Head shifts to apply after writing, by tape index.
    pub shifts: BTreeMap<usize, Shift>,
    /// The state the machine moves to when this transition is taken.
    pub next_state: usize,
}

impl Transition {
    /// Determines whether the observed head symbols satisfy the accept-condition.
    ///
    /// `symbols` holds one symbol per tape, in tape order. The check is a
    /// conjunction over every constrained index; unconstrained indices match
    /// anything.
    pub fn matches(&self, symbols: &[Symbol]) -> bool {
        self.reads
            .iter()
            .all(|(&index, &expected)| symbols[index] == expected)
    }
}

/// Convenience carrier for transitions that touch exactly one tape.
///
/// Each field may be `None`, meaning the corresponding constraint or action is
/// omitted entirely. This is distinct from reading or writing
/// [`Symbol::Blank`], which is an exact constraint on (or write of) an empty
/// cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SingleTapeTransition {
    /// Required symbol under the head, if any.
    pub read: Option<Symbol>,
    /// Symbol to write, if any.
    pub write: Option<Symbol>,
    /// Head shift to apply, if any.
    pub shift: Option<Shift>,
}

impl SingleTapeTransition {
    pub fn new(read: Option<Symbol>, write: Option<Symbol>, shift: Option<Shift>) -> Self {
        Self { read, write, shift }
    }
}

/// A frozen machine description produced by the builder.
///
/// State ids are dense in `[0, num_states)` and tape indices are dense in
/// `[0, num_tapes)`. `transitions` is indexed by state id; each state's list
/// is tried in registration order and the first match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Total number of states, including halting states.
    pub num_states: usize,
    /// Number of tapes the machine operates on.
    pub num_tapes: usize,
    /// The state execution starts from.
    pub starting_state: usize,
    /// States in which the machine stops advancing. Never empty for a valid
    /// program.
    pub halting_states: BTreeSet<usize>,
    /// Candidate transitions per state, in registration order.
    pub transitions: Vec<Vec<Transition>>,
}

impl Program {
    /// Whether `state` is one of the declared halting states.
    pub fn is_halting(&self, state: usize) -> bool {
        self.halting_states.contains(&state)
    }

    /// The halting state unmatched steps default to: the smallest declared
    /// halting id, i.e. the earliest one the builder allocated.
    pub fn canonical_halting_state(&self) -> Option<usize> {
        self.halting_states.first().copied()
    }

    /// Total number of compiled transitions across all states.
    pub fn transition_count(&self) -> usize {
        self.transitions.iter().map(|rules| rules.len()).sum()
    }
}

/// Errors surfaced by the builder and the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuringMachineError {
    /// Input may only be loaded before the first step has executed.
    #[error("cannot set input tape values after the machine has started running")]
    InputAfterStart,
    /// The builder was finalized without a starting state.
    #[error("must set a starting state before creating the machine")]
    MissingStartingState,
    /// The builder was finalized without any halting state.
    #[error("must declare at least one halting state before creating the machine")]
    MissingHaltingState,
    /// A compiled program failed structural validation.
    #[error("program validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_offsets() {
        assert_eq!(Shift::Left.offset(), -1);
        assert_eq!(Shift::Stay.offset(), 0);
        assert_eq!(Shift::Right.offset(), 1);
    }

    #[test]
    fn test_symbol_defaults_to_blank() {
        assert_eq!(Symbol::default(), Symbol::Blank);
        assert_eq!(Symbol::from_bit(0), Symbol::Zero);
        assert_eq!(Symbol::from_bit(1), Symbol::One);
    }

    #[test]
    fn test_pattern_candidates() {
        let one = Pattern::from(Symbol::Zero);
        assert_eq!(one.candidates(), &[Symbol::Zero]);

        let set = Pattern::from([Symbol::Zero, Symbol::One]);
        assert_eq!(set.candidates(), &[Symbol::Zero, Symbol::One]);
    }

    #[test]
    fn test_transition_matching_is_conjunctive() {
        let transition = Transition {
            reads: BTreeMap::from([(0, Symbol::One), (2, Symbol::Zero)]),
            writes: BTreeMap::new(),
            shifts: BTreeMap::new(),
            next_state: 1,
        };

        // Tape 1 is unconstrained and may hold anything.
        assert!(transition.matches(&[Symbol::One, Symbol::Blank, Symbol::Zero]));
        assert!(transition.matches(&[Symbol::One, Symbol::One, Symbol::Zero]));

        // Either constrained index failing rejects the whole tuple.
        assert!(!transition.matches(&[Symbol::Zero, Symbol::Blank, Symbol::Zero]));
        assert!(!transition.matches(&[Symbol::One, Symbol::Blank, Symbol::One]));
    }

    #[test]
    fn test_empty_accept_condition_matches_everything() {
        let transition = Transition {
            reads: BTreeMap::new(),
            writes: BTreeMap::new(),
            shifts: BTreeMap::new(),
            next_state: 0,
        };

        assert!(transition.matches(&[Symbol::Blank, Symbol::One]));
        assert!(transition.matches(&[]));
    }

    #[test]
    fn test_program_serialization_round_trip() {
        let program = Program {
            num_states: 2,
            num_tapes: 1,
            starting_state: 0,
            halting_states: BTreeSet::from([1]),
            transitions: vec![
                vec![Transition {
                    reads: BTreeMap::from([(0, Symbol::One)]),
                    writes: BTreeMap::from([(0, Symbol::Zero)]),
                    shifts: BTreeMap::from([(0, Shift::Right)]),
                    next_state: 1,
                }],
                Vec::new(),
            ],
        };

        let json = serde_json::to_string(&program).unwrap();
        let decoded: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, program);
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::ValidationError("bad target".to_string());
        let message = format!("{}", error);
        assert!(message.contains("validation"));
        assert!(message.contains("bad target"));
    }
}
