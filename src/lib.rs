//! This crate provides the core logic for a multi-tape Turing machine simulator
//! aimed at binary integer arithmetic. It includes an execution engine over
//! sparse two-way-infinite tapes, an incremental builder that compiles sparse
//! pattern-based transition requests into concrete per-state transition tables,
//! a pre-execution program analyzer, an integer codec for the tape boundary,
//! and a catalog of ready-made machines (grade-school multiplication).

pub mod analyzer;
pub mod builder;
pub mod encoder;
pub mod machine;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `TuringMachineBuilder` struct from the builder module.
pub use builder::TuringMachineBuilder;
/// Re-exports the integer codec functions from the encoder module.
pub use encoder::{decode, encode, encode_operands, read_binary};
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the machine catalog and authoring helpers from the programs module.
pub use programs::{
    copy_word, erase_word, grade_school, move_across_word, TapeDirection, OUTPUT_TAPE,
};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the core value types from the types module.
pub use types::{
    Pattern, Program, Shift, SingleTapeTransition, Symbol, Transition, TuringMachineError,
};
