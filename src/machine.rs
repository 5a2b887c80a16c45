//! This module defines the `TuringMachine` struct, which executes a compiled
//! [`Program`] over a fixed set of two-way-infinite tapes: reading head symbols,
//! selecting transitions, writing, shifting, and tracking the step count.

use crate::analyzer::validate_structure;
use crate::tape::Tape;
use crate::types::{Program, Symbol, TuringMachineError};

/// A multi-tape Turing machine.
///
/// The machine owns its tapes and its compiled transition table exclusively;
/// the builder that produced the [`Program`] retains nothing. Execution is
/// single-threaded and fully synchronous: [`TuringMachine::step`] is one
/// atomic read-decide-write-shift unit.
pub struct TuringMachine {
    program: Program,
    tapes: Vec<Tape>,
    current_state: usize,
    num_steps: usize,
    canonical_halting_state: usize,
}

impl TuringMachine {
    /// Creates a machine with all-blank tapes positioned at the program's
    /// starting state.
    ///
    /// The program's structure is validated first: state and tape references
    /// must be dense and in range, and at least one halting state must be
    /// declared.
    pub fn new(program: Program) -> Result<Self, TuringMachineError> {
        validate_structure(&program)?;
        let canonical_halting_state = program
            .canonical_halting_state()
            .ok_or(TuringMachineError::MissingHaltingState)?;
        let tapes = (0..program.num_tapes).map(|_| Tape::new()).collect();

        Ok(Self {
            current_state: program.starting_state,
            num_steps: 0,
            tapes,
            canonical_halting_state,
            program,
        })
    }

    /// True iff the current state is one of the declared halting states.
    pub fn is_halted(&self) -> bool {
        self.program.is_halting(self.current_state)
    }

    /// Writes `symbols` onto tape 0 starting at its current head position,
    /// advancing the head one cell per symbol. With `reset_head` the head is
    /// moved back to position 0 before writing.
    ///
    /// Input may only be loaded before execution starts: once a step has run,
    /// this fails with [`TuringMachineError::InputAfterStart`] and leaves
    /// every tape untouched.
    pub fn set_input_tape_values(
        &mut self,
        symbols: &[Symbol],
        reset_head: bool,
    ) -> Result<(), TuringMachineError> {
        if self.num_steps > 0 {
            return Err(TuringMachineError::InputAfterStart);
        }

        let tape = self
            .tapes
            .first_mut()
            .ok_or_else(|| TuringMachineError::ValidationError("machine has no tapes".to_string()))?;

        if reset_head {
            tape.seek(0);
        }
        tape.set_input(symbols);
        Ok(())
    }

    /// Performs a single step.
    ///
    /// The symbols under all heads are observed, then the current state's
    /// transitions are scanned in registration order and the first match is
    /// applied: move to its target state, write its symbols, shift its heads,
    /// and advance the step counter. When no transition matches, the machine
    /// moves to the canonical halting state instead — an unspecified
    /// transition halts the machine, it does not raise an error.
    ///
    /// Stepping an already-halted machine is a no-op.
    pub fn step(&mut self) {
        if self.is_halted() {
            return;
        }

        let symbols = self.symbols();
        let matched = self.program.transitions[self.current_state]
            .iter()
            .find(|transition| transition.matches(&symbols))
            .cloned();

        match matched {
            Some(transition) => {
                self.current_state = transition.next_state;
                for (&index, &symbol) in &transition.writes {
                    self.tapes[index].write(symbol);
                }
                for (&index, &shift) in &transition.shifts {
                    self.tapes[index].shift(shift);
                }
            }
            None => {
                self.current_state = self.canonical_halting_state;
            }
        }

        self.num_steps += 1;
    }

    /// Runs until the machine halts or, if `max_steps` is given, until the
    /// step counter reaches it. Returns the final step count.
    ///
    /// There is no built-in non-termination detection beyond the optional
    /// cap; callers that need a liveness guarantee must supply `max_steps`.
    pub fn run(&mut self, max_steps: Option<usize>) -> usize {
        while !self.is_halted() && max_steps.is_none_or(|limit| self.num_steps < limit) {
            self.step();
        }

        self.num_steps
    }

    /// Discards all tape contents and returns the machine to its starting
    /// state with a zero step counter.
    pub fn reset(&mut self) {
        self.tapes = (0..self.program.num_tapes).map(|_| Tape::new()).collect();
        self.current_state = self.program.starting_state;
        self.num_steps = 0;
    }

    /// Returns the symbol currently under each tape's head, in tape order.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.tapes.iter().map(Tape::read).collect()
    }

    /// The machine's tapes, in index order.
    pub fn tapes(&self) -> &[Tape] {
        &self.tapes
    }

    /// Shared access to one tape.
    pub fn tape(&self, index: usize) -> &Tape {
        &self.tapes[index]
    }

    /// Mutable access to one tape, e.g. to read a result off the output tape
    /// after the machine halts.
    pub fn tape_mut(&mut self, index: usize) -> &mut Tape {
        &mut self.tapes[index]
    }

    /// The state the machine is currently in.
    pub fn current_state(&self) -> usize {
        self.current_state
    }

    /// Number of steps executed since construction or the last reset.
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// The compiled program this machine executes.
    pub fn program(&self) -> &Program {
        &self.program
    }
}
