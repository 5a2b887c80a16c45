//! This module defines the `TuringMachineBuilder`, the incremental compiler that
//! turns high-level transition requests into the concrete per-state transition
//! table of a [`Program`].

use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::machine::TuringMachine;
use crate::types::{
    Pattern, Program, Shift, SingleTapeTransition, Symbol, Transition, TuringMachineError,
};

/// Iteratively builds up a [`TuringMachine`].
///
/// States and tapes are allocated as dense integer ids. Both can be registered
/// under a name, in which case registration is idempotent: asking for the same
/// name again returns the existing id instead of allocating a new one. The
/// builder is a mutable accumulator consumed exactly once by
/// [`TuringMachineBuilder::create`]; the machine it produces shares no state
/// with it.
#[derive(Debug, Default)]
pub struct TuringMachineBuilder {
    num_states: usize,
    num_tapes: usize,
    transitions: HashMap<usize, Vec<Transition>>,
    named_states: HashMap<String, usize>,
    named_tapes: HashMap<String, usize>,
    starting_state: Option<usize>,
    halting_states: BTreeSet<usize>,
}

impl TuringMachineBuilder {
    /// Creates an empty builder: no states, no tapes, no transitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh anonymous state and returns its id.
    pub fn create_state(&mut self, halting: bool) -> usize {
        let state = self.num_states;
        if halting {
            self.halting_states.insert(state);
        }
        self.num_states += 1;
        state
    }

    /// Returns the state registered under `name`, allocating it first if this
    /// is the name's first use. `halting` only takes effect on allocation; it
    /// is ignored when fetching an existing state.
    pub fn get_or_create_state(&mut self, name: &str, halting: bool) -> usize {
        if let Some(&state) = self.named_states.get(name) {
            return state;
        }

        let state = self.create_state(halting);
        self.named_states.insert(name.to_string(), state);
        state
    }

    /// Returns the tape index registered under `name`, allocating a new tape
    /// first if this is the name's first use.
    pub fn get_or_create_tape_index(&mut self, name: &str) -> usize {
        if let Some(&index) = self.named_tapes.get(name) {
            return index;
        }

        let index = self.num_tapes;
        self.named_tapes.insert(name.to_string(), index);
        self.num_tapes += 1;
        index
    }

    /// Designates the state execution starts from. Required before
    /// [`TuringMachineBuilder::create`].
    pub fn set_starting_state(&mut self, state: usize) {
        self.starting_state = Some(state);
    }

    /// Registers transitions from `old_state` to `new_state`.
    ///
    /// `accept` constrains what each listed tape must be reading; a
    /// [`Pattern::AnyOf`] accepts several symbols at once. The builder
    /// expands the Cartesian product across all `AnyOf` patterns and emits
    /// one concrete [`Transition`] per combination, every one of them sharing
    /// `new_state`, `writes`, and `shifts`. Tape indices absent from `accept`
    /// are unconstrained; an empty `accept` registers a single transition
    /// taken unconditionally.
    pub fn add_transition(
        &mut self,
        old_state: usize,
        new_state: usize,
        accept: &[(usize, Pattern)],
        writes: &[(usize, Symbol)],
        shifts: &[(usize, Shift)],
    ) {
        let writes: BTreeMap<usize, Symbol> = writes.iter().copied().collect();
        let shifts: BTreeMap<usize, Shift> = shifts.iter().copied().collect();

        if accept.is_empty() {
            // multi_cartesian_product yields nothing for an empty product, so
            // the unconditional transition is emitted directly.
            self.push_transition(
                old_state,
                Transition {
                    reads: BTreeMap::new(),
                    writes,
                    shifts,
                    next_state: new_state,
                },
            );
            return;
        }

        let read_choices: Vec<Vec<(usize, Symbol)>> = accept
            .iter()
            .map(|(index, pattern)| {
                pattern
                    .candidates()
                    .iter()
                    .map(|&symbol| (*index, symbol))
                    .collect()
            })
            .collect();

        for combination in read_choices.into_iter().multi_cartesian_product() {
            self.push_transition(
                old_state,
                Transition {
                    reads: combination.into_iter().collect(),
                    writes: writes.clone(),
                    shifts: shifts.clone(),
                    next_state: new_state,
                },
            );
        }
    }

    /// Registers a transition that reads, writes, and shifts exactly one tape.
    ///
    /// Any `None` field of `single_transition` omits that constraint or
    /// action entirely, which is not the same as matching or writing
    /// [`Symbol::Blank`].
    pub fn add_single_tape_transition(
        &mut self,
        old_state: usize,
        new_state: usize,
        tape_index: usize,
        single_transition: SingleTapeTransition,
    ) {
        let reads: BTreeMap<usize, Symbol> = single_transition
            .read
            .map(|symbol| (tape_index, symbol))
            .into_iter()
            .collect();
        let writes: BTreeMap<usize, Symbol> = single_transition
            .write
            .map(|symbol| (tape_index, symbol))
            .into_iter()
            .collect();
        let shifts: BTreeMap<usize, Shift> = single_transition
            .shift
            .map(|shift| (tape_index, shift))
            .into_iter()
            .collect();

        self.push_transition(
            old_state,
            Transition {
                reads,
                writes,
                shifts,
                next_state: new_state,
            },
        );
    }

    /// Freezes the accumulated states, tapes, and transitions into an
    /// immutable [`Program`].
    ///
    /// Fails if no starting state was set, if no halting state was declared,
    /// or if transitions were registered for a state id that was never
    /// allocated.
    pub fn into_program(self) -> Result<Program, TuringMachineError> {
        let starting_state = self
            .starting_state
            .ok_or(TuringMachineError::MissingStartingState)?;
        if self.halting_states.is_empty() {
            return Err(TuringMachineError::MissingHaltingState);
        }

        if let Some(&state) = self
            .transitions
            .keys()
            .find(|&&state| state >= self.num_states)
        {
            return Err(TuringMachineError::ValidationError(format!(
                "transitions registered for unknown state {state}"
            )));
        }

        let mut by_state = self.transitions;
        let transitions = (0..self.num_states)
            .map(|state| by_state.remove(&state).unwrap_or_default())
            .collect();

        Ok(Program {
            num_states: self.num_states,
            num_tapes: self.num_tapes,
            starting_state,
            halting_states: self.halting_states,
            transitions,
        })
    }

    /// Freezes the builder and wraps the program in a ready-to-run
    /// [`TuringMachine`] with blank tapes.
    pub fn create(self) -> Result<TuringMachine, TuringMachineError> {
        TuringMachine::new(self.into_program()?)
    }

    /// Number of states allocated so far.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Number of tapes allocated so far.
    pub fn num_tapes(&self) -> usize {
        self.num_tapes
    }

    fn push_transition(&mut self, old_state: usize, transition: Transition) {
        self.transitions.entry(old_state).or_default().push(transition);
    }
}
