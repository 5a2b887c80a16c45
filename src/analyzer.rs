//! This module provides functions for analyzing compiled programs to detect common
//! errors before execution: out-of-range state and tape references, missing halting
//! states, and states that can never be reached.

use crate::types::{Program, TuringMachineError};
use std::collections::HashSet;

/// Problems found while analyzing a [`Program`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The transition table does not line up with the declared state count.
    StructuralError(String),
    /// The starting state is not a valid state id.
    InvalidStartingState(usize),
    /// The program declares no halting state at all.
    NoHaltingStates,
    /// A declared halting state is not a valid state id.
    InvalidHaltingState(usize),
    /// A transition targets a state id that does not exist.
    InvalidTargetState { state: usize, target: usize },
    /// A transition reads, writes, or shifts a tape index that does not exist.
    InvalidTapeIndex { state: usize, tape: usize },
    /// States that cannot be reached from the starting state.
    UnreachableStates(Vec<usize>),
}

impl From<AnalysisError> for TuringMachineError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::StructuralError(message) => TuringMachineError::ValidationError(message),
            AnalysisError::InvalidStartingState(state) => TuringMachineError::ValidationError(
                format!("starting state {state} is out of range"),
            ),
            AnalysisError::NoHaltingStates => TuringMachineError::ValidationError(
                "program declares no halting state".to_string(),
            ),
            AnalysisError::InvalidHaltingState(state) => TuringMachineError::ValidationError(
                format!("halting state {state} is out of range"),
            ),
            AnalysisError::InvalidTargetState { state, target } => {
                TuringMachineError::ValidationError(format!(
                    "transition in state {state} targets unknown state {target}"
                ))
            }
            AnalysisError::InvalidTapeIndex { state, tape } => {
                TuringMachineError::ValidationError(format!(
                    "transition in state {state} references unknown tape {tape}"
                ))
            }
            AnalysisError::UnreachableStates(states) => TuringMachineError::ValidationError(
                format!("unreachable states detected: {states:?}"),
            ),
        }
    }
}

/// Analyzes a compiled [`Program`] for structural and logical errors.
///
/// Runs the full structural validation that [`crate::TuringMachine::new`]
/// enforces, then the reachability lint on top. The first failing check is
/// reported.
pub fn analyze(program: &Program) -> Result<(), TuringMachineError> {
    validate_structure(program)?;
    check_unreachable_states(program).map_err(Into::into)
}

/// Validates the structural invariants a program must satisfy to execute:
/// a transition list per state, all state ids and tape indices in range, and
/// at least one halting state.
pub fn validate_structure(program: &Program) -> Result<(), TuringMachineError> {
    [check_shape, check_state_references, check_tape_references]
        .iter()
        .find_map(|check| check(program).err())
        .map_or(Ok(()), |error| Err(error.into()))
}

fn check_shape(program: &Program) -> Result<(), AnalysisError> {
    if program.transitions.len() != program.num_states {
        return Err(AnalysisError::StructuralError(format!(
            "program declares {} states but carries {} transition lists",
            program.num_states,
            program.transitions.len()
        )));
    }

    Ok(())
}

fn check_state_references(program: &Program) -> Result<(), AnalysisError> {
    if program.starting_state >= program.num_states {
        return Err(AnalysisError::InvalidStartingState(program.starting_state));
    }

    if program.halting_states.is_empty() {
        return Err(AnalysisError::NoHaltingStates);
    }
    if let Some(&state) = program
        .halting_states
        .iter()
        .find(|&&state| state >= program.num_states)
    {
        return Err(AnalysisError::InvalidHaltingState(state));
    }

    for (state, rules) in program.transitions.iter().enumerate() {
        for transition in rules {
            if transition.next_state >= program.num_states {
                return Err(AnalysisError::InvalidTargetState {
                    state,
                    target: transition.next_state,
                });
            }
        }
    }

    Ok(())
}

fn check_tape_references(program: &Program) -> Result<(), AnalysisError> {
    for (state, rules) in program.transitions.iter().enumerate() {
        for transition in rules {
            let referenced = transition
                .reads
                .keys()
                .chain(transition.writes.keys())
                .chain(transition.shifts.keys());

            for &tape in referenced {
                if tape >= program.num_tapes {
                    return Err(AnalysisError::InvalidTapeIndex { state, tape });
                }
            }
        }
    }

    Ok(())
}

/// Flags states that no sequence of transitions can reach.
///
/// Reachability starts from the starting state and follows transition
/// targets. The canonical halting state counts as reachable because every
/// unmatched observation falls into it.
fn check_unreachable_states(program: &Program) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut queue = vec![program.starting_state];
    if let Some(canonical) = program.canonical_halting_state() {
        queue.push(canonical);
    }

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for transition in &program.transitions[state] {
            if !visited.contains(&transition.next_state) {
                queue.push(transition.next_state);
            }
        }
    }

    let mut unreachable: Vec<usize> = (0..program.num_states)
        .filter(|state| !visited.contains(state))
        .collect();

    if !unreachable.is_empty() {
        unreachable.sort_unstable();
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}
