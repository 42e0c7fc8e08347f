//! This module inspects compiled programs for irregularities the interpreter tolerates but
//! that usually point at a compiler bug or a hand-built table: duplicate keys, states that
//! only handle one symbol, and states that can never be reached.

use crate::types::{Program, State, Symbol};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use thiserror::Error;

/// Represents the irregularities found during the analysis of a program.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum AnalysisError {
    /// More than one quadruplet shares the same `(state, symbol)` key. Only the first one
    /// can ever fire.
    #[error("Duplicate transitions for: {0:?}")]
    DuplicateTransitions(Vec<(State, Symbol)>),
    /// States with a transition for one symbol but not the other. The machine halts when it
    /// reads the missing symbol in that state.
    #[error("States handling a single symbol: {0:?}")]
    PartialStates(Vec<State>),
    /// States with outgoing transitions that cannot be reached from the entry state.
    #[error("Unreachable states detected: {0:?}")]
    UnreachableStates(Vec<State>),
}

/// Runs every check against `program` and collects the findings.
///
/// Tables produced by the compiler never contain duplicate keys or partial states. They do
/// contain unreachable states: the code following an `end` is never executed.
pub fn analyze(program: &Program) -> Vec<AnalysisError> {
    [
        check_duplicates,
        check_partial_states,
        check_unreachable_states,
    ]
    .iter()
    .filter_map(|f| f(program).err())
    .collect()
}

/// Checks that every `(state, symbol)` key appears at most once.
fn check_duplicates(program: &Program) -> Result<(), AnalysisError> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for q in program {
        let key = (q.from, q.read);
        if !seen.insert(key) && !duplicates.contains(&key) {
            duplicates.push(key);
        }
    }

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::DuplicateTransitions(duplicates))
    }
}

/// Checks that every state with transitions handles both symbols.
fn check_partial_states(program: &Program) -> Result<(), AnalysisError> {
    let mut symbols: BTreeMap<State, BTreeSet<Symbol>> = BTreeMap::new();
    for q in program {
        symbols.entry(q.from).or_default().insert(q.read);
    }

    let partial: Vec<State> = symbols
        .into_iter()
        .filter(|(_, read)| read.len() < Symbol::ALL.len())
        .map(|(state, _)| state)
        .collect();

    if partial.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::PartialStates(partial))
    }
}

/// Checks that every state with transitions is reachable from the entry state.
fn check_unreachable_states(program: &Program) -> Result<(), AnalysisError> {
    let mut successors: HashMap<State, Vec<State>> = HashMap::new();
    for q in program {
        successors.entry(q.from).or_default().push(q.to);
    }

    let mut reachable = HashSet::new();
    let mut pending = vec![program.entry];

    while let Some(state) = pending.pop() {
        if !reachable.insert(state) {
            continue;
        }
        if let Some(next) = successors.get(&state) {
            pending.extend(next);
        }
    }

    let unreachable: BTreeSet<State> = successors
        .into_keys()
        .filter(|state| !reachable.contains(state))
        .collect();

    if unreachable.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::UnreachableStates(
            unreachable.into_iter().collect(),
        ))
    }
}
