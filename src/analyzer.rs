//! This module provides the checks run on an imported automaton specification before it is
//! turned into an `Automaton`. Every identifier the specification mentions must be declared
//! in `q`, and `q` itself must not declare a state twice.

use crate::types::{AutomatonError, AutomatonSpec, Symbol};
use std::collections::HashSet;

/// Represents the problems that can be found in an automaton specification.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The specification declares no state at all.
    NoStates,
    /// The same state identifier appears more than once in `q`.
    DuplicateStates(Vec<String>),
    /// The initial state is not declared in `q`.
    InvalidInitialState(String),
    /// Accepting states that are not declared in `q`.
    UndeclaredAcceptingStates(Vec<String>),
    /// `delta` has entries for states that are not declared in `q`.
    UndeclaredSources(Vec<String>),
    /// Transitions reference destination states that are not declared in `q`.
    UndeclaredDestinations(Vec<String>),
    /// A transition lists no destination at all.
    EmptyDestinations(String, Symbol),
}

impl From<AnalysisError> for AutomatonError {
    /// Converts an `AnalysisError` into an `AutomatonError::ParseError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::NoStates => {
                AutomatonError::ParseError("No states declared in q".to_string())
            }
            AnalysisError::DuplicateStates(states) => {
                AutomatonError::ParseError(format!("States declared more than once: {:?}", states))
            }
            AnalysisError::InvalidInitialState(state) => AutomatonError::ParseError(format!(
                "Initial state '{}' is not declared in q",
                state
            )),
            AnalysisError::UndeclaredAcceptingStates(states) => AutomatonError::ParseError(
                format!("Accepting states not declared in q: {:?}", states),
            ),
            AnalysisError::UndeclaredSources(states) => AutomatonError::ParseError(format!(
                "Transitions leave states not declared in q: {:?}",
                states
            )),
            AnalysisError::UndeclaredDestinations(states) => AutomatonError::ParseError(
                format!("Transitions reference states not declared in q: {:?}", states),
            ),
            AnalysisError::EmptyDestinations(state, symbol) => AutomatonError::ParseError(
                format!("Transition from '{}' on '{}' has no destination", state, symbol),
            ),
        }
    }
}

/// Analyzes an `AutomatonSpec` for inconsistencies.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(AutomatonError::ParseError)` describing the first violated check.
pub fn analyze(spec: &AutomatonSpec) -> Result<(), AutomatonError> {
    let errors = [
        check_states,
        check_initial_state,
        check_accepting_states,
        check_sources,
        check_destinations,
    ]
    .iter()
    .filter_map(|f| f(spec).err())
    .collect::<Vec<_>>();

    match errors.into_iter().next() {
        Some(first_error) => Err(first_error.into()),
        None => Ok(()),
    }
}

/// Returns the transition symbols that `sigma` does not list, epsilon excluded.
///
/// These are not errors: the importer adds them to the alphabet.
pub fn undeclared_symbols(spec: &AutomatonSpec) -> Vec<Symbol> {
    let declared: HashSet<&Symbol> = spec.sigma.iter().collect();
    let mut missing = Vec::new();

    for symbol in spec.delta.values().flat_map(|map| map.keys()) {
        if !symbol.is_epsilon() && !declared.contains(symbol) && !missing.contains(symbol) {
            missing.push(symbol.clone());
        }
    }

    missing
}

fn declared(spec: &AutomatonSpec) -> HashSet<&str> {
    spec.q.iter().map(String::as_str).collect()
}

/// Checks that `q` is non-empty and free of duplicates.
fn check_states(spec: &AutomatonSpec) -> Result<(), AnalysisError> {
    if spec.q.is_empty() {
        return Err(AnalysisError::NoStates);
    }

    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = spec
        .q
        .iter()
        .filter(|state| !seen.insert(state.as_str()))
        .cloned()
        .collect();

    if duplicates.is_empty() {
        Ok(())
    } else {
        duplicates.sort();
        duplicates.dedup();
        Err(AnalysisError::DuplicateStates(duplicates))
    }
}

fn check_initial_state(spec: &AutomatonSpec) -> Result<(), AnalysisError> {
    if !spec.q.contains(&spec.initial_state) {
        return Err(AnalysisError::InvalidInitialState(
            spec.initial_state.clone(),
        ));
    }

    Ok(())
}

fn check_accepting_states(spec: &AutomatonSpec) -> Result<(), AnalysisError> {
    let declared = declared(spec);
    let undeclared: Vec<String> = spec
        .f
        .iter()
        .filter(|state| !declared.contains(state.as_str()))
        .cloned()
        .collect();

    if undeclared.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::UndeclaredAcceptingStates(undeclared))
    }
}

fn check_sources(spec: &AutomatonSpec) -> Result<(), AnalysisError> {
    let declared = declared(spec);
    let undeclared: Vec<String> = spec
        .delta
        .keys()
        .filter(|state| !declared.contains(state.as_str()))
        .cloned()
        .collect();

    if undeclared.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::UndeclaredSources(undeclared))
    }
}

/// Checks that every destination is declared and every transition has at least one.
fn check_destinations(spec: &AutomatonSpec) -> Result<(), AnalysisError> {
    let declared = declared(spec);
    let mut undeclared = Vec::new();

    for (source, map) in &spec.delta {
        for (symbol, targets) in map {
            if targets.as_slice().is_empty() {
                return Err(AnalysisError::EmptyDestinations(
                    source.clone(),
                    symbol.clone(),
                ));
            }

            undeclared.extend(
                targets
                    .as_slice()
                    .iter()
                    .filter(|target| !declared.contains(target.as_str()))
                    .cloned(),
            );
        }
    }

    if undeclared.is_empty() {
        Ok(())
    } else {
        undeclared.sort();
        undeclared.dedup();
        Err(AnalysisError::UndeclaredDestinations(undeclared))
    }
}
