//! This module converts between the in-memory `Automaton` and its canonical textual form,
//! `AutomatonSpec`.
//!
//! Destination sets are compacted only here: a set with one member is written as a bare
//! identifier, larger sets as arrays. Decoding accepts both shapes and always produces sets.

use crate::analyzer::{analyze, undeclared_symbols};
use crate::automaton::{Automaton, TransitionMap};
use crate::types::{AutomatonError, AutomatonSpec, Symbol, Targets};
use indexmap::{IndexMap, IndexSet};
use log::warn;

/// Encodes an automaton into its canonical specification.
///
/// Every state gets an entry in `delta`, possibly empty, so that no information is lost.
pub fn encode(automaton: &Automaton) -> AutomatonSpec {
    let delta = automaton
        .states()
        .iter()
        .map(|state| {
            let transitions = automaton
                .transitions_from(state)
                .map(encode_transitions)
                .unwrap_or_default();
            (state.clone(), transitions)
        })
        .collect();

    AutomatonSpec {
        q: automaton.states().iter().cloned().collect(),
        sigma: automaton.alphabet().iter().cloned().collect(),
        delta,
        initial_state: automaton.initial_state().to_string(),
        f: automaton.accepting_states().iter().cloned().collect(),
    }
}

fn encode_transitions(map: &TransitionMap) -> IndexMap<Symbol, Targets> {
    map.iter()
        .map(|(symbol, destinations)| {
            let targets = match destinations.len() {
                1 => Targets::One(destinations[0].clone()),
                _ => Targets::Many(destinations.iter().cloned().collect()),
            };
            (symbol.clone(), targets)
        })
        .collect()
}

/// Decodes a specification into an automaton.
///
/// The specification is analyzed first; any inconsistency is reported as
/// `AutomatonError::ParseError`. Transition symbols missing from `sigma` are appended to
/// the alphabet.
pub fn decode(spec: &AutomatonSpec) -> Result<Automaton, AutomatonError> {
    analyze(spec)?;

    let mut alphabet: IndexSet<Symbol> = spec.sigma.iter().cloned().collect();
    for symbol in undeclared_symbols(spec) {
        warn!("Symbol '{}' is used in delta but not declared in sigma", symbol);
        alphabet.insert(symbol);
    }

    let delta: IndexMap<String, TransitionMap> = spec
        .delta
        .iter()
        .map(|(source, map)| {
            let transitions = map
                .iter()
                .map(|(symbol, targets)| {
                    (symbol.clone(), targets.as_slice().iter().cloned().collect())
                })
                .collect();
            (source.clone(), transitions)
        })
        .collect();

    Automaton::from_parts(
        spec.q.iter().cloned().collect(),
        alphabet,
        delta,
        spec.initial_state.clone(),
        spec.f.iter().cloned().collect(),
    )
    .map_err(|e| AutomatonError::ParseError(e.to_string()))
}

/// Parses and decodes a specification from its JSON text.
pub fn decode_str(text: &str) -> Result<Automaton, AutomatonError> {
    decode(&AutomatonSpec::from_json(text)?)
}
