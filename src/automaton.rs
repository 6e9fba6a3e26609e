//! This module defines the `Automaton` struct, the authoritative representation of a finite
//! automaton with epsilon transitions: its states, alphabet, transition function, initial
//! state, and accepting states.

use crate::types::{AutomatonError, Symbol, DEFAULT_ALPHABET, STATE_PREFIX};
use indexmap::{IndexMap, IndexSet};

/// Destination set of a single (source, symbol) pair.
pub type Destinations = IndexSet<String>;

/// Transitions leaving a single state, keyed by symbol.
pub type TransitionMap = IndexMap<Symbol, Destinations>;

/// A finite automaton with epsilon transitions.
///
/// Every state owns an entry in the transition function, possibly empty. Destination sets
/// are always sets in memory; the single-identifier compaction only exists in the
/// canonical textual form.
///
/// Equality ignores declaration order: two automata are equal when they have the same
/// states, alphabet, transitions, initial state and accepting states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    states: IndexSet<String>,
    alphabet: IndexSet<Symbol>,
    delta: IndexMap<String, TransitionMap>,
    initial_state: String,
    accepting: IndexSet<String>,
}

impl Automaton {
    /// Creates an automaton with a single initial state `q0`, no accepting states, no
    /// transitions, and the binary alphabet plus epsilon.
    pub fn new() -> Self {
        let initial_state = format!("{}0", STATE_PREFIX);

        let mut delta = IndexMap::new();
        delta.insert(initial_state.clone(), TransitionMap::new());

        Self {
            states: IndexSet::from([initial_state.clone()]),
            alphabet: DEFAULT_ALPHABET.iter().map(|s| Symbol::token(*s)).collect(),
            delta,
            initial_state,
            accepting: IndexSet::new(),
        }
    }

    /// Assembles an automaton from its parts and checks every invariant.
    ///
    /// States listed in `states` but absent from `delta` receive an empty transition map.
    pub fn from_parts(
        states: IndexSet<String>,
        alphabet: IndexSet<Symbol>,
        mut delta: IndexMap<String, TransitionMap>,
        initial_state: String,
        accepting: IndexSet<String>,
    ) -> Result<Self, AutomatonError> {
        for state in &states {
            delta.entry(state.clone()).or_default();
        }

        let automaton = Self {
            states,
            alphabet,
            delta,
            initial_state,
            accepting,
        };
        automaton.check_invariants()?;

        Ok(automaton)
    }

    /// Returns the states in declaration order.
    pub fn states(&self) -> &IndexSet<String> {
        &self.states
    }

    /// Returns the alphabet in declaration order.
    pub fn alphabet(&self) -> &IndexSet<Symbol> {
        &self.alphabet
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn accepting_states(&self) -> &IndexSet<String> {
        &self.accepting
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.states.contains(state)
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting.contains(state)
    }

    /// Returns the transitions leaving `state`, if the state exists.
    pub fn transitions_from(&self, state: &str) -> Option<&TransitionMap> {
        self.delta.get(state)
    }

    /// Returns the destinations of `state` on `symbol`, if any.
    pub fn destinations(&self, state: &str, symbol: &Symbol) -> Option<&Destinations> {
        self.delta.get(state).and_then(|map| map.get(symbol))
    }

    /// Iterates over every `(source, symbol, destination)` triple of the transition function.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &Symbol, &str)> + '_ {
        self.delta.iter().flat_map(|(source, map)| {
            map.iter().flat_map(move |(symbol, destinations)| {
                destinations
                    .iter()
                    .map(move |destination| (source.as_str(), symbol, destination.as_str()))
            })
        })
    }

    /// Returns the number of `(source, symbol, destination)` triples.
    pub fn transition_count(&self) -> usize {
        self.delta
            .values()
            .flat_map(|map| map.values())
            .map(|destinations| destinations.len())
            .sum()
    }

    /// Returns the numeric suffix just above every `q<n>` state currently in use.
    ///
    /// Fails when the largest suffix in use is already `u32::MAX`.
    pub fn next_state_suffix(&self) -> Result<u32, AutomatonError> {
        match self
            .states
            .iter()
            .filter_map(|state| state.strip_prefix(STATE_PREFIX))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
        {
            None => Ok(0),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                AutomatonError::InvariantViolation(format!(
                    "no state identifier left above '{}{}'",
                    STATE_PREFIX, max
                ))
            }),
        }
    }

    /// Inserts a new state with an empty transition map.
    pub fn add_state(&mut self, state: String, accepting: bool) -> Result<(), AutomatonError> {
        if self.states.contains(&state) {
            return Err(AutomatonError::InvariantViolation(format!(
                "state identifier '{}' is already in use",
                state
            )));
        }

        self.delta.insert(state.clone(), TransitionMap::new());
        if accepting {
            self.accepting.insert(state.clone());
        }
        self.states.insert(state);

        Ok(())
    }

    /// Adds `destination` to the destination set of `(source, symbol)`.
    ///
    /// Existing destinations are kept. Symbols outside the alphabet are added to it.
    /// Returns `true` if the destination was not already present.
    pub fn add_transition(
        &mut self,
        source: &str,
        destination: &str,
        symbol: Symbol,
    ) -> Result<bool, AutomatonError> {
        if !self.states.contains(destination) {
            return Err(AutomatonError::UnknownState(destination.to_string()));
        }

        let map = self
            .delta
            .get_mut(source)
            .ok_or_else(|| AutomatonError::UnknownState(source.to_string()))?;

        if !self.alphabet.contains(&symbol) {
            self.alphabet.insert(symbol.clone());
        }

        Ok(map
            .entry(symbol)
            .or_default()
            .insert(destination.to_string()))
    }

    /// Verifies the structural invariants of the automaton.
    pub fn check_invariants(&self) -> Result<(), AutomatonError> {
        if !self.states.contains(&self.initial_state) {
            return Err(AutomatonError::InvariantViolation(format!(
                "initial state '{}' is not a declared state",
                self.initial_state
            )));
        }

        if let Some(state) = self.accepting.iter().find(|s| !self.states.contains(*s)) {
            return Err(AutomatonError::InvariantViolation(format!(
                "accepting state '{}' is not a declared state",
                state
            )));
        }

        if let Some(source) = self.delta.keys().find(|s| !self.states.contains(*s)) {
            return Err(AutomatonError::InvariantViolation(format!(
                "transition source '{}' is not a declared state",
                source
            )));
        }

        for (source, symbol, destination) in self.transitions() {
            if !self.states.contains(destination) {
                return Err(AutomatonError::InvariantViolation(format!(
                    "transition {} --{}--> {} targets an undeclared state",
                    source, symbol, destination
                )));
            }

            if !symbol.is_epsilon() && !self.alphabet.contains(symbol) {
                return Err(AutomatonError::InvariantViolation(format!(
                    "transition {} --{}--> {} uses a symbol outside the alphabet",
                    source, symbol, destination
                )));
            }
        }

        if let Some((source, symbol)) = self
            .delta
            .iter()
            .flat_map(|(source, map)| map.iter().map(move |(symbol, d)| (source, symbol, d)))
            .find(|(_, _, destinations)| destinations.is_empty())
            .map(|(source, symbol, _)| (source, symbol))
        {
            return Err(AutomatonError::InvariantViolation(format!(
                "transition from '{}' on '{}' has no destination",
                source, symbol
            )));
        }

        Ok(())
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_automaton() {
        let automaton = Automaton::new();

        assert_eq!(automaton.states().len(), 1);
        assert_eq!(automaton.initial_state(), "q0");
        assert!(automaton.accepting_states().is_empty());
        assert_eq!(automaton.transition_count(), 0);
        assert!(automaton.alphabet().contains(&Symbol::Epsilon));
        assert!(automaton.alphabet().contains(&Symbol::from("0")));
        assert!(automaton.alphabet().contains(&Symbol::from("1")));
        assert!(automaton.check_invariants().is_ok());
    }

    #[test]
    fn test_add_transition_is_a_union() {
        let mut automaton = Automaton::new();
        automaton.add_state("q1".to_string(), false).unwrap();
        automaton.add_state("q2".to_string(), false).unwrap();

        assert!(automaton.add_transition("q0", "q1", "0".into()).unwrap());
        assert!(automaton.add_transition("q0", "q2", "0".into()).unwrap());
        assert!(!automaton.add_transition("q0", "q1", "0".into()).unwrap());

        let destinations = automaton.destinations("q0", &"0".into()).unwrap();
        assert_eq!(destinations.len(), 2);
        assert!(destinations.contains("q1"));
        assert!(destinations.contains("q2"));
    }

    #[test]
    fn test_add_transition_unknown_state() {
        let mut automaton = Automaton::new();
        let before = automaton.clone();

        let result = automaton.add_transition("q0", "q9", "0".into());
        assert_eq!(result, Err(AutomatonError::UnknownState("q9".to_string())));

        let result = automaton.add_transition("q9", "q0", "z".into());
        assert_eq!(result, Err(AutomatonError::UnknownState("q9".to_string())));
        assert_eq!(automaton, before);
    }

    #[test]
    fn test_new_symbol_extends_alphabet() {
        let mut automaton = Automaton::new();
        automaton.add_transition("q0", "q0", "a".into()).unwrap();

        assert!(automaton.alphabet().contains(&Symbol::from("a")));
        assert!(automaton.check_invariants().is_ok());
    }

    #[test]
    fn test_duplicate_state_is_invariant_violation() {
        let mut automaton = Automaton::new();
        let result = automaton.add_state("q0".to_string(), true);

        assert!(matches!(result, Err(AutomatonError::InvariantViolation(_))));
        assert!(automaton.accepting_states().is_empty());
    }

    #[test]
    fn test_next_state_suffix() {
        let mut automaton = Automaton::new();
        assert_eq!(automaton.next_state_suffix(), Ok(1));

        automaton.add_state("q7".to_string(), false).unwrap();
        automaton.add_state("start".to_string(), false).unwrap();
        assert_eq!(automaton.next_state_suffix(), Ok(8));
    }

    #[test]
    fn test_next_state_suffix_at_the_limit() {
        let mut automaton = Automaton::new();
        automaton
            .add_state(format!("q{}", u32::MAX), false)
            .unwrap();

        assert!(matches!(
            automaton.next_state_suffix(),
            Err(AutomatonError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_from_parts_rejects_undeclared_destination() {
        let mut map = TransitionMap::new();
        map.insert(Symbol::from("0"), IndexSet::from(["q5".to_string()]));
        let delta = IndexMap::from([("q0".to_string(), map)]);

        let result = Automaton::from_parts(
            IndexSet::from(["q0".to_string()]),
            IndexSet::from([Symbol::from("0")]),
            delta,
            "q0".to_string(),
            IndexSet::new(),
        );

        assert!(matches!(result, Err(AutomatonError::InvariantViolation(_))));
    }

    #[test]
    fn test_equality_ignores_order() {
        let mut a = Automaton::new();
        a.add_state("q1".to_string(), false).unwrap();
        a.add_state("q2".to_string(), true).unwrap();
        a.add_transition("q0", "q1", "0".into()).unwrap();
        a.add_transition("q0", "q2", "0".into()).unwrap();

        let mut b = Automaton::new();
        b.add_state("q2".to_string(), true).unwrap();
        b.add_state("q1".to_string(), false).unwrap();
        b.add_transition("q0", "q2", "0".into()).unwrap();
        b.add_transition("q0", "q1", "0".into()).unwrap();

        assert_eq!(a, b);
    }
}
