//! This module implements the acceptance engine: epsilon-closure and the simulation of an
//! automaton over a sequence of input symbols.
//!
//! The simulator tracks the set of states the automaton may currently be in. Each input
//! symbol maps that set through the transition function and closes the result under
//! epsilon transitions. A run whose set becomes empty is dead and rejects.

use crate::automaton::Automaton;
use crate::types::Symbol;
use log::trace;
use std::collections::BTreeSet;

/// A set of state identifiers borrowed from an automaton.
pub type StateSet<'a> = BTreeSet<&'a str>;

/// Outcome of feeding one symbol to a [`Simulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// At least one state is still reachable.
    Continue,
    /// No state is reachable any more; the run rejects whatever follows.
    Dead,
}

/// Final verdict of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }
}

/// Returns every state reachable from `states` through zero or more epsilon transitions.
///
/// States are visited at most once, so epsilon cycles terminate.
pub fn epsilon_closure<'a>(automaton: &'a Automaton, states: &StateSet<'a>) -> StateSet<'a> {
    let mut closure = StateSet::new();
    let mut stack: Vec<&'a str> = states.iter().copied().collect();

    while let Some(state) = stack.pop() {
        if !closure.insert(state) {
            continue;
        }

        if let Some(destinations) = automaton.destinations(state, &Symbol::Epsilon) {
            stack.extend(
                destinations
                    .iter()
                    .map(String::as_str)
                    .filter(|destination| !closure.contains(destination)),
            );
        }
    }

    closure
}

/// Returns the states reachable from `states` by consuming `symbol`, closed under epsilon.
pub fn move_on_symbol<'a>(
    automaton: &'a Automaton,
    states: &StateSet<'a>,
    symbol: &Symbol,
) -> StateSet<'a> {
    let reached: StateSet<'a> = states
        .iter()
        .filter_map(|state| automaton.destinations(state, symbol))
        .flat_map(|destinations| destinations.iter().map(String::as_str))
        .collect();

    epsilon_closure(automaton, &reached)
}

/// Returns `true` if the automaton accepts the symbol sequence.
pub fn accepts(automaton: &Automaton, input: &[Symbol]) -> bool {
    Simulator::new(automaton).run(input).is_accepted()
}

/// Steps an automaton through an input one symbol at a time.
pub struct Simulator<'a> {
    automaton: &'a Automaton,
    current: StateSet<'a>,
    step_count: usize,
}

impl<'a> Simulator<'a> {
    /// Creates a simulator positioned at the epsilon-closure of the initial state.
    pub fn new(automaton: &'a Automaton) -> Self {
        Self {
            automaton,
            current: Self::start(automaton),
            step_count: 0,
        }
    }

    fn start(automaton: &'a Automaton) -> StateSet<'a> {
        epsilon_closure(automaton, &StateSet::from([automaton.initial_state()]))
    }

    /// Consumes one input symbol.
    ///
    /// Feeding a dead run keeps it dead; the symbol is still counted.
    pub fn step(&mut self, symbol: &Symbol) -> Step {
        self.current = move_on_symbol(self.automaton, &self.current, symbol);
        self.step_count += 1;

        trace!(
            "step {} on '{}': {:?}",
            self.step_count,
            symbol,
            self.current
        );

        if self.current.is_empty() {
            Step::Dead
        } else {
            Step::Continue
        }
    }

    /// Consumes the whole input and returns the verdict.
    ///
    /// Stops early as soon as the run is dead.
    pub fn run(&mut self, input: &[Symbol]) -> Verdict {
        for symbol in input {
            if self.step(symbol) == Step::Dead {
                return Verdict::Rejected;
            }
        }

        self.verdict()
    }

    /// Returns the verdict for the input consumed so far.
    pub fn verdict(&self) -> Verdict {
        if self.is_accepting() {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }

    /// Returns `true` if any current state is accepting.
    pub fn is_accepting(&self) -> bool {
        self.current
            .iter()
            .any(|state| self.automaton.is_accepting(state))
    }

    pub fn is_dead(&self) -> bool {
        self.current.is_empty()
    }

    /// Returns the states the automaton may currently be in.
    pub fn current_states(&self) -> &StateSet<'a> {
        &self.current
    }

    /// Returns the number of symbols consumed.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Resets the simulator to the epsilon-closure of the initial state.
    pub fn reset(&mut self) {
        self.current = Self::start(self.automaton);
        self.step_count = 0;
    }
}
