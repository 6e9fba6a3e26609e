//! This module provides the `AutomatonEditor`, the single owner of an automaton and its
//! visualization graph. Every operation updates both or neither, so callers can never
//! observe them out of step.

use crate::automaton::Automaton;
use crate::encoder::{decode, encode};
use crate::engine::{accepts, Simulator};
use crate::graph::{Node, VisualizationGraph};
use crate::types::{AutomatonError, AutomatonSpec, Symbol, STATE_PREFIX};
use log::debug;

/// An automaton under construction, together with its visualization graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonEditor {
    automaton: Automaton,
    graph: VisualizationGraph,
}

impl AutomatonEditor {
    /// Creates an editor holding the empty automaton: a single initial state `q0` shown as
    /// node 1.
    pub fn new() -> Self {
        Self::from(Automaton::new())
    }

    /// Creates an editor from a specification in its JSON text form.
    pub fn import_from_text(text: &str) -> Result<Self, AutomatonError> {
        Self::import_from_structure(&AutomatonSpec::from_json(text)?)
    }

    /// Creates an editor from a typed specification.
    ///
    /// The graph is rebuilt from scratch: the initial state is node 1 and the other states
    /// follow in declaration order.
    pub fn import_from_structure(spec: &AutomatonSpec) -> Result<Self, AutomatonError> {
        let automaton = decode(spec)?;

        debug!(
            "Imported automaton with {} states and {} transitions",
            automaton.states().len(),
            automaton.transition_count()
        );

        Ok(Self::from(automaton))
    }

    /// Replaces the content of this editor with the given JSON specification.
    ///
    /// On error the editor is left untouched.
    pub fn import_text(&mut self, text: &str) -> Result<(), AutomatonError> {
        *self = Self::import_from_text(text)?;
        Ok(())
    }

    /// Replaces the content of this editor with the given specification.
    ///
    /// On error the editor is left untouched.
    pub fn import(&mut self, spec: &AutomatonSpec) -> Result<(), AutomatonError> {
        *self = Self::import_from_structure(spec)?;
        Ok(())
    }

    /// Exports the automaton in its canonical form.
    pub fn export(&self) -> AutomatonSpec {
        encode(&self.automaton)
    }

    /// Exports the automaton as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, AutomatonError> {
        self.export().to_json()
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn graph(&self) -> &VisualizationGraph {
        &self.graph
    }

    /// Adds a new state and returns its identifier.
    ///
    /// The new node gets the next free display identifier. The state is named `q<n>` where
    /// `n` is above every numeric suffix in use and never below that display identifier.
    pub fn add_state(&mut self, accepting: bool) -> Result<String, AutomatonError> {
        let id = self.graph.next_id();
        let suffix = self.automaton.next_state_suffix()?.max(id);
        let state = format!("{}{}", STATE_PREFIX, suffix);

        if self.graph.node_by_label(&state).is_some() {
            return Err(AutomatonError::InvariantViolation(format!(
                "state identifier '{}' is already shown in the graph",
                state
            )));
        }

        self.automaton.add_state(state.clone(), accepting)?;
        self.graph.push_node(Node {
            id,
            label: state.clone(),
            accepting,
        });

        debug!("Added state {} as node {} (accepting: {})", state, id, accepting);

        Ok(state)
    }

    /// Adds a transition between two nodes, addressed by display identifier.
    ///
    /// The destination joins the existing destination set of `(source, symbol)`. In the
    /// graph, the symbol is appended to the edge between the two nodes if one exists.
    pub fn add_transition(
        &mut self,
        from: u32,
        to: u32,
        symbol: Symbol,
    ) -> Result<(), AutomatonError> {
        let source = self.label_of(from)?;
        let destination = self.label_of(to)?;

        self.automaton
            .add_transition(&source, &destination, symbol.clone())?;

        debug!(
            "Added transition {} --{}--> {} ({} -> {})",
            source, symbol, destination, from, to
        );

        self.graph.add_symbol(from, to, symbol);

        Ok(())
    }

    /// Adds a transition between two states, addressed by state identifier.
    pub fn add_transition_between(
        &mut self,
        source: &str,
        destination: &str,
        symbol: Symbol,
    ) -> Result<(), AutomatonError> {
        let from = self.id_of(source)?;
        let to = self.id_of(destination)?;

        self.add_transition(from, to, symbol)
    }

    /// Returns the state identifier shown by the node `id`.
    pub fn label_of(&self, id: u32) -> Result<String, AutomatonError> {
        self.graph
            .node(id)
            .map(|node| node.label.clone())
            .ok_or_else(|| AutomatonError::UnknownState(id.to_string()))
    }

    /// Returns the display identifier of the node showing `state`.
    pub fn id_of(&self, state: &str) -> Result<u32, AutomatonError> {
        self.graph
            .node_by_label(state)
            .map(|node| node.id)
            .ok_or_else(|| AutomatonError::UnknownState(state.to_string()))
    }

    /// Returns `true` if the automaton accepts the symbol sequence.
    pub fn accepts(&self, input: &[Symbol]) -> bool {
        accepts(&self.automaton, input)
    }

    /// Returns a simulator over the current automaton.
    pub fn simulator(&self) -> Simulator<'_> {
        Simulator::new(&self.automaton)
    }
}

impl From<Automaton> for AutomatonEditor {
    fn from(automaton: Automaton) -> Self {
        let graph = VisualizationGraph::from_automaton(&automaton);

        Self { automaton, graph }
    }
}

impl Default for AutomatonEditor {
    fn default() -> Self {
        Self::new()
    }
}
