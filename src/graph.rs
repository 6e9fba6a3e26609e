//! This module defines the visualization graph: the node/edge view of an automaton handed to
//! the rendering collaborator. Nodes are addressed by numeric display identifiers, edges
//! carry the symbols they stand for.
//!
//! The graph is never authoritative. It is rebuilt from an `Automaton` on import and kept in
//! step with it by `AutomatonEditor` afterwards.

use crate::automaton::Automaton;
use crate::types::{Symbol, ACCEPTING_BORDER_WIDTH, ACCEPTING_TITLE, INITIAL_DISPLAY_ID};
use serde_json::json;
use std::collections::HashMap;

/// A node of the visualization graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// The display identifier.
    pub id: u32,
    /// The state identifier this node stands for.
    pub label: String,
    /// Whether the node is drawn as accepting.
    pub accepting: bool,
}

/// An edge of the visualization graph.
///
/// One edge may carry several symbols; its label lists them comma-separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: u32,
    pub to: u32,
    pub symbols: Vec<Symbol>,
}

impl Edge {
    /// Returns the edge label, with epsilon rendered as its glyph.
    pub fn label(&self) -> String {
        self.symbols
            .iter()
            .map(Symbol::glyph)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The node/edge view of an automaton.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualizationGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl VisualizationGraph {
    /// Builds the graph of an automaton from scratch.
    ///
    /// The initial state gets display identifier 1 and the remaining states follow in
    /// declaration order. Every `(source, symbol, destination)` triple becomes one edge.
    pub fn from_automaton(automaton: &Automaton) -> Self {
        let initial = automaton.initial_state();
        let ordered = std::iter::once(initial).chain(
            automaton
                .states()
                .iter()
                .map(String::as_str)
                .filter(|state| *state != initial),
        );

        let mut graph = Self::default();
        for (id, state) in (INITIAL_DISPLAY_ID..).zip(ordered) {
            graph.nodes.push(Node {
                id,
                label: state.to_string(),
                accepting: automaton.is_accepting(state),
            });
        }

        let ids: HashMap<&str, u32> = graph
            .nodes
            .iter()
            .map(|node| (node.label.as_str(), node.id))
            .collect();

        let edges = automaton
            .transitions()
            .filter_map(|(source, symbol, destination)| {
                Some(Edge {
                    from: *ids.get(source)?,
                    to: *ids.get(destination)?,
                    symbols: vec![symbol.clone()],
                })
            })
            .collect();
        graph.edges = edges;

        graph
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the node with the given display identifier.
    pub fn node(&self, id: u32) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Returns the node standing for the given state.
    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.label == label)
    }

    /// Returns the identifier the next node should get.
    pub fn next_id(&self) -> u32 {
        self.nodes
            .iter()
            .map(|node| node.id)
            .max()
            .map_or(INITIAL_DISPLAY_ID, |max| max + 1)
    }

    /// Returns the edge between two display identifiers, if one exists.
    pub fn edge(&self, from: u32, to: u32) -> Option<&Edge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Records `symbol` on the edge between `from` and `to`.
    ///
    /// An existing edge between the pair gains the symbol (once); otherwise a new edge is
    /// appended.
    pub(crate) fn add_symbol(&mut self, from: u32, to: u32, symbol: Symbol) {
        match self
            .edges
            .iter_mut()
            .find(|e| e.from == from && e.to == to)
        {
            Some(edge) => {
                if !edge.symbols.contains(&symbol) {
                    edge.symbols.push(symbol);
                }
            }
            None => self.edges.push(Edge {
                from,
                to,
                symbols: vec![symbol],
            }),
        }
    }

    /// Returns the graph as the JSON object consumed by the renderer.
    ///
    /// Accepting nodes carry a bold border and an `accepting` title.
    pub fn to_json(&self) -> serde_json::Value {
        let nodes: Vec<_> = self
            .nodes
            .iter()
            .map(|node| {
                if node.accepting {
                    json!({
                        "id": node.id,
                        "label": node.label,
                        "borderWidth": ACCEPTING_BORDER_WIDTH,
                        "title": ACCEPTING_TITLE,
                    })
                } else {
                    json!({
                        "id": node.id,
                        "label": node.label,
                        "title": null,
                    })
                }
            })
            .collect();

        let edges: Vec<_> = self
            .edges
            .iter()
            .map(|edge| {
                json!({
                    "from": edge.from,
                    "to": edge.to,
                    "label": edge.label(),
                })
            })
            .collect();

        json!({ "nodes": nodes, "edges": edges })
    }

    /// Converts the graph to the [graphviz](https://graphviz.org/docs/layouts/dot/) dot
    /// language.
    pub fn to_dot(&self) -> String {
        let accepting = self
            .nodes
            .iter()
            .filter(|node| node.accepting)
            .map(|node| node.id.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        let labels = self
            .nodes
            .iter()
            .map(|node| format!("\t{} [label = \"{}\"];", node.id, escape(&node.label)));

        let edges = self.edges.iter().map(|edge| {
            format!(
                "\t{} -> {} [label = \"{}\"];",
                edge.from,
                edge.to,
                escape(&edge.label())
            )
        });

        let mut lines = vec![
            "digraph automaton {".to_string(),
            "\trankdir = LR;".to_string(),
        ];
        if !accepting.is_empty() {
            lines.push(format!("\tnode [shape = doublecircle]; {};", accepting));
        }
        lines.push("\tnode [shape = circle];".to_string());
        lines.extend(labels);
        lines.push("\tstart [shape = point];".to_string());
        lines.push(format!("\tstart -> {};", INITIAL_DISPLAY_ID));
        lines.extend(edges);
        lines.push("}".to_string());

        lines.join("\n")
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
