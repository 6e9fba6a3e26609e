//! This module defines the core data structures and types shared by the automaton model,
//! the acceptance engine and the serialization boundary, including symbols, the canonical
//! specification format, and error types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Glyph used to render the epsilon symbol in graph labels.
pub const EPSILON_GLYPH: &str = "ε";
/// Alphabet of a freshly created automaton. The empty string is epsilon.
pub const DEFAULT_ALPHABET: [&str; 3] = ["0", "1", ""];
/// Prefix of generated state identifiers.
pub const STATE_PREFIX: &str = "q";
/// Display identifier always assigned to the initial state.
pub const INITIAL_DISPLAY_ID: u32 = 1;
/// Title attached to accepting nodes in the visualization graph.
pub const ACCEPTING_TITLE: &str = "accepting";
/// Border width used to draw accepting nodes.
pub const ACCEPTING_BORDER_WIDTH: u32 = 3;
/// The maximum allowed size for a textual automaton specification in bytes.
pub const MAX_AUTOMATON_SIZE: usize = 65536; // 64KB

/// An alphabet symbol.
///
/// Epsilon is a variant of its own so it can never be confused with an ordinary token,
/// including single characters such as `"0"`. At the serialization boundary epsilon is
/// written as the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// The no-input symbol.
    Epsilon,
    /// Any other input token.
    Token(String),
}

impl Symbol {
    /// Builds a token symbol. The empty string maps to [`Symbol::Epsilon`].
    pub fn token(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Symbol::Epsilon
        } else {
            Symbol::Token(value)
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    /// Returns the key used for this symbol in the canonical textual form.
    pub fn as_key(&self) -> &str {
        match self {
            Symbol::Epsilon => "",
            Symbol::Token(token) => token,
        }
    }

    /// Returns the text shown on graph edges, with epsilon rendered as [`EPSILON_GLYPH`].
    pub fn glyph(&self) -> &str {
        match self {
            Symbol::Epsilon => EPSILON_GLYPH,
            Symbol::Token(token) => token,
        }
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::token(value)
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        Symbol::Token(value.to_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl Serialize for Symbol {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_key())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Symbol::token)
    }
}

/// Splits an input string into one symbol per character.
///
/// This is how input strings are fed to binary automata, where every token is a single
/// character.
pub fn symbols_from_chars(input: &str) -> Vec<Symbol> {
    input.chars().map(Symbol::from).collect()
}

/// Splits an input string into symbols on `separator`, skipping empty pieces so that a
/// trailing separator never produces epsilon.
pub fn symbols_from_separated(input: &str, separator: &str) -> Vec<Symbol> {
    input
        .split(separator)
        .filter(|token| !token.is_empty())
        .map(Symbol::token)
        .collect()
}

/// Destinations of a transition in the canonical textual form.
///
/// A single destination is written as a bare identifier, several as an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Targets {
    One(String),
    Many(Vec<String>),
}

impl Targets {
    /// Returns the destinations as a slice regardless of compaction.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Targets::One(target) => std::slice::from_ref(target),
            Targets::Many(targets) => targets,
        }
    }
}

/// The canonical textual form of an automaton, exchanged with conversion services and
/// used for file export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomatonSpec {
    /// Ordered state identifiers.
    pub q: Vec<String>,
    /// Ordered alphabet, the empty string being epsilon.
    pub sigma: Vec<Symbol>,
    /// Transition function keyed by source state, then by symbol.
    pub delta: IndexMap<String, IndexMap<Symbol, Targets>>,
    /// The initial state, a member of `q`.
    pub initial_state: String,
    /// Accepting states, a subset of `q`.
    pub f: Vec<String>,
}

impl AutomatonSpec {
    /// Serializes the specification as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, AutomatonError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AutomatonError::InvariantViolation(format!("serialization failed: {}", e)))
    }

    /// Parses a specification from its JSON text. Only the syntax and the presence of
    /// required fields are checked here, see [`crate::analyzer::analyze`] for the rest.
    pub fn from_json(text: &str) -> Result<Self, AutomatonError> {
        if text.len() > MAX_AUTOMATON_SIZE {
            return Err(AutomatonError::ParseError(format!(
                "Specification is {} bytes, the limit is {} bytes",
                text.len(),
                MAX_AUTOMATON_SIZE
            )));
        }

        Ok(serde_json::from_str(text)?)
    }
}

/// Represents the errors raised by automaton operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// An operation referenced a state or display identifier that does not exist.
    #[error("Unknown state: {0}")]
    UnknownState(String),
    /// An imported specification is malformed or inconsistent.
    #[error("Specification parsing error: {0}")]
    ParseError(String),
    /// The automaton's own invariants were not maintained. This is a bug.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    /// No built-in example automaton has the requested index or name.
    #[error("Unknown example: {0}")]
    UnknownExample(String),
    /// Reading or writing a specification file failed.
    #[error("File error: {0}")]
    FileError(String),
}

impl From<serde_json::Error> for AutomatonError {
    fn from(error: serde_json::Error) -> Self {
        AutomatonError::ParseError(error.to_string())
    }
}
