//! This crate provides the core logic for building and running epsilon-NFAs.
//! It includes modules for editing an automaton together with its visualization graph,
//! importing and exporting automata in their canonical JSON form, deciding acceptance
//! through epsilon-closure, converting to deterministic and minimal automata, and managing
//! a collection of predefined automata.

pub mod analyzer;
pub mod automaton;
pub mod convert;
pub mod editor;
pub mod encoder;
pub mod engine;
pub mod graph;
pub mod loader;
pub mod presets;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `Automaton` struct from the automaton module.
pub use automaton::Automaton;
/// Re-exports the conversion functions from the convert module.
pub use convert::{minimize, to_dfa};
/// Re-exports the `AutomatonEditor` struct from the editor module.
pub use editor::AutomatonEditor;
/// Re-exports the encoding functions from the encoder module.
pub use encoder::{decode, decode_str, encode, encode as export};
/// Re-exports the acceptance engine.
pub use engine::{accepts, epsilon_closure, move_on_symbol, Simulator, StateSet, Step, Verdict};
/// Re-exports the graph types from the graph module.
pub use graph::{Edge, Node, VisualizationGraph};
/// Re-exports the `SpecLoader` struct from the loader module.
pub use loader::SpecLoader;
/// Re-exports `Preset`, `PresetInfo`, `PresetManager`, and `PRESETS` from the presets module.
pub use presets::{Preset, PresetInfo, PresetManager, PRESETS};
/// Re-exports the automaton definition types from the types module.
pub use types::{
    symbols_from_chars, symbols_from_separated, AutomatonError, AutomatonSpec, Symbol, Targets,
    EPSILON_GLYPH, MAX_AUTOMATON_SIZE,
};
