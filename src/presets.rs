//! This module provides the registry of embedded example automata, loaded lazily on first
//! use and shared behind a lock.

use crate::automaton::Automaton;
use crate::encoder::decode_str;
use crate::types::AutomatonError;
use log::warn;

use std::sync::{RwLock, RwLockReadGuard};

// Default embedded automata
const PRESET_TEXTS: [(&str, &str); 5] = [
    ("Sample epsilon-NFA", include_str!("../demos/sample-enfa.json")),
    ("Ends with 01", include_str!("../demos/ends-with-01.json")),
    ("Even number of zeros", include_str!("../demos/even-zeros.json")),
    ("Binary multiples of three", include_str!("../demos/multiples-of-three.json")),
    ("Zeros then ones", include_str!("../demos/zeros-then-ones.json")),
];

/// A named, embedded automaton.
#[derive(Debug, Clone)]
pub struct Preset {
    pub name: String,
    pub automaton: Automaton,
}

lazy_static::lazy_static! {
    pub static ref PRESETS: RwLock<Vec<Preset>> = RwLock::new(Vec::new());
}

pub struct PresetManager;

impl PresetManager {
    /// Parses the embedded automata into the registry, unless already done.
    pub fn load() -> Result<(), AutomatonError> {
        let mut write_guard = PRESETS.write().map_err(|_| {
            AutomatonError::InvariantViolation("Failed to acquire write lock".to_string())
        })?;

        if !write_guard.is_empty() {
            return Ok(());
        }

        for (name, text) in PRESET_TEXTS {
            match decode_str(text) {
                Ok(automaton) => write_guard.push(Preset {
                    name: name.to_string(),
                    automaton,
                }),
                Err(e) => warn!("Failed to parse preset '{}': {}", name, e),
            }
        }

        Ok(())
    }

    /// Read access to the registry, filling it first if needed.
    fn registry() -> Result<RwLockReadGuard<'static, Vec<Preset>>, AutomatonError> {
        Self::load()?;

        PRESETS.read().map_err(|_| {
            AutomatonError::InvariantViolation("Failed to acquire read lock".to_string())
        })
    }

    pub fn get_preset_count() -> usize {
        Self::registry().map_or(0, |presets| presets.len())
    }

    pub fn get_preset_by_index(index: usize) -> Result<Preset, AutomatonError> {
        Self::registry()?
            .get(index)
            .cloned()
            .ok_or_else(|| AutomatonError::UnknownExample(format!("#{}", index)))
    }

    /// Looks a preset up by name. Case is ignored.
    pub fn get_preset_by_name(name: &str) -> Result<Preset, AutomatonError> {
        Self::registry()?
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| AutomatonError::UnknownExample(format!("'{}'", name)))
    }

    /// Names of all presets, in registry order.
    pub fn list_preset_names() -> Vec<String> {
        Self::registry()
            .map(|presets| presets.iter().map(|preset| preset.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Summarises the size of the preset at `index`.
    pub fn get_preset_info(index: usize) -> Result<PresetInfo, AutomatonError> {
        let preset = Self::get_preset_by_index(index)?;
        let automaton = &preset.automaton;

        Ok(PresetInfo {
            index,
            name: preset.name.clone(),
            initial_state: automaton.initial_state().to_string(),
            state_count: automaton.states().len(),
            symbol_count: automaton.alphabet().len(),
            transition_count: automaton.transition_count(),
            accepting_count: automaton.accepting_states().len(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct PresetInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub state_count: usize,
    pub symbol_count: usize,
    pub transition_count: usize,
    pub accepting_count: usize,
}
