//! This module provides the `SpecLoader` struct, responsible for reading automaton
//! specifications from files, strings and directories, and for writing exported
//! specifications back to disk.

use crate::editor::AutomatonEditor;
use crate::types::{AutomatonError, AutomatonSpec};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of automaton specification files.
pub const SPEC_EXTENSION: &str = "json";

/// `SpecLoader` is a utility struct for loading and saving automaton specifications.
pub struct SpecLoader;

impl SpecLoader {
    /// Loads an automaton from the specification file at `path`.
    ///
    /// # Returns
    ///
    /// * `Ok(AutomatonEditor)` if the file is read and imported successfully.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read.
    /// * `Err(AutomatonError::ParseError)` if the content is not a valid specification.
    pub fn load_spec(path: &Path) -> Result<AutomatonEditor, AutomatonError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        AutomatonEditor::import_from_text(&content)
    }

    /// Loads an automaton from specification text, e.g. piped input or a service response.
    pub fn load_spec_from_string(content: &str) -> Result<AutomatonEditor, AutomatonError> {
        AutomatonEditor::import_from_text(content)
    }

    /// Loads every `.json` specification in `directory`.
    ///
    /// Subdirectories and other files are skipped. Each element of the result is either the
    /// path and its automaton, or the error met while loading that file.
    pub fn load_specs(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, AutomatonEditor), AutomatonError>> {
        if !directory.exists() {
            return vec![Err(AutomatonError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(AutomatonError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(AutomatonError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().map_or(true, |ext| ext != SPEC_EXTENSION) {
                    return None;
                }

                Some(Self::load_spec(&path).map(|editor| (path, editor)))
            })
            .collect()
    }

    /// Writes `spec` to `path` as pretty-printed JSON.
    pub fn save_spec(path: &Path, spec: &AutomatonSpec) -> Result<(), AutomatonError> {
        let content = spec.to_json()?;

        fs::write(path, content).map_err(|e| {
            AutomatonError::FileError(format!("Failed to write file {}: {}", path.display(), e))
        })
    }
}
