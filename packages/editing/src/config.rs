use crate::errors::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "scribe.config.json";

/// Editing configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingConfig {
    /// Maximum number of undo levels (0 = unlimited)
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,

    /// Snap boundary points inside leading/trailing whitespace of an edge
    /// text node to the text's start/end instead of splitting it
    #[serde(default = "default_snap_boundary_whitespace")]
    pub snap_boundary_whitespace: bool,

    /// Attributes that must not be duplicated when an element is split
    #[serde(default = "default_strip_on_split")]
    pub strip_on_split: Vec<String>,
}

fn default_undo_limit() -> usize {
    100
}

fn default_snap_boundary_whitespace() -> bool {
    true
}

fn default_strip_on_split() -> Vec<String> {
    vec!["id".to_string()]
}

impl EditingConfig {
    /// Load config from a directory, falling back to defaults when the file
    /// does not exist.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            undo_limit: default_undo_limit(),
            snap_boundary_whitespace: default_snap_boundary_whitespace(),
            strip_on_split: default_strip_on_split(),
        }
    }
}
