//! Persisted user settings.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::toml_loader::{load_config, save_config};

/// Contents of the `config` file in the root directory.
///
/// ```toml
/// REPO = "/home/alice/dotfiles"
/// MERGE_TOOL = "meld"
/// ```
///
/// Both keys are optional; an empty or missing file leaves them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Repository directory holding the tracked files.
    #[serde(rename = "REPO", default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<PathBuf>,
    /// Merge tool program, as a path or a name on `PATH`.
    #[serde(rename = "MERGE_TOOL", default, skip_serializing_if = "Option::is_none")]
    pub merge_tool: Option<PathBuf>,
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        load_config(path)
    }

    /// Write settings to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        save_config(path, self)
    }
}
