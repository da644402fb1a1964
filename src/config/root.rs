//! The confix root directory.
//!
//! ```text
//! <root>/
//!   config      TOML settings (REPO, MERGE_TOOL)
//!   backup/     timestamped copies made before overwrites
//!   dotfiles/   default repository when REPO is unset
//! ```
use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::settings::Settings;
use crate::error::ConfixError;
use crate::paths;

const CONFIG_FILE: &str = "config";
const BACKUP_DIR: &str = "backup";
const DEFAULT_REPO_DIR: &str = "dotfiles";

/// An initialized root directory.
#[derive(Debug, Clone)]
pub struct RootDir {
    path: PathBuf,
}

impl RootDir {
    /// Open the root at `path`, creating it, its backup directory and an
    /// empty config file when missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfixError::InvalidRoot`] if `path` exists and is not a
    /// directory, or an I/O error if initialization fails.
    pub fn open(path: &Path) -> Result<Self> {
        let path = paths::normalize(path)?;
        if path.exists() && !path.is_dir() {
            return Err(ConfixError::InvalidRoot(path).into());
        }

        let root = Self { path };
        let backup = root.backup_dir();
        std::fs::create_dir_all(&backup)
            .with_context(|| format!("creating backup directory: {}", backup.display()))?;
        let config = root.config_file();
        if !config.exists() {
            std::fs::write(&config, "")
                .with_context(|| format!("creating config file: {}", config.display()))?;
        }
        Ok(root)
    }

    /// Default root location: `$XDG_CONFIG_HOME/confix`, falling back to
    /// `$HOME/.config/confix`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfixError::HomeUnavailable`] if neither variable is set.
    pub fn default_path() -> Result<PathBuf> {
        default_path_from(std::env::var_os("XDG_CONFIG_HOME"), paths::home_dir())
    }

    /// Root directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the settings file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.path.join(CONFIG_FILE)
    }

    /// Root of the backup tree.
    #[must_use]
    pub fn backup_dir(&self) -> PathBuf {
        self.path.join(BACKUP_DIR)
    }

    /// Repository location used when `REPO` is unset.
    #[must_use]
    pub fn default_repo(&self) -> PathBuf {
        self.path.join(DEFAULT_REPO_DIR)
    }

    /// Repository location for `settings`.
    #[must_use]
    pub fn repo_dir(&self, settings: &Settings) -> PathBuf {
        settings
            .repo
            .clone()
            .unwrap_or_else(|| self.default_repo())
    }

    /// Read the settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_settings(&self) -> Result<Settings> {
        Settings::load(&self.config_file())
    }

    /// Apply `update` to the stored settings, save them, and return the
    /// settings as reloaded from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be read, written or re-read.
    pub fn update_settings(&self, update: impl FnOnce(&mut Settings)) -> Result<Settings> {
        let mut settings = self.load_settings()?;
        update(&mut settings);
        settings.save(&self.config_file())?;
        self.load_settings()
    }
}

fn default_path_from(xdg_config: Option<OsString>, home: Option<PathBuf>) -> Result<PathBuf> {
    let base = match xdg_config.filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => home.ok_or(ConfixError::HomeUnavailable)?.join(".config"),
    };
    Ok(base.join("confix"))
}
