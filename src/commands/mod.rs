//! Subcommand implementations.
pub mod add;
pub mod completions;
pub mod info;
pub mod link;
pub mod list;
pub mod merge;
pub mod rm;
pub mod set_merge_tool;
pub mod set_repo;
pub mod unlink;
pub mod version;

use anyhow::{Context as _, Result};
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::config::RootDir;
use crate::engine::Engine;
use crate::error::ConfixError;
use crate::logging::{Log, Logger};
use crate::paths::{self, PathCodec};
use crate::resources::backup::BackupManager;

/// Open the root directory selected by `--root-dir`, or the default one.
///
/// # Errors
///
/// Returns an error if no root can be determined or it cannot be
/// initialized.
pub fn open_root(global: &GlobalOpts, log: &Logger) -> Result<RootDir> {
    let path = match &global.root_dir {
        Some(path) => path.clone(),
        None => RootDir::default_path()?,
    };
    let root = RootDir::open(&path)?;
    log.debug(&format!("root directory: {}", root.path().display()));
    Ok(root)
}

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates root initialization, settings loading, and engine
/// construction so that each command does not have to repeat the
/// boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Engine bound to the configured repository.
    pub engine: Engine,
}

impl CommandSetup {
    /// Open the root, load the settings, and build an engine for the
    /// configured repository.
    ///
    /// The default repository (`<root>/dotfiles`) is created on demand; a
    /// configured `REPO` must already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be opened, the settings cannot be
    /// parsed, or the repository is not a directory.
    pub fn init(global: &GlobalOpts, log: &Arc<Logger>) -> Result<Self> {
        let root = open_root(global, log)?;
        let settings = root.load_settings()?;

        let repo = paths::normalize(&root.repo_dir(&settings))?;
        if settings.repo.is_none() {
            std::fs::create_dir_all(&repo)
                .with_context(|| format!("creating repository: {}", repo.display()))?;
        } else if !repo.is_dir() {
            return Err(ConfixError::InvalidRepository(repo).into());
        }
        log.debug(&format!("repository: {}", repo.display()));

        let engine = Engine::new(
            PathCodec::new(repo, paths::home_dir()),
            BackupManager::new(root.backup_dir()),
            Arc::clone(log) as Arc<dyn Log>,
        )
        .with_merge_tool(settings.merge_tool);

        Ok(Self { engine })
    }
}
