//! Command: set the repository directory.
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::config::RootDir;
use crate::error::ConfixError;
use crate::logging::Logger;

/// Run the set-repo command.
///
/// # Errors
///
/// Returns [`ConfixError::InvalidRepository`] if `path` is not an existing
/// directory, or an error if the settings cannot be saved.
pub fn run(global: &GlobalOpts, path: &Path, log: &Arc<Logger>) -> Result<()> {
    let root = super::open_root(global, log)?;
    let repo = set_repo(&root, path)?;
    log.info(&format!("repository set to {}", repo.display()));
    Ok(())
}

/// Persist `path`, canonicalized, as the repository and return it.
fn set_repo(root: &RootDir, path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(ConfixError::InvalidRepository(path.to_path_buf()).into());
    }
    let repo = dunce::canonicalize(path)?;
    let settings = root.update_settings(|s| s.repo = Some(repo.clone()))?;
    Ok(settings.repo.unwrap_or(repo))
}
