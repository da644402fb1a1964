//! Command: reconcile a file with its repository copy using the merge tool.
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the merge command.
///
/// # Errors
///
/// Returns an error if setup fails, either side is missing, or the merge
/// tool is unavailable or fails.
pub fn run(global: &GlobalOpts, file: &Path, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    log.stage(&format!("Merging {}", file.display()));
    setup.engine.merge(file)
}
