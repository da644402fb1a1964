//! Command: link a file to its repository copy.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::{FileOpts, GlobalOpts};
use crate::logging::Logger;

/// Run the link command.
///
/// # Errors
///
/// Returns an error if setup fails or the link cannot be created.
pub fn run(global: &GlobalOpts, opts: &FileOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    setup.engine.link(&opts.file, opts.force)?;
    Ok(())
}
