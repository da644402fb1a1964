//! Command: copy a file into the repository and link it.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::{FileOpts, GlobalOpts};
use crate::logging::Logger;
use crate::resources::ResourceChange;

/// Run the add command.
///
/// # Errors
///
/// Returns an error if setup fails or the file cannot be added.
pub fn run(global: &GlobalOpts, opts: &FileOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    if setup.engine.add(&opts.file, opts.force)? == ResourceChange::Applied {
        log.info(&format!("added {}", opts.file.display()));
    }
    Ok(())
}
