//! Command: delete a file's repository copy.
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the rm command.
///
/// # Errors
///
/// Returns an error if setup fails, `file` is still linked, or it has no
/// repository copy.
pub fn run(global: &GlobalOpts, file: &Path, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    setup.engine.rm(file)
}
