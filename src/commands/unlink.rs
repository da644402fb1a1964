//! Command: turn a link back into a plain file.
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the unlink command.
///
/// # Errors
///
/// Returns an error if setup fails or `file` is not linked.
pub fn run(global: &GlobalOpts, file: &Path, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    setup.engine.unlink(file)
}
