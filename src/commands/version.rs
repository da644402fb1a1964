//! Command: print version information.
use anyhow::Result;
use std::io::Write as _;

/// Version string, from the build script when built inside a git checkout.
#[must_use]
pub fn version() -> &'static str {
    option_env!("CONFIX_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the confix version to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run() -> Result<()> {
    writeln!(std::io::stdout().lock(), "confix {}", version())?;
    Ok(())
}
