//! Running external programs (the merge tool).
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Capability to run an external tool to completion.
///
/// Production code uses [`SystemExecutor`]; engine tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
pub trait Executor: Send + Sync {
    /// Run `program` with `args` as discrete arguments, inheriting the
    /// terminal, and wait for it to exit.
    ///
    /// Returns the exit code, or `None` if the process was terminated by a
    /// signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run_tool(&self, program: &Path, args: &[PathBuf]) -> Result<Option<i32>>;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_tool(&self, program: &Path, args: &[PathBuf]) -> Result<Option<i32>> {
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to execute: {}", program.display()))?;
        Ok(status.code())
    }
}

/// Resolve a configured program to an executable path.
///
/// Accepts an absolute or relative path to an executable, or a bare program
/// name looked up on `PATH`.  Returns `None` if nothing executable matches.
#[must_use]
pub fn resolve_program(program: &Path) -> Option<PathBuf> {
    which::which(program).ok()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn system_executor_reports_exit_code() {
        let code = SystemExecutor
            .run_tool(Path::new("sh"), &[PathBuf::from("-c"), PathBuf::from("exit 3")])
            .unwrap();
        assert_eq!(code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_success() {
        let code = SystemExecutor.run_tool(Path::new("true"), &[]).unwrap();
        assert_eq!(code, Some(0));
    }

    #[test]
    fn system_executor_missing_program_is_error() {
        let result = SystemExecutor.run_tool(Path::new("nonexistent_program_xyz_12345"), &[]);
        assert!(result.is_err(), "spawning a missing program should fail");
    }

    #[test]
    fn resolve_program_finds_known_program() {
        // `cmd` always exists on Windows; `sh` is a real binary on Unix.
        #[cfg(windows)]
        assert!(resolve_program(Path::new("cmd")).is_some());
        #[cfg(not(windows))]
        assert!(resolve_program(Path::new("sh")).is_some());
    }

    #[test]
    fn resolve_program_missing_program() {
        assert!(resolve_program(Path::new("nonexistent_program_xyz_12345")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn resolve_program_rejects_non_executable_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-tool");
        std::fs::write(&file, "plain text").unwrap();
        assert!(resolve_program(&file).is_none());
    }
}
