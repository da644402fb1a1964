//! Domain error type for the confix engine.
//!
//! Every precondition violation raised by the engine is a [`ConfixError`].
//! Engine operations return [`anyhow::Result`]; domain errors travel inside it
//! and are recovered at the CLI boundary with `downcast_ref`, which decides
//! the process exit code.  Anything that is not a `ConfixError` (permission
//! denied, disk full, ...) is an unexpected fault.
//!
//! # Variants by operation
//!
//! ```text
//! add     NotFound, NotAFile, IsSymlink, AlreadyInRepo, InsideRepository
//! link    UnknownPath, AlreadyExists, NotAFile
//! unlink  NotLinked, DifferentLink
//! rm      StillLinked, NotInRepo
//! merge   NotFound, NotAFile, NotInRepo, MergeToolUnset, MergeToolNotFound, MergeToolFailed
//! setup   InvalidRoot, InvalidRepository, HomeUnavailable
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when an operation's preconditions are not met.
#[derive(Error, Debug)]
pub enum ConfixError {
    /// Nothing exists at the given path.
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    /// The path exists but is not a regular file (e.g. a directory).
    #[error("{} is not a file", .0.display())]
    NotAFile(PathBuf),

    /// The path is a symbolic link and `--force` was not given.
    #[error("{} is a symlink (use --force to add the file it points to)", .0.display())]
    IsSymlink(PathBuf),

    /// The repository already holds a copy of the path.
    #[error("{} already exists in repo ({hint})", .path.display())]
    AlreadyInRepo {
        /// The user path being added.
        path: PathBuf,
        /// Suggested recovery, depending on whether the copies differ.
        hint: &'static str,
    },

    /// The path lives inside the repository itself.
    #[error("{} is inside the repository", .0.display())]
    InsideRepository(PathBuf),

    /// The repository has no copy of the path.
    #[error("don't know {}: it is not in the repository", .0.display())]
    UnknownPath(PathBuf),

    /// Something is already at the path and `--force` was not given.
    #[error("{} already exists (you might want to use --force)", .0.display())]
    AlreadyExists(PathBuf),

    /// The path is not a symlink into the repository.
    #[error("{} is not linked", .0.display())]
    NotLinked(PathBuf),

    /// The path is a symlink, but not to its repository copy.
    #[error("{} is a different link (points to {})", .path.display(), .target.display())]
    DifferentLink {
        /// The user path.
        path: PathBuf,
        /// Where the link actually points.
        target: PathBuf,
    },

    /// `rm` was asked to remove a file that is still linked.
    #[error("{} is still linked (unlink it first)", .0.display())]
    StillLinked(PathBuf),

    /// The repository has no copy of the path.
    #[error("{} does not exist in the repository", .0.display())]
    NotInRepo(PathBuf),

    /// No merge tool has been configured.
    #[error("no merge tool configured (set MERGE_TOOL with `confix set-merge-tool <path>`)")]
    MergeToolUnset,

    /// The configured merge tool cannot be found.
    #[error("merge tool {} not found", .0.display())]
    MergeToolNotFound(PathBuf),

    /// The merge tool exited unsuccessfully.
    #[error("merge tool {} failed ({})", .tool.display(), exit_description(.code))]
    MergeToolFailed {
        /// Resolved path of the merge tool.
        tool: PathBuf,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },

    /// The root directory path exists but is not a directory.
    #[error("root directory {} is not a directory", .0.display())]
    InvalidRoot(PathBuf),

    /// A repository location that does not exist or is not a directory.
    #[error("repository {} is not an existing directory", .0.display())]
    InvalidRepository(PathBuf),

    /// The home directory could not be determined from the environment.
    #[error("home directory could not be determined (is HOME set?)")]
    HomeUnavailable,
}

#[allow(clippy::ref_option)]
fn exit_description(code: &Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |c| format!("exit {c}"),
    )
}
