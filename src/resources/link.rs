//! Link state inspection and symlink primitives.
use anyhow::{Context as _, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::paths::{self, PathCodec};

/// Relationship between a user path and its repository copy.
///
/// Derived from the filesystem on every call; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Symlink to the repository copy, which exists as a regular file.
    Linked,
    /// Something that is not a symlink exists at the path.
    PlainFile,
    /// Nothing exists at the path.
    Absent,
    /// Symlink that points elsewhere, or at a repository copy that is missing.
    ForeignLink {
        /// Where the link points (as read, relative targets resolved).
        target: PathBuf,
    },
}

impl LinkState {
    /// Short machine-readable name of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linked => "linked",
            Self::PlainFile => "plain_file",
            Self::Absent => "absent",
            Self::ForeignLink { .. } => "foreign_link",
        }
    }
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ForeignLink { target } => write!(f, "foreign link -> {}", target.display()),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Classifies user paths against the repository.
#[derive(Debug, Clone)]
pub struct LinkInspector {
    codec: PathCodec,
}

impl LinkInspector {
    /// Create an inspector that compares links against `codec`'s mapping.
    #[must_use]
    pub const fn new(codec: PathCodec) -> Self {
        Self { codec }
    }

    /// Classify `path`.
    ///
    /// The path is normalized and unmasked first, so entries taken from a
    /// repository listing can be passed straight in.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved (see
    /// [`PathCodec::unmask`]) or its metadata cannot be read for a reason
    /// other than the path being absent.
    pub fn classify(&self, path: &Path) -> Result<LinkState> {
        let path = self.codec.unmask(&paths::normalize(path)?)?;

        let meta = match std::fs::symlink_metadata(&path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LinkState::Absent),
            Err(e) => {
                return Err(e).with_context(|| format!("reading metadata: {}", path.display()));
            }
        };
        if !meta.is_symlink() {
            return Ok(LinkState::PlainFile);
        }

        let raw = std::fs::read_link(&path)
            .with_context(|| format!("reading link: {}", path.display()))?;
        let target = match path.parent() {
            Some(parent) if raw.is_relative() => parent.join(&raw),
            _ => raw,
        };

        let expected = self.codec.to_repo_path(&path)?;
        if points_to(&target, &expected) && is_regular_file(&expected) {
            Ok(LinkState::Linked)
        } else {
            Ok(LinkState::ForeignLink { target })
        }
    }
}

/// Whether a link target designates `expected`, either lexically or after
/// canonicalizing both sides.
fn points_to(target: &Path, expected: &Path) -> bool {
    if paths::normalize(target).is_ok_and(|t| t == expected) {
        return true;
    }
    match (dunce::canonicalize(target), dunce::canonicalize(expected)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn is_regular_file(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|m| m.is_file())
}

/// Create a symlink at `link` pointing to `target`.
///
/// # Errors
///
/// Returns an error if the link cannot be created (e.g. `link` exists, or
/// on Windows without symlink privileges).
pub fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(target, link);
    #[cfg(windows)]
    let result = std::os::windows::fs::symlink_file(target, link);

    result.with_context(|| {
        format!(
            "creating symlink {} -> {}",
            link.display(),
            target.display()
        )
    })
}
