//! Mapping between user paths and their storage paths in the repository.
//!
//! A tracked path `/home/alice/.config/nvim/init.lua` is stored at
//! `<repo>/__HOME__/.config/nvim/init.lua`: the home-directory prefix is
//! replaced by [`HOME_PLACEHOLDER`] so the same repository can be checked out
//! on machines with different home directories.  Paths outside the home
//! directory are stored verbatim below the repository root
//! (`/etc/hosts` -> `<repo>/etc/hosts`).
use anyhow::Result;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::error::ConfixError;

/// Repository path component standing in for the user's home directory.
pub const HOME_PLACEHOLDER: &str = "__HOME__";

/// Return the current user's home directory from the environment.
///
/// Reads `HOME`, falling back to `USERPROFILE` on Windows.  Empty values are
/// treated as unset.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(target_os = "windows") {
        std::env::var_os("USERPROFILE").or_else(|| std::env::var_os("HOME"))
    } else {
        std::env::var_os("HOME")
    };
    var.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Make `path` absolute against the current directory and resolve `.` and
/// `..` lexically.  Symlinks are not followed.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn normalize(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Encodes user paths into repository paths and decodes them back.
#[derive(Debug, Clone)]
pub struct PathCodec {
    repo_root: PathBuf,
    home: Option<PathBuf>,
}

impl PathCodec {
    /// Create a codec for the repository at `repo_root`.
    ///
    /// `home` is the directory masked by [`HOME_PLACEHOLDER`]; pass
    /// [`home_dir()`] in production.
    #[must_use]
    pub fn new(repo_root: PathBuf, home: Option<PathBuf>) -> Self {
        let home = home.and_then(|h| normalize(&h).ok());
        Self { repo_root, home }
    }

    /// Root of the repository this codec maps into.
    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Map a user path to its storage path inside the repository.
    ///
    /// Input that already starts with the placeholder component is unmasked
    /// first, so listings can be fed back in.
    ///
    /// # Errors
    ///
    /// Returns [`ConfixError::HomeUnavailable`] for masked input when no home
    /// directory is known, or an I/O error if the current directory is needed
    /// and unavailable.
    pub fn to_repo_path(&self, path: &Path) -> Result<PathBuf> {
        Ok(self.repo_root.join(self.relative_key(path)?))
    }

    /// Repository-relative key for `path`, e.g. `__HOME__/.vimrc`.
    ///
    /// # Errors
    ///
    /// See [`to_repo_path`](Self::to_repo_path).
    pub fn relative_key(&self, path: &Path) -> Result<PathBuf> {
        let path = self.unmask(&normalize(path)?)?;

        if let Some(home) = &self.home
            && let Ok(rest) = path.strip_prefix(home)
        {
            return Ok(Path::new(HOME_PLACEHOLDER).join(rest));
        }

        Ok(strip_root(&path))
    }

    /// Map a storage path (absolute inside the repository, or relative to its
    /// root) back to the original absolute user path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfixError::HomeUnavailable`] if the path is home-masked and
    /// no home directory is known.
    pub fn from_repo_path(&self, repo_path: &Path) -> Result<PathBuf> {
        let relative = repo_path.strip_prefix(&self.repo_root).unwrap_or(repo_path);
        self.unmask(&root_dir().join(strip_root(relative)))
    }

    /// Replace a leading placeholder component of an absolute path with the
    /// home directory.  Paths without the placeholder are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfixError::HomeUnavailable`] if the placeholder is present
    /// and no home directory is known.
    pub fn unmask(&self, path: &Path) -> Result<PathBuf> {
        let rest = strip_root(path);
        let mut components = rest.components();
        if components.next() != Some(Component::Normal(OsStr::new(HOME_PLACEHOLDER))) {
            return Ok(path.to_path_buf());
        }
        let home = self.home.as_ref().ok_or(ConfixError::HomeUnavailable)?;
        Ok(home.join(components.as_path()))
    }
}

/// Drop the prefix and root components, leaving a relative path.
pub(crate) fn strip_root(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect()
}

fn root_dir() -> PathBuf {
    PathBuf::from(std::path::MAIN_SEPARATOR_STR)
}
