//! The confix state machine.
//!
//! Every tracked path moves between two stable states:
//!
//! ```text
//!            add / link
//!   PlainFile ---------> Linked
//!   Absent    <--------- (unlink restores a PlainFile)
//! ```
//!
//! `ForeignLink` is an error-only state: no operation repairs it without
//! `--force` or manual intervention.  Each operation classifies the path
//! first and never caches the result.
use anyhow::{Context as _, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ConfixError;
use crate::exec::{Executor, SystemExecutor, resolve_program};
use crate::logging::Log;
use crate::paths::{self, PathCodec};
use crate::resources::ResourceChange;
use crate::resources::backup::BackupManager;
use crate::resources::helpers::fs::{ensure_parent_dir, remove_existing, same_content};
use crate::resources::link::{LinkInspector, LinkState, create_symlink};
use crate::resources::repository::RepositoryStore;

const HINT_IDENTICAL: &str = "contents are identical, use `link --force` to link it";
const HINT_DIFFERENT: &str = "contents differ, use `merge` or `add --force`";

/// A file tracked by the repository, as reported by [`Engine::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEntry {
    /// Original absolute user path.
    pub path: PathBuf,
    /// Current state of the user path.
    pub state: LinkState,
}

impl TrackedEntry {
    /// Whether the user path is a symlink to its repository copy.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.state == LinkState::Linked
    }
}

/// Implements the user-facing operations on top of the resource layer.
pub struct Engine {
    codec: PathCodec,
    inspector: LinkInspector,
    store: RepositoryStore,
    backups: BackupManager,
    merge_tool: Option<PathBuf>,
    executor: Arc<dyn Executor>,
    log: Arc<dyn Log>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("codec", &self.codec)
            .field("backups", &self.backups)
            .field("merge_tool", &self.merge_tool)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine for the repository `codec` maps into, writing
    /// backups through `backups` and reporting through `log`.
    ///
    /// No merge tool is configured; processes are spawned with
    /// [`SystemExecutor`].
    #[must_use]
    pub fn new(codec: PathCodec, backups: BackupManager, log: Arc<dyn Log>) -> Self {
        Self {
            inspector: LinkInspector::new(codec.clone()),
            store: RepositoryStore::new(codec.repo_root().to_path_buf()),
            codec,
            backups,
            merge_tool: None,
            executor: Arc::new(SystemExecutor),
            log,
        }
    }

    /// Set the merge tool used by [`merge`](Self::merge).
    #[must_use]
    pub fn with_merge_tool(mut self, merge_tool: Option<PathBuf>) -> Self {
        self.merge_tool = merge_tool;
        self
    }

    /// Replace the process executor.
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }

    /// Repository root directory.
    #[must_use]
    pub fn repo_root(&self) -> &Path {
        self.codec.repo_root()
    }

    /// Current state of `path`.
    ///
    /// # Errors
    ///
    /// See [`LinkInspector::classify`].
    pub fn classify(&self, path: &Path) -> Result<LinkState> {
        self.inspector.classify(path)
    }

    /// Copy `path` into the repository and replace it with a symlink to the
    /// copy.
    ///
    /// # Errors
    ///
    /// Fails without touching the filesystem if `path` does not exist, is not
    /// a regular file, is a symlink (unless `force`), lies inside the
    /// repository, or already has a repository copy (unless `force`).
    pub fn add(&self, path: &Path, force: bool) -> Result<ResourceChange> {
        let path = self.resolve(path)?;
        if self.inspector.classify(&path)? == LinkState::Linked {
            self.log
                .info(&format!("{} is already linked", path.display()));
            return Ok(ResourceChange::AlreadyCorrect);
        }
        if path.starts_with(self.codec.repo_root()) {
            return Err(ConfixError::InsideRepository(path).into());
        }

        let meta = match std::fs::symlink_metadata(&path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConfixError::NotFound(path).into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading metadata: {}", path.display()));
            }
        };
        if meta.is_symlink() {
            if !force {
                return Err(ConfixError::IsSymlink(path).into());
            }
            // Forced: the file the link points to is what gets added.
            if !path.is_file() {
                return Err(ConfixError::NotAFile(path).into());
            }
        } else if !meta.is_file() {
            return Err(ConfixError::NotAFile(path).into());
        }

        let repo_path = self.codec.to_repo_path(&path)?;
        if self.store.exists(&repo_path) && !force {
            let hint = if same_content(&path, &repo_path)? {
                HINT_IDENTICAL
            } else {
                HINT_DIFFERENT
            };
            return Err(ConfixError::AlreadyInRepo { path, hint }.into());
        }

        self.store.copy_in(&path, &repo_path)?;
        self.log.debug(&format!(
            "copied {} to {}",
            path.display(),
            repo_path.display()
        ));
        self.link(&path, true)?;
        Ok(ResourceChange::Applied)
    }

    /// Create the symlink from `path` to its repository copy.
    ///
    /// With `force`, an existing entry at `path` is backed up and removed
    /// first.
    ///
    /// # Errors
    ///
    /// Fails if the repository has no copy of `path`, if something exists at
    /// `path` and `force` is not set, or if `path` is a directory.
    pub fn link(&self, path: &Path, force: bool) -> Result<ResourceChange> {
        let path = self.resolve(path)?;
        let state = self.inspector.classify(&path)?;
        if state == LinkState::Linked {
            self.log
                .info(&format!("{} is already linked", path.display()));
            return Ok(ResourceChange::AlreadyCorrect);
        }

        let repo_path = self.codec.to_repo_path(&path)?;
        if !self.store.exists(&repo_path) {
            return Err(ConfixError::UnknownPath(path).into());
        }

        match state {
            LinkState::Absent => ensure_parent_dir(&path)?,
            _ if !force => return Err(ConfixError::AlreadyExists(path).into()),
            LinkState::PlainFile if is_directory(&path) => {
                return Err(ConfixError::NotAFile(path).into());
            }
            _ => {
                let backup = self.backups.backup(&path)?;
                self.log.info(&format!(
                    "original file backed up to: {}",
                    backup.display()
                ));
                remove_existing(&path)?;
            }
        }

        create_symlink(&repo_path, &path)?;
        self.log.info(&format!(
            "linked {} -> {}",
            path.display(),
            repo_path.display()
        ));
        Ok(ResourceChange::Applied)
    }

    /// Replace the symlink at `path` with a plain copy of the repository
    /// file.  The repository copy is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfixError::NotLinked`] or [`ConfixError::DifferentLink`]
    /// unless `path` is linked.
    pub fn unlink(&self, path: &Path) -> Result<()> {
        let path = self.resolve(path)?;
        match self.inspector.classify(&path)? {
            LinkState::Linked => {}
            LinkState::ForeignLink { target } => {
                return Err(ConfixError::DifferentLink { path, target }.into());
            }
            LinkState::PlainFile | LinkState::Absent => {
                return Err(ConfixError::NotLinked(path).into());
            }
        }

        let repo_path = self.codec.to_repo_path(&path)?;
        self.store.copy_out(&repo_path, &path)?;
        self.log.info(&format!("unlinked {}", path.display()));
        Ok(())
    }

    /// Delete the repository copy of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfixError::StillLinked`] if `path` is linked, or
    /// [`ConfixError::NotInRepo`] if there is no copy.
    pub fn rm(&self, path: &Path) -> Result<()> {
        let path = self.resolve(path)?;
        if self.inspector.classify(&path)? == LinkState::Linked {
            return Err(ConfixError::StillLinked(path).into());
        }
        let repo_path = self.codec.to_repo_path(&path)?;
        if !self.store.exists(&repo_path) {
            return Err(ConfixError::NotInRepo(path).into());
        }

        self.store.remove(&repo_path)?;
        self.log
            .info(&format!("removed {} from repository", path.display()));
        Ok(())
    }

    /// Run the merge tool on `path` and its repository copy.
    ///
    /// # Errors
    ///
    /// Fails before invoking anything if `path` or its repository copy is
    /// missing, or the merge tool is unset or cannot be found.  Returns
    /// [`ConfixError::MergeToolFailed`] if the tool exits non-zero.
    pub fn merge(&self, path: &Path) -> Result<()> {
        let path = self.resolve(path)?;
        // Follows links: a dangling link has nothing to merge.
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(ConfixError::NotAFile(path).into()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConfixError::NotFound(path).into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading metadata: {}", path.display()));
            }
        }
        let repo_path = self.codec.to_repo_path(&path)?;
        if !self.store.exists(&repo_path) {
            return Err(ConfixError::NotInRepo(path).into());
        }

        let tool = self
            .merge_tool
            .as_deref()
            .ok_or(ConfixError::MergeToolUnset)?;
        let program = resolve_program(tool)
            .ok_or_else(|| ConfixError::MergeToolNotFound(tool.to_path_buf()))?;

        if self.inspector.classify(&path)? == LinkState::Linked {
            self.log.warn(&format!(
                "{} is linked: both sides are the same file",
                path.display()
            ));
        }

        self.log.debug(&format!(
            "running {} {} {}",
            program.display(),
            path.display(),
            repo_path.display()
        ));
        let code = self.executor.run_tool(&program, &[path, repo_path])?;
        if code != Some(0) {
            return Err(ConfixError::MergeToolFailed {
                tool: program,
                code,
            }
            .into());
        }
        Ok(())
    }

    /// Every tracked file with its current state, in repository traversal
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be walked or an entry
    /// cannot be decoded or classified.
    pub fn list(&self) -> Result<Vec<TrackedEntry>> {
        self.store
            .list_all()?
            .iter()
            .map(|repo_path| {
                let path = self.codec.from_repo_path(repo_path)?;
                let state = self.inspector.classify(&path)?;
                Ok(TrackedEntry { path, state })
            })
            .collect()
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        self.codec.unmask(&paths::normalize(path)?)
    }
}

fn is_directory(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|m| m.is_dir())
}
