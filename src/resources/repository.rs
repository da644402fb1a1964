//! Physical storage of tracked files in the repository directory.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::helpers::fs::{
    copy_with_metadata, ensure_parent_dir, prune_empty_dirs, remove_existing, replace_with_copy,
};

/// Directory name skipped at the top of the repository by [`RepositoryStore::list_all`].
const VCS_DIR: &str = ".git";

/// Owns the files below the repository root.
#[derive(Debug, Clone)]
pub struct RepositoryStore {
    root: PathBuf,
}

impl RepositoryStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Repository root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a regular file is stored at `repo_path`.
    #[must_use]
    pub fn exists(&self, repo_path: &Path) -> bool {
        std::fs::symlink_metadata(repo_path).is_ok_and(|m| m.is_file())
    }

    /// Copy `src` into the repository at `repo_path`, replacing any existing
    /// copy.  Parent directories are created; mode and timestamps are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy fails.
    pub fn copy_in(&self, src: &Path, repo_path: &Path) -> Result<()> {
        ensure_parent_dir(repo_path)?;
        remove_existing(repo_path)?;
        copy_with_metadata(src, repo_path)
    }

    /// Copy the repository file at `repo_path` to `dst`, replacing whatever
    /// is at `dst`.  The repository copy is not modified.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy or the replacement of `dst` fails.
    pub fn copy_out(&self, repo_path: &Path, dst: &Path) -> Result<()> {
        replace_with_copy(repo_path, dst)
    }

    /// Delete the repository file at `repo_path` and prune directories left
    /// empty, up to the repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    pub fn remove(&self, repo_path: &Path) -> Result<()> {
        std::fs::remove_file(repo_path)
            .with_context(|| format!("removing {}", repo_path.display()))?;
        if let Some(parent) = repo_path.parent() {
            prune_empty_dirs(parent, &self.root);
        }
        Ok(())
    }

    /// Every regular file below the root, in sorted traversal order.
    ///
    /// A top-level `.git` directory is skipped.  A missing root yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory in the tree cannot be read.
    pub fn list_all(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !(e.depth() == 1 && e.file_name() == VCS_DIR));
        for entry in walker {
            let entry =
                entry.with_context(|| format!("walking repository {}", self.root.display()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, RepositoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RepositoryStore::new(dir.path().join("repo"));
        std::fs::create_dir_all(store.root()).unwrap();
        (dir, store)
    }

    #[test]
    fn copy_in_creates_parents() {
        let (dir, store) = store();
        let src = dir.path().join("init.lua");
        std::fs::write(&src, "vim.o.number = true").unwrap();
        let dest = store.root().join("__HOME__/.config/nvim/init.lua");

        store.copy_in(&src, &dest).unwrap();

        assert!(store.exists(&dest));
        assert_eq!(
            std::fs::read_to_string(&dest).unwrap(),
            "vim.o.number = true"
        );
    }

    #[test]
    fn copy_in_overwrites_existing_copy() {
        let (dir, store) = store();
        let src = dir.path().join("f");
        let dest = store.root().join("f");
        std::fs::write(&dest, "old").unwrap();
        std::fs::write(&src, "new").unwrap();

        store.copy_in(&src, &dest).unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn exists_is_false_for_directories() {
        let (_dir, store) = store();
        let sub = store.root().join("etc");
        std::fs::create_dir(&sub).unwrap();
        assert!(!store.exists(&sub));
        assert!(!store.exists(&store.root().join("missing")));
    }

    #[test]
    fn copy_out_leaves_repo_copy_untouched() {
        let (dir, store) = store();
        let stored = store.root().join("f");
        std::fs::write(&stored, "repo").unwrap();
        let dst = dir.path().join("f");

        store.copy_out(&stored, &dst).unwrap();

        assert_eq!(std::fs::read_to_string(&dst).unwrap(), "repo");
        assert_eq!(std::fs::read_to_string(&stored).unwrap(), "repo");
    }

    #[test]
    fn remove_prunes_empty_parents() {
        let (_dir, store) = store();
        let stored = store.root().join("etc/app/conf");
        std::fs::create_dir_all(stored.parent().unwrap()).unwrap();
        std::fs::write(&stored, "").unwrap();

        store.remove(&stored).unwrap();

        assert!(!store.root().join("etc").exists());
        assert!(store.root().exists());
    }

    #[test]
    fn remove_missing_file_fails() {
        let (_dir, store) = store();
        assert!(store.remove(&store.root().join("missing")).is_err());
    }

    #[test]
    fn list_all_is_sorted_and_recursive() {
        let (_dir, store) = store();
        for rel in ["b", "a/z", "a/y", "__HOME__/.vimrc"] {
            let p = store.root().join(rel);
            std::fs::create_dir_all(p.parent().unwrap()).unwrap();
            std::fs::write(&p, "").unwrap();
        }

        let files = store.list_all().unwrap();

        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(store.root()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("__HOME__/.vimrc"),
                PathBuf::from("a/y"),
                PathBuf::from("a/z"),
                PathBuf::from("b"),
            ]
        );
    }

    #[test]
    fn list_all_skips_top_level_git_dir() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.root().join(".git/objects")).unwrap();
        std::fs::write(store.root().join(".git/HEAD"), "ref").unwrap();
        std::fs::create_dir_all(store.root().join("etc")).unwrap();
        std::fs::write(store.root().join("etc/hosts"), "").unwrap();

        let files = store.list_all().unwrap();

        assert_eq!(files, vec![store.root().join("etc/hosts")]);
    }

    #[test]
    fn list_all_on_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RepositoryStore::new(dir.path().join("nope"));
        assert!(store.list_all().unwrap().is_empty());
    }
}
