//! Timestamped backups of user files.
use anyhow::{Context as _, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

use super::helpers::fs::{copy_with_metadata, ensure_parent_dir};
use super::link::create_symlink;
use crate::paths;

/// `strftime` format of the suffix appended to backup file names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Copies files into a backup tree that mirrors their absolute paths.
///
/// `/home/u/.vimrc` backed up at 2024-05-01 10:00:00 lands at
/// `<root>/home/u/.vimrc.2024-05-01_10-00-00`.  Backups are append-only:
/// a second backup within the same second gets a `-1`, `-2`, ... suffix.
#[derive(Debug, Clone)]
pub struct BackupManager {
    root: PathBuf,
}

impl BackupManager {
    /// Create a manager that writes below `root`.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Back up the file or symlink at `path` and return the backup location.
    ///
    /// Regular files are copied with their mode and timestamps.  Symlinks are
    /// recreated as symlinks with the same target, so broken links can be
    /// backed up too.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be read or the backup cannot be
    /// written.
    pub fn backup(&self, path: &Path) -> Result<PathBuf> {
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.backup_with_stamp(path, &stamp)
    }

    fn backup_with_stamp(&self, path: &Path, stamp: &str) -> Result<PathBuf> {
        let path = paths::normalize(path)?;
        let dest = self.free_destination(&path, stamp);
        ensure_parent_dir(&dest)?;

        let meta = std::fs::symlink_metadata(&path)
            .with_context(|| format!("reading metadata: {}", path.display()))?;
        if meta.is_symlink() {
            let target = std::fs::read_link(&path)
                .with_context(|| format!("reading link: {}", path.display()))?;
            create_symlink(&target, &dest)?;
        } else {
            copy_with_metadata(&path, &dest)
                .with_context(|| format!("backing up {}", path.display()))?;
        }
        Ok(dest)
    }

    /// First `<mirror>.<stamp>[-N]` location that does not exist yet.
    fn free_destination(&self, path: &Path, stamp: &str) -> PathBuf {
        let base = self.root.join(paths::strip_root(path));
        let name = base
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut candidate = base.with_file_name(format!("{name}.{stamp}"));
        let mut n = 1_u32;
        while candidate.symlink_metadata().is_ok() {
            candidate = base.with_file_name(format!("{name}.{stamp}-{n}"));
            n += 1;
        }
        candidate
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    const STAMP: &str = "2024-05-01_10-00-00";

    #[test]
    fn backup_mirrors_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("home").join(".vimrc");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "original").unwrap();
        let backups = BackupManager::new(dir.path().join("backup"));

        let dest = backups.backup_with_stamp(&file, STAMP).unwrap();

        let expected = dir
            .path()
            .join("backup")
            .join(paths::strip_root(&file))
            .with_file_name(format!(".vimrc.{STAMP}"));
        assert_eq!(dest, expected);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "original");
        assert!(file.exists(), "original must be left in place");
    }

    #[test]
    fn second_backup_in_same_second_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hosts");
        std::fs::write(&file, "first").unwrap();
        let backups = BackupManager::new(dir.path().join("backup"));

        let first = backups.backup_with_stamp(&file, STAMP).unwrap();
        std::fs::write(&file, "second").unwrap();
        let second = backups.backup_with_stamp(&file, STAMP).unwrap();

        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with(&format!("{STAMP}-1")));
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "first");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "second");
    }

    #[test]
    fn symlink_is_backed_up_as_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("dangling");
        std::os::unix::fs::symlink("/nonexistent/target", &link).unwrap();
        let backups = BackupManager::new(dir.path().join("backup"));

        let dest = backups.backup_with_stamp(&link, STAMP).unwrap();

        assert_eq!(
            std::fs::read_link(&dest).unwrap(),
            PathBuf::from("/nonexistent/target")
        );
    }

    #[test]
    fn backup_of_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let backups = BackupManager::new(dir.path().join("backup"));
        assert!(backups.backup(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn timestamp_format_has_second_granularity() {
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        assert_eq!(stamp.len(), STAMP.len());
    }
}
