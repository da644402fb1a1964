//! File-system resource helpers.
use anyhow::{Context as _, Result};
use filetime::FileTime;
use sha2::{Digest as _, Sha256};
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Remove an existing file or symlink at `path`, including broken symlinks.
/// Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    if path.symlink_metadata().is_ok() {
        std::fs::remove_file(path)
            .with_context(|| format!("remove existing: {}", path.display()))?;
    }
    Ok(())
}

/// Copy the content of `src` to `dst`, then carry over the permission bits
/// and the access/modification times.  Symlinks at `src` are followed.
///
/// # Errors
///
/// Returns an error if `src` cannot be read, or `dst` cannot be written or
/// have its times set.
pub fn copy_with_metadata(src: &Path, dst: &Path) -> Result<()> {
    let meta =
        std::fs::metadata(src).with_context(|| format!("reading metadata: {}", src.display()))?;
    // std::fs::copy also copies the permission bits.
    std::fs::copy(src, dst)
        .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
    filetime::set_file_times(
        dst,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )
    .with_context(|| format!("setting file times: {}", dst.display()))?;
    Ok(())
}

/// Replace whatever is at `target` (typically a symlink) with a copy of
/// `source`.
///
/// The copy is staged to a fresh sibling file first and renamed into place
/// after `target` is removed, so the window where `target` is absent is as
/// small as possible.  Existing files next to `target` are never reused as
/// the staging file.  On failure the staged file is cleaned up.
///
/// # Errors
///
/// Returns an error if staging, removal, or the final rename fails.
pub fn replace_with_copy(source: &Path, target: &Path) -> Result<()> {
    let tmp = stage_copy(source, target)?;

    let cleanup = || {
        let _ = std::fs::remove_file(&tmp);
    };

    if let Err(e) = remove_existing(target) {
        cleanup();
        return Err(e);
    }
    if let Err(e) = std::fs::rename(&tmp, target) {
        cleanup();
        return Err(e).with_context(|| format!("rename {} to {}", tmp.display(), target.display()));
    }
    Ok(())
}

/// Copy `source` with its metadata into a newly created staging file next to
/// `target` and return the staging path.
fn stage_copy(source: &Path, target: &Path) -> Result<PathBuf> {
    let meta = std::fs::metadata(source)
        .with_context(|| format!("reading metadata: {}", source.display()))?;
    let mut input =
        std::fs::File::open(source).with_context(|| format!("opening {}", source.display()))?;
    let (tmp, mut output) = create_staging_file(target)?;

    let copied = std::io::copy(&mut input, &mut output)
        .and_then(|_| output.set_permissions(meta.permissions()));
    drop(output);
    let staged = copied
        .with_context(|| format!("copying {} to {}", source.display(), tmp.display()))
        .and_then(|()| {
            filetime::set_file_times(
                &tmp,
                FileTime::from_last_access_time(&meta),
                FileTime::from_last_modification_time(&meta),
            )
            .with_context(|| format!("setting file times: {}", tmp.display()))
        });
    if let Err(e) = staged {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(tmp)
}

/// Attempts at finding an unused staging name before giving up.
const STAGING_ATTEMPTS: u32 = 100;

fn create_staging_file(target: &Path) -> Result<(PathBuf, std::fs::File)> {
    for attempt in 0..STAGING_ATTEMPTS {
        let tmp = staging_path(target, attempt);
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)
        {
            Ok(file) => return Ok((tmp, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(e).with_context(|| format!("creating {}", tmp.display()));
            }
        }
    }
    anyhow::bail!("no free staging file name next to {}", target.display())
}

/// Sibling temp name on the same filesystem, so the rename is atomic.
fn staging_path(target: &Path, attempt: u32) -> PathBuf {
    let mut name = target
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".confix_tmp");
    if attempt > 0 {
        name.push(format!(".{attempt}"));
    }
    target.with_file_name(name)
}

/// Remove `start` and its ancestors while they are empty, stopping before
/// `stop`.  Directories outside `stop` are never touched.
pub fn prune_empty_dirs(start: &Path, stop: &Path) {
    let mut dir = start;
    while dir != stop && dir.starts_with(stop) {
        if std::fs::remove_dir(dir).is_err() {
            break;
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }
}

/// Whether two files have identical content, by SHA-256 digest.
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub fn same_content(a: &Path, b: &Path) -> Result<bool> {
    Ok(file_digest(a)? == file_digest(b)?)
}

fn file_digest(path: &Path) -> Result<Vec<u8>> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(hasher.finalize().to_vec())
}
