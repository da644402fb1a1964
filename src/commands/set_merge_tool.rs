//! Command: set the merge tool.
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::config::RootDir;
use crate::exec::resolve_program;
use crate::logging::{Log, Logger};
use crate::paths;

/// Run the set-merge-tool command.
///
/// The setting is saved even when the tool cannot be found, with a warning.
///
/// # Errors
///
/// Returns an error if the root cannot be opened or the settings cannot be
/// saved.
pub fn run(global: &GlobalOpts, tool: &Path, log: &Arc<Logger>) -> Result<()> {
    let root = super::open_root(global, log)?;
    let saved = set_merge_tool(&root, tool, log.as_ref())?;
    log.info(&format!("merge tool set to {}", saved.display()));
    Ok(())
}

/// Persist `tool` and return the stored value.
///
/// A bare program name is stored as given so it is looked up on `PATH` at
/// merge time; anything with a directory part is made absolute.
fn set_merge_tool(root: &RootDir, tool: &Path, log: &dyn Log) -> Result<PathBuf> {
    let stored = if tool.components().count() > 1 {
        paths::normalize(tool)?
    } else {
        tool.to_path_buf()
    };
    if resolve_program(&stored).is_none() {
        log.warn(&format!(
            "merge tool {} not found or not executable",
            stored.display()
        ));
    }
    let settings = root.update_settings(|s| s.merge_tool = Some(stored.clone()))?;
    Ok(settings.merge_tool.unwrap_or(stored))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::RecordingLog;

    #[test]
    fn bare_name_is_stored_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let root = RootDir::open(dir.path()).unwrap();
        let log = RecordingLog::default();

        let saved = set_merge_tool(&root, Path::new("sh"), &log).unwrap();

        assert_eq!(saved, PathBuf::from("sh"));
        assert_eq!(
            root.load_settings().unwrap().merge_tool,
            Some(PathBuf::from("sh"))
        );
    }

    #[test]
    fn missing_tool_warns_but_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let root = RootDir::open(dir.path()).unwrap();
        let log = RecordingLog::default();
        let tool = dir.path().join("no-such-tool");

        let saved = set_merge_tool(&root, &tool, &log).unwrap();

        assert_eq!(saved, tool);
        assert_eq!(log.messages("warn").len(), 1);
        assert_eq!(root.load_settings().unwrap().merge_tool, Some(tool));
    }

    #[test]
    fn relative_path_is_made_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let root = RootDir::open(dir.path()).unwrap();
        let log = RecordingLog::default();

        let saved = set_merge_tool(&root, Path::new("bin/merge"), &log).unwrap();

        assert!(saved.is_absolute());
        assert!(saved.ends_with("bin/merge"));
    }
}
