//! Command: show the configured locations.
use anyhow::Result;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::config::{RootDir, Settings};
use crate::exec::resolve_program;
use crate::logging::Logger;

/// Run the info command.
///
/// Does not create or validate the repository, so it can be used to
/// inspect a broken setup.
///
/// # Errors
///
/// Returns an error if the root cannot be opened, the settings cannot be
/// read, or stdout cannot be written.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let root = super::open_root(global, log)?;
    let settings = root.load_settings()?;
    let tool = settings.merge_tool.as_deref();
    let resolved = tool.and_then(resolve_program);
    let output = format_info(&root, &settings, tool.map(|t| (t, resolved.as_deref())));
    std::io::stdout().lock().write_all(output.as_bytes())?;
    Ok(())
}

/// Render the info report.  `merge_tool` is the configured tool and its
/// resolved location, if any.
fn format_info(
    root: &RootDir,
    settings: &Settings,
    merge_tool: Option<(&Path, Option<&Path>)>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "repository: {}", root.repo_dir(settings).display());
    let _ = writeln!(out, "root:       {}", root.path().display());
    let _ = writeln!(out, "backups:    {}", root.backup_dir().display());
    let tool = match merge_tool {
        None => "(unset)".to_string(),
        Some((tool, Some(resolved))) if tool != resolved => {
            format!("{} ({})", tool.display(), resolved.display())
        }
        Some((tool, Some(_))) => tool.display().to_string(),
        Some((tool, None)) => format!("{} (not found)", tool.display()),
    };
    let _ = writeln!(out, "merge tool: {tool}");
    out
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn info_lists_locations() {
        let dir = tempfile::tempdir().unwrap();
        let root = RootDir::open(dir.path()).unwrap();
        let settings = Settings {
            repo: Some(PathBuf::from("/srv/dots")),
            merge_tool: None,
        };
        let out = format_info(&root, &settings, None)
            .replace(&dir.path().display().to_string(), "<root>");
        insta::assert_snapshot!(out, @r"
        repository: /srv/dots
        root:       <root>
        backups:    <root>/backup
        merge tool: (unset)
        ");
    }

    #[test]
    fn info_shows_resolved_merge_tool() {
        let dir = tempfile::tempdir().unwrap();
        let root = RootDir::open(dir.path()).unwrap();
        let out = format_info(
            &root,
            &Settings::default(),
            Some((Path::new("meld"), Some(Path::new("/usr/bin/meld")))),
        );
        assert!(out.contains("merge tool: meld (/usr/bin/meld)"));
    }

    #[test]
    fn info_flags_missing_merge_tool() {
        let dir = tempfile::tempdir().unwrap();
        let root = RootDir::open(dir.path()).unwrap();
        let out = format_info(&root, &Settings::default(), Some((Path::new("nope"), None)));
        assert!(out.contains("nope (not found)"));
    }
}
