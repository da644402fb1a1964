//! Command: list tracked files.
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::engine::TrackedEntry;
use crate::logging::Logger;

/// One entry of `list --json`.
#[derive(Debug, Serialize)]
struct JsonEntry<'a> {
    path: &'a Path,
    linked: bool,
    state: &'static str,
}

/// Run the list command.
///
/// # Errors
///
/// Returns an error if setup fails, the repository cannot be read, or stdout
/// cannot be written.
pub fn run(global: &GlobalOpts, json: bool, log: &Arc<Logger>) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let entries = setup.engine.list()?;
    log.debug(&format!("{} tracked file(s)", entries.len()));

    let output = if json {
        format_json(&entries)?
    } else {
        format_plain(&entries)
    };
    std::io::stdout().lock().write_all(output.as_bytes())?;
    Ok(())
}

/// One line per entry: `+` for linked files, a space otherwise, then the path.
fn format_plain(entries: &[TrackedEntry]) -> String {
    entries.iter().fold(String::new(), |mut out, entry| {
        let marker = if entry.is_linked() { '+' } else { ' ' };
        let _ = writeln!(out, "{marker} {}", entry.path.display());
        out
    })
}

fn format_json(entries: &[TrackedEntry]) -> Result<String> {
    let rows: Vec<JsonEntry<'_>> = entries
        .iter()
        .map(|entry| JsonEntry {
            path: &entry.path,
            linked: entry.is_linked(),
            state: entry.state.as_str(),
        })
        .collect();
    let mut out = serde_json::to_string_pretty(&rows)?;
    out.push('\n');
    Ok(out)
}
