//! Conflict report rendering and the append-only conflict log.
//!
//! The log is durable operator evidence: every run that found conflicts
//! appends a timestamped block, never rewriting earlier entries.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};

use teamsync_core::types::Conflict;

use crate::error::{io_err, PipelineError};

/// Human-readable block: one line per conflicting short name, each
/// contributing full path indented underneath.
pub fn render_conflicts(conflicts: &[Conflict]) -> String {
    let mut out = String::new();
    for conflict in conflicts {
        out.push_str(&format!(
            "short name '{}' claimed by {} teams:\n",
            conflict.short_name,
            conflict.full_paths.len()
        ));
        for path in &conflict.full_paths {
            out.push_str(&format!("  - {path}\n"));
        }
    }
    out
}

/// Append a timestamped conflict block to the durable log at `path`.
///
/// Creates parent directories on first use. A run without conflicts writes
/// nothing.
pub fn append_conflict_log(
    path: &Path,
    conflicts: &[Conflict],
    now: DateTime<Utc>,
) -> Result<(), PipelineError> {
    if conflicts.is_empty() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| io_err(path, e))?;
    let block = format!("[{}]\n{}", now.to_rfc3339(), render_conflicts(conflicts));
    file.write_all(block.as_bytes()).map_err(|e| io_err(path, e))?;

    tracing::warn!(
        "{} name conflict(s) recorded in {}",
        conflicts.len(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
