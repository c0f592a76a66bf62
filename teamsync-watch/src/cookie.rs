//! Flat-file version cookie: the single line of durable state a check keeps.

use std::path::Path;

use crate::error::{io_err, WatchError};

/// Last recorded version, or `None` on the first ever run.
pub fn read_last(path: &Path) -> Result<Option<String>, WatchError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

/// Record `version`, creating parent directories on first use.
pub fn write_last(path: &Path, version: &str) -> Result<(), WatchError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(path, format!("{version}\n")).map_err(|e| io_err(path, e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
