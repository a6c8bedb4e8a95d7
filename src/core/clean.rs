//! Clean logic
//!
//! Removes the toolchain entry (directory, file or symlink) together with
//! the sentinel inside it, so the next `provision` starts over.

use serde::Serialize;
use std::path::PathBuf;

use crate::core::settings::Settings;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Result of a clean
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanResult {
    /// Toolchain path that was inspected
    pub path: PathBuf,
    /// Whether anything was removed
    pub removed: bool,
}

/// Remove the toolchain entry if present
pub fn clean_toolchain(settings: &Settings) -> Result<CleanResult, FilesystemError> {
    let path = settings.toolchain_path();
    let removed = filesystem::remove_entry(&path)?;

    if removed {
        tracing::info!(path = %path.display(), "Removed toolchain directory");
    }

    Ok(CleanResult { path, removed })
}
