//! Download sentinel
//!
//! A file inside the toolchain directory holding the URL of the last
//! archive that was fully extracted there. It is a cheap validity marker,
//! not a content hash: changes made to the directory by other means go
//! unnoticed.

use std::path::{Path, PathBuf};

use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Sentinel file at a fixed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel {
    path: PathBuf,
}

impl Sentinel {
    /// Sentinel stored at `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the sentinel file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored URL, if the sentinel exists
    pub fn read(&self) -> Result<Option<String>, FilesystemError> {
        filesystem::read_file_optional(&self.path)
    }

    /// Whether the stored URL is exactly `url`
    pub fn is_current(&self, url: &str) -> Result<bool, FilesystemError> {
        Ok(self.read()?.as_deref() == Some(url))
    }

    /// Record `url`, replacing any previous value
    pub fn write(&self, url: &str) -> Result<(), FilesystemError> {
        filesystem::write_file(&self.path, url)
    }
}
