//! Error types for rust-toolchain-setup
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from external host tools
#[derive(Error, Debug)]
pub enum HostToolError {
    /// Tool is missing and could not be provided
    #[error("Could not find {tool}: {error}")]
    ToolNotFound { tool: String, error: String },

    /// Installer ran but did not succeed
    #[error("Failed to install '{package}' via {installer}: {error}")]
    InstallFailed {
        installer: String,
        package: String,
        error: String,
    },
}

/// Condition expression parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    /// Token not valid at this point
    #[error("Unexpected '{token}' at offset {offset} in condition '{expr}'")]
    UnexpectedToken {
        expr: String,
        token: String,
        offset: usize,
    },

    /// Expression ended too early
    #[error("Unexpected end of condition '{expr}'")]
    UnexpectedEnd { expr: String },

    /// Only `host_os` and `host_cpu` are bound
    #[error("Unknown variable '{name}' in condition '{expr}'")]
    UnknownVariable { expr: String, name: String },

    /// String literal without closing quote
    #[error("Unterminated string at offset {offset} in condition '{expr}'")]
    UnterminatedString { expr: String, offset: usize },
}

/// Dependency manifest errors
#[derive(Error, Debug)]
pub enum DepsError {
    /// Failed to read the manifest file
    #[error("Failed to read deps manifest '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Failed to parse the manifest file
    #[error("Failed to parse deps manifest '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// No descriptor for the toolchain directory
    #[error("No entry for '{dir}' in deps manifest")]
    MissingEntry { dir: String },

    /// No object condition matches the host platform
    #[error("No prebuilt toolchain for '{dir}' matches platform {platform}")]
    UnsupportedPlatform { dir: String, platform: String },
}

/// Download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Network error
    #[error("Network error downloading '{url}': {error}")]
    NetworkError { url: String, error: String },

    /// Checksum verification failed
    #[error("Checksum verification failed for '{url}': expected {expected}, got {actual}")]
    ChecksumFailed {
        url: String,
        expected: String,
        actual: String,
    },

    /// Writing to or rewinding the download sink failed
    #[error("IO error while downloading '{url}': {error}")]
    SinkError { url: String, error: String },

    /// Max retries exceeded
    #[error("Download failed after {retries} retries: {url}")]
    MaxRetriesExceeded { url: String, retries: u32 },
}

/// Archive extraction errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Decompression or unpacking failed
    #[error("Failed to extract archive into '{dest}': {error}")]
    Extract { dest: PathBuf, error: String },

    /// Extraction task panicked or was cancelled
    #[error("Extraction task failed: {error}")]
    Join { error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove a file, directory or symlink
    #[error("Failed to remove '{path}': {error}")]
    RemoveEntry { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to list a directory
    #[error("Failed to read directory '{path}': {error}")]
    ReadDir { path: PathBuf, error: String },

    /// Failed to create symlink
    #[error("Failed to symlink '{link}' -> '{target}': {error}")]
    Symlink {
        link: PathBuf,
        target: PathBuf,
        error: String,
    },
}

/// Settings and config file errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// Unknown strategy name
    #[error("Invalid strategy '{value}'. Expected one of: auto, link-system, download")]
    InvalidStrategy { value: String },
}

/// Top-level error type
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Host tool error
    #[error(transparent)]
    HostTool(#[from] HostToolError),

    /// Deps manifest error
    #[error(transparent)]
    Deps(#[from] DepsError),

    /// Download error
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Archive error
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),
}
