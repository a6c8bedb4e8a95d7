//! Toolchain status report
//!
//! Inspects the toolchain directory without changing it and reports what a
//! `provision` run would find: which strategy applies, what is on disk,
//! and whether the download sentinel is current.

use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::platform::PlatformId;
use crate::core::prebuilt;
use crate::core::settings::Settings;
use crate::core::strategy::Strategy;
use crate::error::ProvisionError;
use crate::infra::host_tools::HostTools;

/// What occupies the toolchain path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirState {
    /// Nothing there
    Missing,
    /// A real directory
    Directory,
    /// A symlink (possibly dangling)
    Symlink,
    /// A regular file
    File,
}

impl DirState {
    /// Inspect `path` without following symlinks
    pub fn of(path: &Path) -> Self {
        match std::fs::symlink_metadata(path) {
            Err(_) => Self::Missing,
            Ok(meta) if meta.file_type().is_symlink() => Self::Symlink,
            Ok(meta) if meta.is_dir() => Self::Directory,
            Ok(_) => Self::File,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::File => "file",
        }
    }
}

/// Status of the toolchain directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Normalized host platform (`os-cpu`)
    pub platform: String,
    /// Strategy `provision` would use
    pub strategy: Strategy,
    /// Absolute toolchain path
    pub toolchain_dir: PathBuf,
    /// What is at the toolchain path
    pub dir_state: DirState,
    /// Number of entries in `bin/`
    pub bin_entries: usize,
    /// Stored sentinel URL
    pub sentinel: Option<String>,
    /// URL the download strategy resolves to
    pub expected_url: Option<String>,
    /// Why the URL could not be resolved
    pub resolve_error: Option<String>,
    /// Whether the sentinel matches `expected_url`
    pub up_to_date: Option<bool>,
    /// System compiler version, for the link strategy
    pub compiler_version: Option<String>,
}

impl StatusReport {
    /// Whether `provision` would have nothing to do for the download strategy
    pub fn is_current(&self) -> bool {
        self.up_to_date == Some(true)
    }
}

/// Build a status report
pub fn collect<T: HostTools>(
    settings: &Settings,
    platform: &PlatformId,
    tools: &T,
) -> Result<StatusReport, ProvisionError> {
    let strategy = settings.strategy.resolve(platform);
    let toolchain_dir = settings.toolchain_path();
    let dir_state = DirState::of(&toolchain_dir);
    let bin_entries = count_entries(&toolchain_dir.join("bin"));
    let sentinel = prebuilt::installed_url(settings)?;

    let mut report = StatusReport {
        platform: platform.to_string(),
        strategy,
        toolchain_dir,
        dir_state,
        bin_entries,
        sentinel,
        expected_url: None,
        resolve_error: None,
        up_to_date: None,
        compiler_version: None,
    };

    match strategy {
        Strategy::DownloadPrebuilt => match prebuilt::resolve_archive(settings, platform) {
            Ok(resolved) => {
                report.up_to_date = Some(report.sentinel.as_deref() == Some(resolved.url.as_str()));
                report.expected_url = Some(resolved.url);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Could not resolve prebuilt archive");
                report.resolve_error = Some(e.to_string());
            }
        },
        Strategy::LinkSystem => {
            report.compiler_version = tools
                .version_output(&settings.compiler)
                .and_then(|output| parse_version(&output))
                .map(|v| v.to_string());
        }
    }

    Ok(report)
}

/// Count the immediate entries of a directory; symlinks count once
fn count_entries(dir: &Path) -> usize {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .count()
}

/// Extract a semantic version from `--version` output
pub fn parse_version(output: &str) -> Option<semver::Version> {
    let version_regex = regex::Regex::new(r"v?(\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?)").ok()?;
    let raw = version_regex.captures(output)?.get(1)?.as_str();
    semver::Version::parse(raw).ok()
}
