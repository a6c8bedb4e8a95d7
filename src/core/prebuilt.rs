//! Prebuilt toolchain download
//!
//! Resolves the archive for the host from the deps manifest, downloads it to
//! an anonymous temporary file, verifies it when a checksum is published and
//! extracts it into the toolchain directory. The sentinel is written only
//! after a successful extraction, so an interrupted run is retried in full
//! next time.

use serde::Serialize;
use std::io::{Seek, SeekFrom};
use tokio::fs::File;

use crate::core::deps::{DepsManifest, ResolvedArchive};
use crate::core::platform::PlatformId;
use crate::core::settings::Settings;
use crate::error::{DownloadError, FilesystemError, ProvisionError};
use crate::infra::archive;
use crate::infra::download::{DownloadManager, ProgressCallback};
use crate::infra::filesystem;
use crate::infra::sentinel::Sentinel;

/// Options for a prebuilt download
#[derive(Debug, Clone, Copy, Default)]
pub struct PrebuiltOptions {
    /// Download even when the sentinel matches
    pub force: bool,
}

/// Result of the prebuilt download path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum PrebuiltOutcome {
    /// The sentinel already named this URL
    UpToDate {
        /// Archive URL
        url: String,
    },
    /// Archive downloaded and extracted
    Downloaded {
        /// Archive URL
        url: String,
        /// Archive size in bytes
        size: u64,
        /// SHA256 of the archive
        checksum: String,
    },
}

/// Resolve the archive for `platform` without touching the network
pub fn resolve_archive(
    settings: &Settings,
    platform: &PlatformId,
) -> Result<ResolvedArchive, ProvisionError> {
    let manifest_path = settings.deps_manifest_path();
    tracing::debug!(manifest = %manifest_path.display(), "Loading deps manifest");

    let manifest = DepsManifest::load(&manifest_path)?;
    Ok(manifest.resolve(&settings.deps_key(), platform, &settings.storage_url)?)
}

/// Download and extract the prebuilt toolchain unless it is already current
pub async fn download_prebuilt(
    settings: &Settings,
    platform: &PlatformId,
    downloads: &DownloadManager,
    options: PrebuiltOptions,
    progress: Option<&ProgressCallback>,
) -> Result<PrebuiltOutcome, ProvisionError> {
    let resolved = resolve_archive(settings, platform)?;
    let url = resolved.url;
    let sentinel = Sentinel::new(settings.sentinel_path());

    if !options.force && sentinel.is_current(&url)? {
        tracing::info!(url = %url, "Prebuilt toolchain already up to date");
        return Ok(PrebuiltOutcome::UpToDate { url });
    }

    tracing::info!(url = %url, platform = %platform, "Downloading prebuilt toolchain");

    let temp = tempfile::tempfile().map_err(|e| DownloadError::SinkError {
        url: url.clone(),
        error: e.to_string(),
    })?;
    let mut sink = File::from_std(temp);

    let result = downloads.download_to(&url, &mut sink, progress).await?;
    if let Some(expected) = resolved.object.sha256sum.as_deref() {
        result.verify(&url, expected)?;
        tracing::debug!(checksum = %result.checksum, "Checksum verified");
    }

    let mut file = sink.into_std().await;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| DownloadError::SinkError {
            url: url.clone(),
            error: e.to_string(),
        })?;

    let dest = settings.toolchain_path();
    filesystem::create_dir_all(&dest)?;

    tracing::info!(dest = %dest.display(), size = result.size, "Extracting toolchain");
    archive::extract_tar_xz_file(file, dest).await?;

    sentinel.write(&url)?;
    tracing::info!(sentinel = %sentinel.path().display(), "Recorded toolchain version");

    Ok(PrebuiltOutcome::Downloaded {
        url,
        size: result.size,
        checksum: result.checksum,
    })
}

/// Stored sentinel URL, if any
pub fn installed_url(settings: &Settings) -> Result<Option<String>, FilesystemError> {
    Sentinel::new(settings.sentinel_path()).read()
}
