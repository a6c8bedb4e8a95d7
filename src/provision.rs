//! Provisioning entry point
//!
//! Ties platform detection, strategy selection and the two strategies
//! together. Callers build [`Settings`] and a [`PlatformId`] up front and
//! pass them in; nothing here reads global state.

use serde::Serialize;
use std::path::PathBuf;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::core::link_system::{self, AuxToolLink};
use crate::core::platform::PlatformId;
use crate::core::prebuilt::{self, PrebuiltOptions, PrebuiltOutcome};
use crate::core::settings::Settings;
use crate::core::strategy::Strategy;
use crate::error::ProvisionError;
use crate::infra::download::{DownloadManager, ProgressCallback};
use crate::infra::host_tools::HostTools;

/// Options for a provisioning run
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvisionOptions {
    /// Ignore the download sentinel
    pub force: bool,
}

/// What a provisioning run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ProvisionOutcome {
    /// Toolchain directory rebuilt as links into the system toolchain
    Linked {
        sysroot: PathBuf,
        linked_binaries: Vec<String>,
        aux_tool: AuxToolLink,
    },
    /// Sentinel already matched the archive URL
    AlreadyProvisioned { url: String },
    /// Archive downloaded and extracted
    Downloaded {
        url: String,
        bytes: u64,
        sha256: String,
    },
}

/// Provisioner bound to one settings/platform pair
pub struct Provisioner<'a, T: HostTools> {
    settings: &'a Settings,
    platform: PlatformId,
    tools: &'a T,
    downloads: DownloadManager,
}

impl<'a, T: HostTools> Provisioner<'a, T> {
    /// Create a provisioner; retries come from the settings
    pub fn new(settings: &'a Settings, platform: PlatformId, tools: &'a T) -> Self {
        Self {
            settings,
            platform,
            tools,
            downloads: DownloadManager::with_config(
                settings.max_retries,
                crate::config::defaults::RETRY_BASE_DELAY_MS,
            ),
        }
    }

    /// Replace the download manager
    #[must_use]
    pub fn with_downloads(mut self, downloads: DownloadManager) -> Self {
        self.downloads = downloads;
        self
    }

    /// Strategy this run will use
    pub fn strategy(&self) -> Strategy {
        self.settings.strategy.resolve(&self.platform)
    }

    /// Host platform
    pub fn platform(&self) -> &PlatformId {
        &self.platform
    }

    /// Run the selected strategy
    pub async fn run(
        &self,
        options: ProvisionOptions,
        progress: Option<&ProgressCallback>,
    ) -> Result<ProvisionOutcome, ProvisionError> {
        let strategy = self.strategy();
        tracing::info!(platform = %self.platform, %strategy, "Provisioning toolchain");

        match strategy {
            Strategy::LinkSystem => {
                let linked = run_blocking(|| {
                    link_system::link_system_toolchain(self.tools, self.settings)
                })?;
                Ok(ProvisionOutcome::Linked {
                    sysroot: linked.sysroot,
                    linked_binaries: linked.binaries,
                    aux_tool: linked.aux_tool,
                })
            }
            Strategy::DownloadPrebuilt => {
                let outcome = prebuilt::download_prebuilt(
                    self.settings,
                    &self.platform,
                    &self.downloads,
                    PrebuiltOptions {
                        force: options.force,
                    },
                    progress,
                )
                .await?;

                Ok(match outcome {
                    PrebuiltOutcome::UpToDate { url } => {
                        ProvisionOutcome::AlreadyProvisioned { url }
                    }
                    PrebuiltOutcome::Downloaded {
                        url,
                        size,
                        checksum,
                    } => ProvisionOutcome::Downloaded {
                        url,
                        bytes: size,
                        sha256: checksum,
                    },
                })
            }
        }
    }
}

/// Run host process work (`rustc`, `cargo install`) off the async scheduler
///
/// On a multi-threaded runtime the current worker hands its other tasks
/// away first. A current-thread runtime has no other worker, so the work
/// simply runs inline there.
fn run_blocking<R>(work: impl FnOnce() -> R) -> R {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(work)
        }
        _ => work(),
    }
}

/// Provision in one call with default download settings
pub async fn run<T: HostTools>(
    settings: &Settings,
    platform: PlatformId,
    tools: &T,
    options: ProvisionOptions,
    progress: Option<&ProgressCallback>,
) -> Result<ProvisionOutcome, ProvisionError> {
    Provisioner::new(settings, platform, tools)
        .run(options, progress)
        .await
}
