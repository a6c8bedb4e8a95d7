//! Provisioning strategy selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::platform::{HostCpu, HostOs, PlatformId};
use crate::error::SettingsError;

/// How the toolchain directory gets populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Symlink an installed system toolchain
    LinkSystem,
    /// Download and unpack a prebuilt archive
    DownloadPrebuilt,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkSystem => f.write_str("link-system"),
            Self::DownloadPrebuilt => f.write_str("download"),
        }
    }
}

/// Configured strategy preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyChoice {
    /// Decide from the host platform
    #[default]
    Auto,
    /// Always link the system toolchain
    LinkSystem,
    /// Always download
    Download,
}

impl StrategyChoice {
    /// Resolve against the host platform
    ///
    /// `Auto` links the system toolchain only on Linux/arm64, where no
    /// prebuilt archive is published.
    pub fn resolve(self, platform: &PlatformId) -> Strategy {
        match self {
            Self::LinkSystem => Strategy::LinkSystem,
            Self::Download => Strategy::DownloadPrebuilt,
            Self::Auto => match (&platform.os, &platform.cpu) {
                (HostOs::Linux, HostCpu::Arm64) => Strategy::LinkSystem,
                _ => Strategy::DownloadPrebuilt,
            },
        }
    }
}

impl FromStr for StrategyChoice {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "link-system" | "system" | "link" => Ok(Self::LinkSystem),
            "download" | "prebuilt" => Ok(Self::Download),
            _ => Err(SettingsError::InvalidStrategy {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StrategyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::LinkSystem => f.write_str("link-system"),
            Self::Download => f.write_str("download"),
        }
    }
}
