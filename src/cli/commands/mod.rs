//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod clean;
pub mod provision;
pub mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::RunContext;
use crate::core::platform::PlatformId;
use crate::core::settings::SettingsLayer;
use crate::core::strategy::StrategyChoice;

/// Flags that decide where and how the toolchain is provisioned
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Toolchain directory, relative to the project root
    #[arg(long, env = "RUST_TOOLCHAIN_SETUP_DIR")]
    pub dir: Option<PathBuf>,

    /// Deps manifest (TOML or JSON), relative to the project root
    #[arg(long, env = "RUST_TOOLCHAIN_SETUP_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Storage endpoint base URL
    #[arg(long, env = "RUST_TOOLCHAIN_SETUP_STORAGE_URL")]
    pub storage_url: Option<String>,

    /// Provisioning strategy (auto, link-system, download)
    #[arg(long, env = "RUST_TOOLCHAIN_SETUP_STRATEGY")]
    pub strategy: Option<StrategyChoice>,

    /// Override the detected host OS (e.g. linux, darwin, windows)
    #[arg(long, env = "RUST_TOOLCHAIN_SETUP_HOST_OS")]
    pub host_os: Option<String>,

    /// Override the detected host CPU (e.g. x86_64, aarch64)
    #[arg(long, env = "RUST_TOOLCHAIN_SETUP_HOST_CPU")]
    pub host_cpu: Option<String>,
}

impl SelectionArgs {
    /// Settings layer from these flags
    pub fn layer(&self) -> SettingsLayer {
        SettingsLayer {
            toolchain_dir: self.dir.clone(),
            deps_manifest: self.manifest.clone(),
            storage_url: self.storage_url.clone(),
            strategy: self.strategy,
            ..Default::default()
        }
    }

    /// Host platform with any overrides applied
    pub fn platform(&self) -> PlatformId {
        PlatformId::detect_with_overrides(self.host_os.as_deref(), self.host_cpu.as_deref())
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the toolchain directory (default)
    Provision {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Download even if the sentinel matches
        #[arg(short, long)]
        force: bool,
    },

    /// Show the state of the toolchain directory
    Status {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Remove the toolchain directory
    Clean {
        /// Toolchain directory, relative to the project root
        #[arg(long, env = "RUST_TOOLCHAIN_SETUP_DIR")]
        dir: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self, ctx: &RunContext) -> Result<()> {
        match self {
            Self::Provision { selection, force } => {
                provision::execute(ctx, &selection, force).await
            }
            Self::Status { selection } => status::execute(ctx, &selection),
            Self::Clean { dir } => clean::execute(ctx, dir),
        }
    }
}
