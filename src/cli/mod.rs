//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no provisioning logic - that belongs in [`crate::core`] and
//! [`crate::provision`].

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{CommandFactory, FromArgMatches, Parser};

use crate::core::settings::{Settings, SettingsLayer};
use crate::infra::dirs::SetupDirs;
use commands::{Commands, SelectionArgs};

/// Version string with the build metadata emitted by `build.rs`
pub fn long_version() -> String {
    let field = |value: Option<&'static str>| value.unwrap_or("unknown");
    format!(
        "{}\ncommit: {}\nbuilt: {}\ntarget: {}",
        env!("CARGO_PKG_VERSION"),
        field(option_env!("VERGEN_GIT_SHA")),
        field(option_env!("VERGEN_BUILD_TIMESTAMP")),
        field(option_env!("VERGEN_CARGO_TARGET_TRIPLE")),
    )
}

/// Provision a local Rust toolchain directory
///
/// Links the system toolchain on Linux/arm64 and downloads a prebuilt
/// archive everywhere else.
#[derive(Parser, Debug)]
#[command(name = "rust-toolchain-setup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Project root that relative paths are resolved against
    #[arg(long, global = true, env = "RUST_TOOLCHAIN_SETUP_ROOT")]
    pub root: Option<PathBuf>,

    /// Project config file (default: <root>/rust-toolchain-setup.toml)
    #[arg(long, global = true, env = "RUST_TOOLCHAIN_SETUP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where a command runs and how it finds its settings
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Project root
    pub root: PathBuf,
    /// Explicit project config file
    pub config: Option<PathBuf>,
    /// Global directories
    pub dirs: SetupDirs,
}

impl RunContext {
    /// Resolve settings with `cli` as the highest-priority layer
    pub fn settings(&self, cli: SettingsLayer) -> Result<Settings> {
        Settings::load(&self.root, cli, self.config.as_deref(), &self.dirs)
            .context("Failed to load settings")
    }
}

impl Cli {
    /// Parse the process arguments, with build metadata in `--version`
    pub fn parse_with_metadata() -> Self {
        let long_version: &'static str = Box::leak(long_version().into_boxed_str());
        let matches = Self::command().long_version(long_version).get_matches();
        match Self::from_arg_matches(&matches) {
            Ok(cli) => cli,
            Err(e) => e.exit(),
        }
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        let ctx = RunContext {
            root,
            config: self.config,
            dirs: SetupDirs::new(),
        };

        // No subcommand: provision with defaults
        let command = self.command.unwrap_or(Commands::Provision {
            selection: SelectionArgs::default(),
            force: false,
        });

        command.run(&ctx).await
    }
}
