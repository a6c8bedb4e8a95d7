//! Platform-specific directory management
//!
//! Locates the per-user config directory that holds the global
//! `config.toml`. Follows XDG on Linux and standard locations on macOS.
//!
//! The `RUST_TOOLCHAIN_SETUP_CONFIG_DIR` environment variable overrides the
//! default location.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "RUST_TOOLCHAIN_SETUP_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "rust-toolchain-setup";

/// Global config file name
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Platform-specific directory provider
#[derive(Debug, Clone)]
pub struct SetupDirs {
    config_dir: PathBuf,
}

impl SetupDirs {
    /// Resolve directories from the environment, then platform defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Use an explicit config directory
    #[must_use]
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/rust-toolchain-setup` or `~/.config/rust-toolchain-setup`
    /// - macOS: `~/Library/Application Support/rust-toolchain-setup`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Path to the global `config.toml`
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join(GLOBAL_CONFIG_FILE)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        Self::platform_config_dir()
    }

    fn platform_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for SetupDirs {
    fn default() -> Self {
        Self::new()
    }
}
