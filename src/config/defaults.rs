//! Default configuration values

/// Toolchain directory, relative to the project root
pub const TOOLCHAIN_DIR: &str = "third_party/rust-toolchain";

/// Sentinel file name inside the toolchain directory
pub const SENTINEL_FILE: &str = ".rusty_v8_version";

/// Dependency manifest file, relative to the project root
pub const DEPS_MANIFEST: &str = "toolchain-deps.toml";

/// Project-local config file name
pub const PROJECT_CONFIG_FILE: &str = "rust-toolchain-setup.toml";

/// System compiler queried for its sysroot
pub const COMPILER: &str = "rustc";

/// Installer used for the auxiliary tool
pub const INSTALLER: &str = "cargo";

/// Auxiliary tool linked next to the system toolchain binaries
pub const AUX_TOOL: &str = "bindgen";

/// Package that provides the auxiliary tool
pub const AUX_PACKAGE: &str = "bindgen-cli";

/// Maximum number of download retry attempts
pub const MAX_DOWNLOAD_RETRIES: u32 = 3;

/// Base delay for download retry backoff (milliseconds)
pub const RETRY_BASE_DELAY_MS: u64 = 1000;
