//! Run settings
//!
//! Settings are assembled from layers with priority:
//! CLI flags / environment > project config > global config > defaults.
//!
//! The project config lives at `<root>/rust-toolchain-setup.toml` (or the
//! path given with `--config`); the global config at
//! `<config dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::{defaults, urls};
use crate::core::strategy::StrategyChoice;
use crate::error::SettingsError;
use crate::infra::dirs::SetupDirs;

/// One layer of optional settings, as read from a config file or the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SettingsLayer {
    /// Toolchain directory, relative to the project root
    pub toolchain_dir: Option<PathBuf>,
    /// Sentinel file name inside the toolchain directory
    pub sentinel_file: Option<String>,
    /// Deps manifest path, relative to the project root
    pub deps_manifest: Option<PathBuf>,
    /// Storage endpoint base URL
    pub storage_url: Option<String>,
    /// Strategy preference
    pub strategy: Option<StrategyChoice>,
    /// System compiler command
    pub compiler: Option<String>,
    /// Installer command for the auxiliary tool
    pub installer: Option<String>,
    /// Auxiliary tool name
    pub aux_tool: Option<String>,
    /// Package providing the auxiliary tool
    pub aux_package: Option<String>,
    /// Download attempts
    pub max_retries: Option<u32>,
}

impl SettingsLayer {
    /// Load a layer from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load a layer if the file exists
    pub fn load_optional(path: &Path) -> Result<Option<Self>, SettingsError> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from_path(path).map(Some)
    }
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Project root all relative paths hang off
    pub root: PathBuf,
    /// Toolchain directory, relative to `root`
    pub toolchain_dir: PathBuf,
    /// Sentinel file name
    pub sentinel_file: String,
    /// Deps manifest, relative to `root`
    pub deps_manifest: PathBuf,
    /// Storage endpoint base URL
    pub storage_url: String,
    /// Strategy preference
    pub strategy: StrategyChoice,
    /// System compiler command
    pub compiler: String,
    /// Installer command
    pub installer: String,
    /// Auxiliary tool name
    pub aux_tool: String,
    /// Package providing the auxiliary tool
    pub aux_package: String,
    /// Download attempts
    pub max_retries: u32,
}

macro_rules! pick {
    ($layers:expr, $field:ident, $default:expr) => {
        $layers
            .iter()
            .find_map(|layer| layer.$field.clone())
            .unwrap_or_else(|| $default)
    };
}

impl Settings {
    /// Merge layers, highest priority first
    pub fn from_layers(root: &Path, layers: &[SettingsLayer]) -> Self {
        Self {
            root: root.to_path_buf(),
            toolchain_dir: pick!(layers, toolchain_dir, PathBuf::from(defaults::TOOLCHAIN_DIR)),
            sentinel_file: pick!(layers, sentinel_file, defaults::SENTINEL_FILE.to_string()),
            deps_manifest: pick!(layers, deps_manifest, PathBuf::from(defaults::DEPS_MANIFEST)),
            storage_url: pick!(layers, storage_url, urls::STORAGE_BASE.to_string()),
            strategy: pick!(layers, strategy, StrategyChoice::default()),
            compiler: pick!(layers, compiler, defaults::COMPILER.to_string()),
            installer: pick!(layers, installer, defaults::INSTALLER.to_string()),
            aux_tool: pick!(layers, aux_tool, defaults::AUX_TOOL.to_string()),
            aux_package: pick!(layers, aux_package, defaults::AUX_PACKAGE.to_string()),
            max_retries: pick!(layers, max_retries, defaults::MAX_DOWNLOAD_RETRIES),
        }
    }

    /// Resolve settings for a project root
    ///
    /// An explicit `config_path` must exist; the default project and global
    /// config files are optional.
    pub fn load(
        root: &Path,
        cli: SettingsLayer,
        config_path: Option<&Path>,
        dirs: &SetupDirs,
    ) -> Result<Self, SettingsError> {
        let project = match config_path {
            Some(path) => Some(SettingsLayer::load_from_path(path)?),
            None => SettingsLayer::load_optional(&root.join(defaults::PROJECT_CONFIG_FILE))?,
        };
        let global = SettingsLayer::load_optional(&dirs.global_config_path())?;

        let layers: Vec<SettingsLayer> = std::iter::once(cli)
            .chain(project)
            .chain(global)
            .collect();

        tracing::debug!(layers = layers.len(), root = %root.display(), "Resolved settings layers");
        Ok(Self::from_layers(root, &layers))
    }

    /// Absolute toolchain directory
    pub fn toolchain_path(&self) -> PathBuf {
        self.root.join(&self.toolchain_dir)
    }

    /// Absolute sentinel file path
    pub fn sentinel_path(&self) -> PathBuf {
        self.toolchain_path().join(&self.sentinel_file)
    }

    /// Absolute deps manifest path
    pub fn deps_manifest_path(&self) -> PathBuf {
        self.root.join(&self.deps_manifest)
    }

    /// Key under which the deps manifest lists this toolchain directory
    ///
    /// `./` prefixes and root components are dropped, so `./vendor/rust`
    /// and `vendor/rust` name the same entry.
    pub fn deps_key(&self) -> String {
        self.toolchain_dir
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                Component::ParentDir => Some("..".into()),
                Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_layers(Path::new("/project"), &[]);
        assert_eq!(settings.toolchain_dir, PathBuf::from("third_party/rust-toolchain"));
        assert_eq!(settings.sentinel_file, ".rusty_v8_version");
        assert_eq!(settings.storage_url, "https://storage.googleapis.com");
        assert_eq!(settings.strategy, StrategyChoice::Auto);
        assert_eq!(settings.compiler, "rustc");
        assert_eq!(settings.installer, "cargo");
        assert_eq!(settings.aux_tool, "bindgen");
        assert_eq!(settings.aux_package, "bindgen-cli");
        assert_eq!(settings.max_retries, 3);
        assert_eq!(
            settings.sentinel_path(),
            PathBuf::from("/project/third_party/rust-toolchain/.rusty_v8_version")
        );
        assert_eq!(settings.deps_key(), "third_party/rust-toolchain");
    }

    #[test]
    fn test_deps_key_ignores_current_dir_prefix() {
        let dotted = SettingsLayer {
            toolchain_dir: Some(PathBuf::from("./third_party/rust-toolchain")),
            ..Default::default()
        };
        let settings = Settings::from_layers(Path::new("/p"), &[dotted]);
        assert_eq!(settings.deps_key(), "third_party/rust-toolchain");
        assert_eq!(
            settings.toolchain_path(),
            PathBuf::from("/p/third_party/rust-toolchain")
        );

        let nested = SettingsLayer {
            toolchain_dir: Some(PathBuf::from("vendor/./rust/")),
            ..Default::default()
        };
        let settings = Settings::from_layers(Path::new("/p"), &[nested]);
        assert_eq!(settings.deps_key(), "vendor/rust");
    }

    #[cfg(unix)]
    #[test]
    fn test_deps_key_of_absolute_dir_has_no_leading_slash() {
        let absolute = SettingsLayer {
            toolchain_dir: Some(PathBuf::from("/opt/rust-toolchain")),
            ..Default::default()
        };
        let settings = Settings::from_layers(Path::new("/p"), &[absolute]);
        assert_eq!(settings.deps_key(), "opt/rust-toolchain");
    }

    #[test]
    fn test_layer_priority() {
        let cli = SettingsLayer {
            storage_url: Some("http://cli".to_string()),
            ..Default::default()
        };
        let project = SettingsLayer {
            storage_url: Some("http://project".to_string()),
            aux_tool: Some("cbindgen".to_string()),
            ..Default::default()
        };
        let global = SettingsLayer {
            aux_tool: Some("global-tool".to_string()),
            max_retries: Some(7),
            ..Default::default()
        };

        let settings = Settings::from_layers(Path::new("/p"), &[cli, project, global]);
        assert_eq!(settings.storage_url, "http://cli");
        assert_eq!(settings.aux_tool, "cbindgen");
        assert_eq!(settings.max_retries, 7);
        assert_eq!(settings.compiler, "rustc");
    }

    #[test]
    fn test_load_reads_project_and_global_files() {
        let project = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();

        std::fs::write(
            project.path().join("rust-toolchain-setup.toml"),
            "toolchain_dir = \"vendor/rust\"\nstrategy = \"download\"\n",
        )
        .unwrap();
        std::fs::write(
            config.path().join("config.toml"),
            "strategy = \"link-system\"\nmax_retries = 1\n",
        )
        .unwrap();

        let dirs = SetupDirs::with_config_dir(config.path().to_path_buf());
        let settings =
            Settings::load(project.path(), SettingsLayer::default(), None, &dirs).unwrap();

        assert_eq!(settings.toolchain_dir, PathBuf::from("vendor/rust"));
        assert_eq!(settings.strategy, StrategyChoice::Download);
        assert_eq!(settings.max_retries, 1);
        assert_eq!(settings.toolchain_path(), project.path().join("vendor/rust"));
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        let project = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();
        let dirs = SetupDirs::with_config_dir(config.path().to_path_buf());

        let settings =
            Settings::load(project.path(), SettingsLayer::default(), None, &dirs).unwrap();
        assert_eq!(settings, Settings::from_layers(project.path(), &[]));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let project = TempDir::new().unwrap();
        let dirs = SetupDirs::with_config_dir(project.path().join("cfg"));
        let missing = project.path().join("nope.toml");

        let err = Settings::load(project.path(), SettingsLayer::default(), Some(&missing), &dirs)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn test_invalid_config_is_parse_error() {
        let project = TempDir::new().unwrap();
        let path = project.path().join("rust-toolchain-setup.toml");
        std::fs::write(&path, "strategy = \"teleport\"\n").unwrap();

        let err = SettingsLayer::load_from_path(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }
}
