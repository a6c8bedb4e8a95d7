//! Toolchain dependency manifest
//!
//! The deps manifest maps a directory path (such as
//! `third_party/rust-toolchain`) to a storage bucket and a list of archive
//! objects, each guarded by a [`Condition`]. It is authored elsewhere and
//! read here from TOML or JSON:
//!
//! ```toml
//! [deps."third_party/rust-toolchain"]
//! bucket = "chromium-browser-clang"
//!
//! [[deps."third_party/rust-toolchain".objects]]
//! object_name = "Mac/rust-toolchain-abc123.tar.xz"
//! condition = "host_os == 'mac' and host_cpu == 'x64'"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::condition::Condition;
use crate::core::platform::PlatformId;
use crate::error::DepsError;

/// Parsed deps manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DepsManifest {
    /// Descriptors keyed by directory path
    #[serde(default)]
    pub deps: BTreeMap<String, ToolchainDescriptor>,
}

/// Storage location and per-platform archives for one directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolchainDescriptor {
    /// Storage bucket name
    pub bucket: String,

    /// Candidate archives, tried in order
    #[serde(default)]
    pub objects: Vec<GcsObject>,
}

/// One archive in a bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GcsObject {
    /// Object path inside the bucket
    pub object_name: String,

    /// Platforms this object applies to (all when omitted)
    #[serde(default)]
    pub condition: Condition,

    /// Expected SHA256 of the archive
    #[serde(default)]
    pub sha256sum: Option<String>,

    /// Archive size in bytes
    #[serde(default)]
    pub size_bytes: Option<u64>,

    /// Storage generation number
    #[serde(default)]
    pub generation: Option<u64>,
}

/// Archive chosen for the host, with its download URL
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArchive {
    /// Full download URL
    pub url: String,
    /// Selected object
    pub object: GcsObject,
}

impl DepsManifest {
    /// Parse TOML content
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Parse JSON content
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load a manifest file; `.json` files are read as JSON, anything else as TOML
    pub fn load(path: &Path) -> Result<Self, DepsError> {
        let content = std::fs::read_to_string(path).map_err(|e| DepsError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json(&content).map_err(|e| e.to_string())
        } else {
            Self::from_toml(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|error| DepsError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Look up the descriptor for a directory path
    pub fn descriptor(&self, dir: &str) -> Result<&ToolchainDescriptor, DepsError> {
        self.deps.get(dir).ok_or_else(|| DepsError::MissingEntry {
            dir: dir.to_string(),
        })
    }

    /// Resolve the archive for `dir` on `platform`
    pub fn resolve(
        &self,
        dir: &str,
        platform: &PlatformId,
        storage_base: &str,
    ) -> Result<ResolvedArchive, DepsError> {
        let descriptor = self.descriptor(dir)?;
        let object =
            descriptor
                .select(platform)
                .ok_or_else(|| DepsError::UnsupportedPlatform {
                    dir: dir.to_string(),
                    platform: platform.to_string(),
                })?;

        Ok(ResolvedArchive {
            url: download_url(storage_base, &descriptor.bucket, &object.object_name),
            object: object.clone(),
        })
    }
}

impl ToolchainDescriptor {
    /// First object whose condition matches
    pub fn select(&self, platform: &PlatformId) -> Option<&GcsObject> {
        self.objects.iter().find(|obj| obj.condition.matches(platform))
    }
}

/// Canonical download URL for a bucket object
pub fn download_url(storage_base: &str, bucket: &str, object_name: &str) -> String {
    format!(
        "{}/{bucket}/{object_name}",
        storage_base.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::urls::STORAGE_BASE;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[deps."third_party/rust-toolchain"]
bucket = "chromium-browser-clang"

[[deps."third_party/rust-toolchain".objects]]
object_name = "Linux_x64/rust-toolchain.tar.xz"
condition = "host_os == 'linux' and host_cpu == 'x64'"
sha256sum = "abc"
size_bytes = 1024
generation = 17

[[deps."third_party/rust-toolchain".objects]]
object_name = "Mac/rust-toolchain.tar.xz"
condition = "host_os == 'mac' and host_cpu == 'x64'"

[[deps."third_party/rust-toolchain".objects]]
object_name = "Mac_arm64/rust-toolchain.tar.xz"
condition = "host_os == 'mac'"

[[deps."third_party/rust-toolchain".objects]]
object_name = "Win/rust-toolchain.tar.xz"
condition = "host_os == 'win'"
"#;

    fn manifest() -> DepsManifest {
        DepsManifest::from_toml(SAMPLE).unwrap()
    }

    #[test]
    fn test_parse_sample() {
        let manifest = manifest();
        let descriptor = manifest.descriptor("third_party/rust-toolchain").unwrap();
        assert_eq!(descriptor.bucket, "chromium-browser-clang");
        assert_eq!(descriptor.objects.len(), 4);
        assert_eq!(descriptor.objects[0].sha256sum.as_deref(), Some("abc"));
        assert_eq!(descriptor.objects[0].size_bytes, Some(1024));
        assert_eq!(descriptor.objects[0].generation, Some(17));
    }

    #[test]
    fn test_first_match_wins() {
        let manifest = manifest();
        let descriptor = manifest.descriptor("third_party/rust-toolchain").unwrap();

        // mac/x64 matches both the second and third object
        let mac_x64 = PlatformId::normalize("darwin", "x86_64");
        assert_eq!(
            descriptor.select(&mac_x64).unwrap().object_name,
            "Mac/rust-toolchain.tar.xz"
        );

        let mac_arm = PlatformId::normalize("darwin", "aarch64");
        assert_eq!(
            descriptor.select(&mac_arm).unwrap().object_name,
            "Mac_arm64/rust-toolchain.tar.xz"
        );
    }

    #[test]
    fn test_resolve_builds_storage_url() {
        let resolved = manifest()
            .resolve(
                "third_party/rust-toolchain",
                &PlatformId::normalize("windows", "x86_64"),
                STORAGE_BASE,
            )
            .unwrap();
        assert_eq!(
            resolved.url,
            "https://storage.googleapis.com/chromium-browser-clang/Win/rust-toolchain.tar.xz"
        );
    }

    #[test]
    fn test_unsupported_platform_is_an_error() {
        let err = manifest()
            .resolve(
                "third_party/rust-toolchain",
                &PlatformId::normalize("freebsd", "riscv64"),
                STORAGE_BASE,
            )
            .unwrap_err();
        match err {
            DepsError::UnsupportedPlatform { dir, platform } => {
                assert_eq!(dir, "third_party/rust-toolchain");
                assert_eq!(platform, "freebsd-riscv64");
            }
            e => panic!("Expected UnsupportedPlatform, got: {e:?}"),
        }
    }

    #[test]
    fn test_missing_entry_is_an_error() {
        let err = manifest()
            .resolve("third_party/llvm", &PlatformId::normalize("linux", "x86_64"), STORAGE_BASE)
            .unwrap_err();
        assert!(matches!(err, DepsError::MissingEntry { .. }));
    }

    #[test]
    fn test_missing_condition_matches_everything() {
        let manifest = DepsManifest::from_toml(
            r#"
[deps.tc]
bucket = "b"
objects = [{ object_name = "any.tar.xz" }]
"#,
        )
        .unwrap();
        let resolved = manifest
            .resolve("tc", &PlatformId::normalize("plan9", "mips"), "http://localhost/")
            .unwrap();
        assert_eq!(resolved.url, "http://localhost/b/any.tar.xz");
    }

    #[test]
    fn test_invalid_condition_fails_to_parse() {
        let result = DepsManifest::from_toml(
            r#"
[deps.tc]
bucket = "b"
objects = [{ object_name = "x", condition = "host_os === 'mac'" }]
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_json_and_toml_files() {
        let temp = TempDir::new().unwrap();

        let json_path = temp.path().join("deps.json");
        std::fs::write(
            &json_path,
            r#"{"deps": {"tc": {"bucket": "b", "objects": [
                {"object_name": "o.tar.xz", "condition": "host_os=='mac' and host_cpu=='x64'"}
            ]}}}"#,
        )
        .unwrap();
        let from_json = DepsManifest::load(&json_path).unwrap();
        assert_eq!(from_json.descriptor("tc").unwrap().bucket, "b");

        let toml_path = temp.path().join("deps.toml");
        std::fs::write(&toml_path, SAMPLE).unwrap();
        assert_eq!(DepsManifest::load(&toml_path).unwrap(), manifest());
    }

    #[test]
    fn test_load_missing_file() {
        let err = DepsManifest::load(Path::new("/nonexistent/deps.toml")).unwrap_err();
        assert!(matches!(err, DepsError::Read { .. }));
    }

    #[test]
    fn test_download_url_trims_trailing_slash() {
        assert_eq!(
            download_url("https://storage.googleapis.com/", "b", "o.tar.xz"),
            "https://storage.googleapis.com/b/o.tar.xz"
        );
    }
}
