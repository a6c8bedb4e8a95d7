//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use rust_toolchain_setup::error::HostToolError;
use rust_toolchain_setup::infra::host_tools::HostTools;
use tempfile::TempDir;

/// Test project context
///
/// A temporary project root plus an isolated global config directory.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Global config directory, kept out of the user's real one
    pub config_dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            config_dir: TempDir::new().expect("Failed to create config directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Write a deps manifest with one descriptor for the default toolchain dir
    pub fn write_manifest(&self, bucket: &str, objects: &[(&str, &str)]) {
        self.create_file(DEPS_MANIFEST, &manifest_toml(bucket, objects));
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Default deps manifest file name
pub const DEPS_MANIFEST: &str = "toolchain-deps.toml";

/// Default toolchain directory
pub const TOOLCHAIN_DIR: &str = "third_party/rust-toolchain";

/// Default sentinel path, relative to the project root
pub const SENTINEL: &str = "third_party/rust-toolchain/.rusty_v8_version";

/// Deps manifest TOML for the default toolchain dir
///
/// Each object is `(object_name, condition)`.
pub fn manifest_toml(bucket: &str, objects: &[(&str, &str)]) -> String {
    let mut toml = format!("[deps.\"{TOOLCHAIN_DIR}\"]\nbucket = \"{bucket}\"\n");
    for (name, condition) in objects {
        toml.push_str(&format!(
            "\n[[deps.\"{TOOLCHAIN_DIR}\".objects]]\nobject_name = \"{name}\"\ncondition = \"{condition}\"\n"
        ));
    }
    toml
}

/// Build an in-memory `.tar.xz` with the given (path, content) files
pub fn tar_xz(files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    let mut builder = tar::Builder::new(encoder);

    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, path, *content)
            .expect("Failed to append archive entry");
    }

    let mut encoder = builder.into_inner().expect("Failed to finish tar");
    encoder.flush().expect("Failed to flush xz");
    encoder.finish().expect("Failed to finish xz")
}

/// Run the binary in `project` with an isolated global config
pub fn run_cli(project: &TestProject, args: &[&str]) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rust-toolchain-setup"));
    cmd.current_dir(project.path());
    cmd.env("RUST_TOOLCHAIN_SETUP_CONFIG_DIR", project.config_dir.path());
    cmd.env_remove("RUST_LOG");
    for arg in args {
        cmd.arg(arg);
    }
    cmd.output().expect("Failed to execute rust-toolchain-setup")
}

/// Create a fake sysroot with `bin/{rustc,cargo}` and `lib/`
pub fn fake_sysroot(root: &Path) -> PathBuf {
    let sysroot = root.join("sysroot");
    std::fs::create_dir_all(sysroot.join("bin")).expect("Failed to create sysroot bin");
    std::fs::create_dir_all(sysroot.join("lib/rustlib")).expect("Failed to create sysroot lib");
    std::fs::write(sysroot.join("bin/rustc"), "").expect("Failed to write rustc");
    std::fs::write(sysroot.join("bin/cargo"), "").expect("Failed to write cargo");
    sysroot
}

/// Host tools with a fixed sysroot and `PATH`, recording every call
pub struct FakeHostTools {
    pub sysroot: Option<PathBuf>,
    pub on_path: Mutex<Option<PathBuf>>,
    pub after_install: Option<PathBuf>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeHostTools {
    pub fn new(sysroot: Option<PathBuf>, on_path: Option<PathBuf>) -> Self {
        Self {
            sysroot,
            on_path: Mutex::new(on_path),
            after_install: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl HostTools for FakeHostTools {
    fn sysroot(&self, compiler: &str) -> Result<PathBuf, HostToolError> {
        self.record(format!("sysroot {compiler}"));
        self.sysroot.clone().ok_or_else(|| HostToolError::ToolNotFound {
            tool: format!("system {compiler}"),
            error: "not installed".to_string(),
        })
    }

    fn find_on_path(&self, tool: &str) -> Option<PathBuf> {
        self.record(format!("which {tool}"));
        self.on_path.lock().unwrap().clone()
    }

    fn install(&self, installer: &str, package: &str) -> Result<(), HostToolError> {
        self.record(format!("{installer} install {package}"));
        *self.on_path.lock().unwrap() = self.after_install.clone();
        Ok(())
    }

    fn version_output(&self, tool: &str) -> Option<String> {
        self.record(format!("{tool} --version"));
        None
    }
}
