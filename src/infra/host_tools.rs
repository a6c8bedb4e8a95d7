//! Host tool invocation
//!
//! Wraps the external programs the link strategy depends on. The system
//! compiler reports its sysroot; a missing auxiliary tool is installed with
//! the package installer.

use std::path::PathBuf;
use std::process::Command;

use crate::error::HostToolError;

/// External tools available on the host
pub trait HostTools {
    /// Installation root reported by the system compiler
    fn sysroot(&self, compiler: &str) -> Result<PathBuf, HostToolError>;

    /// Locate an executable on `PATH`
    fn find_on_path(&self, tool: &str) -> Option<PathBuf>;

    /// Install a package with the given installer (`<installer> install <package>`)
    fn install(&self, installer: &str, package: &str) -> Result<(), HostToolError>;

    /// Raw `--version` output of a tool, if it runs
    fn version_output(&self, tool: &str) -> Option<String>;
}

/// Real host tools, run as child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHostTools;

impl HostTools for SystemHostTools {
    fn sysroot(&self, compiler: &str) -> Result<PathBuf, HostToolError> {
        let not_found = |error: String| HostToolError::ToolNotFound {
            tool: format!("system {compiler}"),
            error,
        };

        let output = Command::new(compiler)
            .args(["--print", "sysroot"])
            .output()
            .map_err(|e| not_found(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(not_found(format!(
                "'{compiler} --print sysroot' exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let sysroot = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if sysroot.is_empty() {
            return Err(not_found(format!(
                "'{compiler} --print sysroot' printed nothing"
            )));
        }

        tracing::debug!(compiler, sysroot = %sysroot, "Queried system sysroot");
        Ok(PathBuf::from(sysroot))
    }

    fn find_on_path(&self, tool: &str) -> Option<PathBuf> {
        which::which(tool).ok()
    }

    fn install(&self, installer: &str, package: &str) -> Result<(), HostToolError> {
        tracing::info!(installer, package, "Installing auxiliary tool");

        let status = Command::new(installer)
            .args(["install", package])
            .status()
            .map_err(|e| HostToolError::InstallFailed {
                installer: installer.to_string(),
                package: package.to_string(),
                error: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(HostToolError::InstallFailed {
                installer: installer.to_string(),
                package: package.to_string(),
                error: format!("exited with {status}"),
            })
        }
    }

    fn version_output(&self, tool: &str) -> Option<String> {
        Command::new(tool)
            .arg("--version")
            .output()
            .ok()
            .filter(|output| output.status.success())
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
