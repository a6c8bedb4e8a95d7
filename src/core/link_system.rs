//! System toolchain linking
//!
//! Builds the toolchain directory out of symlinks into an installed system
//! toolchain. The directory is always rebuilt from scratch:
//!
//! 1. remove whatever is at the toolchain path
//! 2. create it with a `bin/` subdirectory
//! 3. link `lib` to `<sysroot>/lib` when that exists
//! 4. link every entry of `<sysroot>/bin` into `bin/`
//! 5. make sure the auxiliary tool (bindgen) is linked into `bin/`,
//!    installing it if it cannot be found on `PATH`

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::settings::Settings;
use crate::error::{HostToolError, ProvisionError};
use crate::infra::filesystem;
use crate::infra::host_tools::HostTools;

/// How the auxiliary tool ended up in `bin/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum AuxToolLink {
    /// An entry with that name was already present
    AlreadyLinked,
    /// Linked from a `PATH` location
    Linked {
        /// Where the tool was found
        source: PathBuf,
        /// Whether the installer had to run first
        installed: bool,
    },
}

/// Result of linking the system toolchain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOutcome {
    /// Sysroot reported by the system compiler
    pub sysroot: PathBuf,
    /// Whether `lib` was linked
    pub lib_linked: bool,
    /// Names linked from `<sysroot>/bin`
    pub binaries: Vec<String>,
    /// Auxiliary tool state
    pub aux_tool: AuxToolLink,
}

/// Rebuild the toolchain directory as links into the system toolchain
pub fn link_system_toolchain<T: HostTools>(
    tools: &T,
    settings: &Settings,
) -> Result<LinkOutcome, ProvisionError> {
    let toolchain_dir = settings.toolchain_path();
    tracing::info!(dir = %toolchain_dir.display(), "Using system Rust toolchain");

    let sysroot = tools.sysroot(&settings.compiler)?;
    tracing::info!(sysroot = %sysroot.display(), "System Rust sysroot");

    if filesystem::remove_entry(&toolchain_dir)? {
        tracing::debug!(dir = %toolchain_dir.display(), "Removed previous toolchain directory");
    }

    let bin_dir = toolchain_dir.join("bin");
    filesystem::create_dir_all(&bin_dir)?;

    let sysroot_lib = sysroot.join("lib");
    let lib_linked = sysroot_lib.exists();
    if lib_linked {
        filesystem::symlink(&sysroot_lib, &toolchain_dir.join("lib"))?;
        tracing::info!(to = %sysroot_lib.display(), "Symlinked lib");
    }

    let sysroot_bin = sysroot.join("bin");
    let mut binaries = Vec::new();
    if sysroot_bin.is_dir() {
        for name in filesystem::list_dir(&sysroot_bin)? {
            filesystem::symlink(&sysroot_bin.join(&name), &bin_dir.join(&name))?;
            binaries.push(name.to_string_lossy().into_owned());
        }
        tracing::info!(count = binaries.len(), from = %sysroot_bin.display(), "Symlinked binaries");
    }

    let aux_tool = ensure_aux_tool(tools, &bin_dir, settings)?;

    Ok(LinkOutcome {
        sysroot,
        lib_linked,
        binaries,
        aux_tool,
    })
}

/// Make sure the auxiliary tool is present in `bin_dir`
///
/// An existing entry short-circuits: no `PATH` lookup and no install.
pub fn ensure_aux_tool<T: HostTools>(
    tools: &T,
    bin_dir: &Path,
    settings: &Settings,
) -> Result<AuxToolLink, ProvisionError> {
    let tool = settings.aux_tool.as_str();
    let dest = bin_dir.join(tool);

    if filesystem::entry_exists(&dest) {
        tracing::info!(tool, "Auxiliary tool already linked");
        return Ok(AuxToolLink::AlreadyLinked);
    }

    let mut installed = false;
    let source = match tools.find_on_path(tool) {
        Some(path) => path,
        None => {
            tracing::info!(
                tool,
                package = %settings.aux_package,
                "Auxiliary tool not found, installing"
            );
            tools.install(&settings.installer, &settings.aux_package)?;
            installed = true;
            tools
                .find_on_path(tool)
                .ok_or_else(|| HostToolError::ToolNotFound {
                    tool: tool.to_string(),
                    error: format!(
                        "not on PATH after '{} install {}'",
                        settings.installer, settings.aux_package
                    ),
                })?
        }
    };

    tracing::info!(tool, source = %source.display(), "Found auxiliary tool");
    filesystem::symlink(&source, &dest)?;

    Ok(AuxToolLink::Linked { source, installed })
}
