//! CLI implementation for `rust-toolchain-setup clean`

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::output::{is_json, print_json, print_success};
use crate::cli::RunContext;
use crate::core::clean::clean_toolchain;
use crate::core::settings::SettingsLayer;

/// Execute the clean command
pub fn execute(ctx: &RunContext, dir: Option<PathBuf>) -> Result<()> {
    let settings = ctx.settings(SettingsLayer {
        toolchain_dir: dir,
        ..Default::default()
    })?;

    let result = clean_toolchain(&settings).context("Failed to clean toolchain directory")?;

    if is_json() {
        return print_json(&result);
    }

    if result.removed {
        print_success(&format!("Removed {}", result.path.display()));
    } else {
        print_success("Nothing to clean");
    }

    Ok(())
}
