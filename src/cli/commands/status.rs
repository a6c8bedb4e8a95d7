//! CLI implementation for `rust-toolchain-setup status`
//!
//! Read-only: reports what `provision` would find without changing anything.

use anyhow::{Context, Result};

use crate::cli::commands::SelectionArgs;
use crate::cli::output::{
    is_json, print_detail, print_info, print_json, print_success, print_warning,
};
use crate::cli::RunContext;
use crate::core::status;
use crate::core::strategy::Strategy;
use crate::infra::host_tools::SystemHostTools;

/// Execute the status command
pub fn execute(ctx: &RunContext, selection: &SelectionArgs) -> Result<()> {
    let settings = ctx.settings(selection.layer())?;
    let platform = selection.platform();

    let report = status::collect(&settings, &platform, &SystemHostTools)
        .context("Failed to inspect toolchain directory")?;

    if is_json() {
        return print_json(&report);
    }

    print_info(&format!("Platform: {}", report.platform));
    print_detail(&format!("Strategy: {}", report.strategy));
    print_detail(&format!(
        "Directory: {} ({})",
        report.toolchain_dir.display(),
        report.dir_state.label()
    ));
    print_detail(&format!("bin/ entries: {}", report.bin_entries));

    match report.strategy {
        Strategy::LinkSystem => match &report.compiler_version {
            Some(version) => print_detail(&format!("System {}: {version}", settings.compiler)),
            None => print_warning(&format!("System {} not found", settings.compiler)),
        },
        Strategy::DownloadPrebuilt => {
            if let Some(sentinel) = &report.sentinel {
                print_detail(&format!("Installed: {sentinel}"));
            }
            if let Some(url) = &report.expected_url {
                print_detail(&format!("Expected:  {url}"));
            }
            if let Some(error) = &report.resolve_error {
                print_warning(error);
            } else if report.is_current() {
                print_success("Toolchain is up to date");
            } else {
                print_warning("Toolchain needs provisioning");
            }
        }
    }

    Ok(())
}
