//! CLI implementation for `rust-toolchain-setup provision`

use anyhow::{Context, Result};

use crate::cli::commands::SelectionArgs;
use crate::cli::output::{
    create_download_bar, create_spinner, format_size, is_json, print_detail, print_info, print_json,
    print_success, show_progress,
};
use crate::cli::RunContext;
use crate::core::link_system::AuxToolLink;
use crate::core::strategy::Strategy;
use crate::infra::download::ProgressCallback;
use crate::infra::host_tools::SystemHostTools;
use crate::provision::{ProvisionOptions, ProvisionOutcome, Provisioner};

/// Execute the provision command
pub async fn execute(ctx: &RunContext, selection: &SelectionArgs, force: bool) -> Result<()> {
    let settings = ctx.settings(selection.layer())?;
    let platform = selection.platform();
    let tools = SystemHostTools;

    let provisioner = Provisioner::new(&settings, platform, &tools);
    let strategy = provisioner.strategy();
    print_info(&format!(
        "Provisioning {} for {} ({strategy})",
        settings.toolchain_dir.display(),
        provisioner.platform()
    ));

    let spinner = (strategy == Strategy::LinkSystem && show_progress())
        .then(|| create_spinner("Linking system toolchain"));
    let bar = (strategy == Strategy::DownloadPrebuilt && show_progress())
        .then(|| create_download_bar(0));
    let progress: Option<ProgressCallback> = bar.clone().map(|bar| {
        Box::new(move |downloaded: u64, total: u64| {
            if total > 0 {
                bar.set_length(total);
            }
            bar.set_position(downloaded);
        }) as ProgressCallback
    });

    let result = provisioner
        .run(ProvisionOptions { force }, progress.as_ref())
        .await;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let outcome = result.with_context(|| {
        format!(
            "Failed to provision toolchain in {}",
            settings.toolchain_path().display()
        )
    })?;

    if is_json() {
        return print_json(&outcome);
    }

    match &outcome {
        ProvisionOutcome::Linked {
            sysroot,
            linked_binaries,
            aux_tool,
        } => {
            print_success(&format!(
                "Linked system toolchain from {}",
                sysroot.display()
            ));
            print_detail(&format!("{} binaries", linked_binaries.len()));
            match aux_tool {
                AuxToolLink::AlreadyLinked => {
                    print_detail(&format!("{} already linked", settings.aux_tool));
                }
                AuxToolLink::Linked { source, installed } => {
                    let how = if *installed { "installed and linked" } else { "linked" };
                    print_detail(&format!("{} {how} from {}", settings.aux_tool, source.display()));
                }
            }
        }
        ProvisionOutcome::AlreadyProvisioned { url } => {
            print_success("Toolchain already up to date");
            print_detail(url);
        }
        ProvisionOutcome::Downloaded { url, bytes, sha256 } => {
            print_success(&format!("Downloaded toolchain ({})", format_size(*bytes)));
            print_detail(url);
            print_detail(&format!("sha256 {sha256}"));
        }
    }

    Ok(())
}
