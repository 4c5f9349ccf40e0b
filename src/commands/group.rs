//! Capture groups from minions into state files.

use anyhow::{Context, Result};
use colored::Colorize;
use saltkit::Target;

use crate::cli::GroupArgs;
use crate::commands::create_client;
use crate::config::MasterConfig;
use crate::describe::{describe_groups, GroupOptions};
use crate::Context as AppContext;
use crate::{progress, ui};

pub fn run(ctx: &AppContext, args: GroupArgs) -> Result<()> {
    ui::header("Capturing Groups");

    let config = MasterConfig::load_or_default(ctx.config.as_deref())
        .context("Failed to load master config")?;
    ui::dim(&format!("State root: {}", config.state_root()?.display()));
    println!();

    let client = match create_client() {
        Ok(client) => client,
        Err(msg) => {
            ui::error(&msg);
            return Ok(());
        }
    };

    let target = Target::new(args.target, args.tgt_type.into());
    if args.dry_run {
        ui::info("Dry run - no files will be written");
    }

    let pb = progress::spinner(&format!("Querying groups on {}...", target));
    let summary = describe_groups(
        &client,
        &config,
        &target,
        GroupOptions {
            include_members: args.include_members,
            dry_run: args.dry_run,
        },
    )?;
    progress::finish_success(
        &pb,
        &format!(
            "Captured {} groups from {} minions",
            summary.entries, summary.minions
        ),
    );

    if summary.minions == 0 {
        println!();
        ui::warn("No minions returned results");
        return Ok(());
    }

    if !ctx.quiet {
        println!();
        for path in &summary.files {
            println!("    {}", path.display().to_string().dimmed());
        }
    }

    println!();
    ui::success("Group capture complete!");

    Ok(())
}
