//! Capture user accounts from minions into state and pillar files.

use anyhow::{Context, Result};
use colored::Colorize;
use saltkit::Target;

use crate::cli::UserArgs;
use crate::commands::create_client;
use crate::config::MasterConfig;
use crate::describe::{describe_users, UserOptions};
use crate::Context as AppContext;
use crate::{progress, ui};

pub fn run(ctx: &AppContext, args: UserArgs) -> Result<()> {
    ui::header("Capturing Users");

    let config = MasterConfig::load_or_default(ctx.config.as_deref())
        .context("Failed to load master config")?;
    ui::dim(&format!("State root:  {}", config.state_root()?.display()));
    ui::dim(&format!("Pillar root: {}", config.pillar_root()?.display()));
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

    let pb = progress::spinner(&format!("Querying accounts on {}...", target));
    let summary = describe_users(
        &client,
        &config,
        &target,
        UserOptions {
            require_groups: args.require_groups,
            dry_run: args.dry_run,
        },
    )?;
    progress::finish_success(
        &pb,
        &format!(
            "Captured {} accounts from {} minions",
            summary.entries, summary.minions
        ),
    );

    if summary.minions == 0 {
        println!();
        ui::warn("No minions returned results");
        return Ok(());
    }

    println!();
    if summary.pillar_entries > 0 {
        println!(
            "  {} password hashes captured into pillar data",
            summary.pillar_entries.to_string().yellow()
        );
    }
    if !ctx.quiet {
        for path in &summary.files {
            println!("    {}", path.display().to_string().dimmed());
        }
    }

    println!();
    ui::success("User capture complete!");

    Ok(())
}
