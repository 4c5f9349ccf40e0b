//! Inventory of the captured state and pillar trees.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use walkdir::WalkDir;

use crate::config::MasterConfig;
use crate::statetree::INIT_SLS;
use crate::Context as AppContext;
use crate::ui;

pub fn run(ctx: &AppContext) -> Result<()> {
    ui::header("Captured Trees");

    let config = MasterConfig::load_or_default(ctx.config.as_deref())
        .context("Failed to load master config")?;
    let verbose = ctx.verbose > 0;

    print_tree("State tree", &config.state_root()?, verbose);
    print_tree("Pillar tree", &config.pillar_root()?, verbose);

    Ok(())
}

fn print_tree(label: &str, root: &Path, verbose: bool) {
    ui::section(label);
    ui::kv("root", &root.display().to_string());

    if !root.is_dir() {
        ui::dim("not created yet");
        return;
    }

    let mut minions = 0;
    let mut total_files = 0;

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_dir())
    {
        let minion = entry.file_name().to_string_lossy().to_string();
        let files = sls_files(entry.path());
        if files.is_empty() {
            continue;
        }

        minions += 1;
        total_files += files.len();
        if verbose {
            println!("  {}", minion.bold());
            for file in &files {
                println!("    {}", entry.path().join(file).display());
            }
        } else {
            println!(
                "  {} {}",
                minion.bold(),
                format!("({})", files.join(", ")).dimmed()
            );
        }
    }

    if minions == 0 {
        ui::dim("no minions captured");
    } else {
        println!();
        println!(
            "  {} minions, {} files",
            minions.to_string().green(),
            total_files
        );
    }
}

/// List the `.sls` files in a minion directory, manifest last.
fn sls_files(minion_dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(minion_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".sls"))
        .collect();

    // Keep the manifest at the end of the listing
    if let Some(pos) = files.iter().position(|f| f == INIT_SLS) {
        let init = files.remove(pos);
        files.push(init);
    }
    files
}
