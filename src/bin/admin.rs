//! CLI administration tool for link-status.
//!
//! Inspects the durable link set snapshot without going through the HTTP API.
//! Safe to run against a live service: the file is only ever replaced by an
//! atomic rename, so it is never observed half written.
//!
//! # Usage
//!
//! ```bash
//! # One line per stored link set
//! cargo run --bin admin -- list
//!
//! # Show links of specific link sets
//! cargo run --bin admin -- show 3 7
//!
//! # Totals
//! cargo run --bin admin -- stats
//!
//! # Read a different snapshot
//! cargo run --bin admin -- --storage-file /var/lib/link-status/link_sets.json stats
//! ```
//!
//! # Environment Variables
//!
//! - `STORAGE_FILE` (optional): snapshot path, overridden by `--storage-file`

use link_status::domain::entities::{LinkSet, LinkStatus};
use link_status::infrastructure::persistence::{Snapshot, SnapshotFile};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

/// CLI tool for inspecting link-status storage.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Snapshot file to read
    #[arg(long, env = "STORAGE_FILE", default_value = "link_sets.json")]
    storage_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored link sets
    List,

    /// Show the links of one or more link sets
    Show {
        /// Link set numbers
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Show storage statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let file = SnapshotFile::new(cli.storage_file);
    let snapshot = file
        .load()
        .await
        .with_context(|| format!("Failed to read {}", file.path().display()))?;

    let Some(snapshot) = snapshot else {
        println!(
            "{}",
            format!("No snapshot at {}", file.path().display()).yellow()
        );
        return Ok(());
    };

    match cli.command {
        Commands::List => list(&snapshot),
        Commands::Show { ids } => show(&snapshot, &ids),
        Commands::Stats => stats(&snapshot),
    }

    Ok(())
}

fn list(snapshot: &Snapshot) {
    println!("{}", "📋 Link Sets".bright_blue().bold());
    println!();

    if snapshot.link_sets.is_empty() {
        println!("{}", "  No link sets stored".yellow());
        println!();
        return;
    }

    for set in snapshot.link_sets.values() {
        println!(
            "  {}  {}  {}/{} available",
            format!("{:>6}", set.identity).cyan(),
            set.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().bright_black(),
            set.available_count().to_string().bright_green(),
            set.links.len()
        );
    }
    println!();
}

fn show(snapshot: &Snapshot, ids: &[u64]) {
    for id in ids {
        match snapshot.link_sets.get(id) {
            Some(set) => print_link_set(set),
            None => println!("{}", format!("❌ Link set {id} not found").red()),
        }
    }
}

fn print_link_set(set: &LinkSet) {
    println!(
        "{} {}",
        format!("🔗 Link set {}", set.identity).bright_blue().bold(),
        set.timestamp.to_rfc3339().bright_black()
    );

    for (url, status) in &set.links {
        let label = format!("{:<15}", status.as_str());
        let label = match status {
            LinkStatus::Available => label.green(),
            LinkStatus::NotAvailable => label.red(),
        };
        println!("  {label} {url}");
    }
    println!();
}

fn stats(snapshot: &Snapshot) {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links: usize = snapshot.link_sets.values().map(|s| s.links.len()).sum();
    let available: usize = snapshot
        .link_sets
        .values()
        .map(LinkSet::available_count)
        .sum();

    println!(
        "  Link sets:     {}",
        snapshot.link_sets.len().to_string().bright_green().bold()
    );
    println!(
        "  Links checked: {}",
        links.to_string().bright_green().bold()
    );
    println!(
        "  Available:     {}",
        available.to_string().bright_green().bold()
    );
    println!("  Next id:       {}", snapshot.next_id.to_string().cyan());
    println!();
}
