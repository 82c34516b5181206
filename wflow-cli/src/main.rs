//! wflow CLI: run the dashboard server, inspect stats, clear the log.
//! Config from env (.env supported) with optional CLI overrides.

use anyhow::{Context, Result};
use clap::Parser;
use dashboard_server::run_server;
use storage::{AggregateComputer, MessageStore};
use wflow_cli::{load_config, Cli, Commands};
use wflow_core::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, database } => {
            let config = load_config(bind, database)?;
            init_tracing(&config.log_file)
                .context("Initialize tracing (check LOG_FILE path)")?;
            run_server(config).await
        }
        Commands::Stats { database } => handle_stats(database).await,
        Commands::Clear { database, yes } => handle_clear(database, yes).await,
    }
}

/// Handle the stats command.
///
/// Prints the aggregate counts, the hourly histogram, and the known senders
/// ordered by most recent activity.
async fn handle_stats(database: Option<String>) -> Result<()> {
    let config = load_config(None, database)?;
    let store = MessageStore::new(&config.database_url)
        .await
        .context("Open the message store (check DATABASE_URL)")?;
    let aggregates = AggregateComputer::new(store.clone());

    let stats = aggregates.snapshot_stats().await?;
    println!(
        "Total: {}  Received: {}  Sent: {}  Failed: {}  Users: {}",
        stats.total, stats.received, stats.sent, stats.failed, stats.users
    );

    let hourly = aggregates.snapshot_hourly().await?;
    println!("\nMessages per hour of day:");
    for (hour, count) in hourly.iter().enumerate() {
        if *count > 0 {
            println!("  {:02}:00  {}", hour, count);
        }
    }

    let users = store.list_users().await?;
    if users.is_empty() {
        println!("\nNo senders recorded.");
        return Ok(());
    }

    println!("\n{:<18} {:<20} {:<20} {}", "phone", "first_seen", "last_seen", "messages");
    println!("{}", "-".repeat(70));
    for user in &users {
        println!(
            "{:<18} {:<20} {:<20} {}",
            user.phone,
            user.first_seen.format("%Y-%m-%d %H:%M:%S"),
            user.last_seen.format("%Y-%m-%d %H:%M:%S"),
            user.message_count
        );
    }

    Ok(())
}

/// Handle the clear command. Requires --yes to actually delete.
async fn handle_clear(database: Option<String>, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("refusing to clear without --yes");
    }

    let config = load_config(None, database)?;
    let store = MessageStore::new(&config.database_url)
        .await
        .context("Open the message store (check DATABASE_URL)")?;

    store.clear_all().await?;
    println!("Message log and user activity cleared.");

    Ok(())
}
