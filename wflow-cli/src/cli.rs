//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dashboard_server::ServerConfig;

#[derive(Parser)]
#[command(name = "wflow")]
#[command(about = "WhatsFlow dashboard CLI: serve, stats, clear", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the dashboard server (config from env; flags override BIND_ADDR / DATABASE_URL).
    Serve {
        #[arg(short, long)]
        bind: Option<String>,
        #[arg(short, long)]
        database: Option<String>,
    },
    /// Print aggregate statistics and known senders from the store.
    Stats {
        #[arg(long)]
        database: Option<String>,
    },
    /// Delete all messages and user activity from the store.
    Clear {
        #[arg(long)]
        database: Option<String>,
        /// Confirm the deletion; without this flag nothing is removed.
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Load ServerConfig from environment. CLI flags override env when provided.
pub fn load_config(bind: Option<String>, database: Option<String>) -> Result<ServerConfig> {
    ServerConfig::load(bind, database)
}
