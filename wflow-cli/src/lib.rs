//! wflow CLI library: argument parsing and config loading.

mod cli;

pub use cli::{load_config, Cli, Commands};
