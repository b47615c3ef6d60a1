//! Command-line interface.
//!
//! ```text
//! artisan-api [--config PATH] [--env-file PATH] serve [--bind ADDR] [--include-hidden]
//! artisan-api [--config PATH] routes [--include-hidden]
//! artisan-api [--config PATH] commands
//! ```

pub mod runner;
pub mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use runner::run;
pub use utils::*;

/// Expose console commands as HTTP routes.
#[derive(Debug, Parser)]
#[command(name = "artisan-api", version, about)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// .env file with ARTISAN_API_* overrides
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Discover commands, generate routes and serve them
    Serve {
        /// Listen address, e.g. 127.0.0.1:8000
        #[arg(short, long)]
        bind: Option<String>,

        /// Expose hidden commands too
        #[arg(long)]
        include_hidden: bool,
    },

    /// Print the generated route table
    Routes {
        /// Expose hidden commands too
        #[arg(long)]
        include_hidden: bool,
    },

    /// Print discovered commands and whether each is exposed
    Commands,
}
