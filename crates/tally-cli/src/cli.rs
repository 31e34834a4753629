//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Bank statement spending dashboard
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Turn bank statements into an analyzable ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(long, default_value = "ledger.json", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize an empty ledger file
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origins (repeatable)
        ///
        /// Also settable via TALLY_CORS_ORIGINS (comma-separated).
        /// Empty means same-origin only.
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },

    /// Show ledger status and counts
    Status,
}
