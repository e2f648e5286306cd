//! CLI argument definitions using clap
//!
//! Every command reads one JSON request from stdin:
//! - rowmap get --config <path>      `{"record": "events", "id": 1}`
//! - rowmap query --config <path>    `{"record": "events", "params": {"name_contains": "Rust"}}`
//! - rowmap create --config <path>   `{"record": "events", "data": {...}}`
//! - rowmap update --config <path>   `{"record": "events", "data": {"id": 1, ...}}`
//! - rowmap delete --config <path>   `{"record": "events", "id": 1}`
//! - rowmap explain --config <path>  `{"record": "events", "params": {...}}`

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rowmap - typed records over a relational store
#[derive(Parser, Debug)]
#[command(name = "rowmap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read one record by identifier
    Get {
        /// Path to configuration file
        #[arg(long, default_value = "./rowmap.json")]
        config: PathBuf,
    },

    /// Read records matching query parameters
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./rowmap.json")]
        config: PathBuf,
    },

    /// Insert a record and print its identifier
    Create {
        /// Path to configuration file
        #[arg(long, default_value = "./rowmap.json")]
        config: PathBuf,
    },

    /// Replace every writable field of an existing record
    Update {
        /// Path to configuration file
        #[arg(long, default_value = "./rowmap.json")]
        config: PathBuf,
    },

    /// Delete a record by identifier
    Delete {
        /// Path to configuration file
        #[arg(long, default_value = "./rowmap.json")]
        config: PathBuf,
    },

    /// Print the statement a query would run, without running it
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./rowmap.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
