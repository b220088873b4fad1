//! CLI argument definitions using clap
//!
//! Commands:
//! - slotattr validate --config <path>
//! - slotattr encode-options
//! - slotattr structs --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// slotattr - A strict, deterministic validator for slot attribute definitions
#[derive(Parser, Debug)]
#[command(name = "slotattr")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate attribute definitions, one JSON object per stdin line
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./slotattr.json")]
        config: PathBuf,
    },

    /// Encode a JSON options object into the binary options form
    EncodeOptions,

    /// List the structures available to `struct` attributes
    Structs {
        /// Path to configuration file
        #[arg(long, default_value = "./slotattr.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
