//! CLI module for slotattr
//!
//! Provides command-line interface for:
//! - validate: Validate attribute definitions read from stdin
//! - encode-options: Encode an options object into the binary form
//! - structs: List registered structures

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{encode_options, run, run_command, structs, validate, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_requests, write_error, write_json, write_response};
