//! CLI module for rowmap
//!
//! One-shot commands over a configured SQLite database:
//! - get, query, create, update, delete: repository operations
//! - explain: statement preview for a query

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{dispatch, run, run_command, Operation, RecordKind, Request};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_request_from, write_error, write_response};
