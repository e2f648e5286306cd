//! rowmap CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`; all loading and
//! storage access happen in the CLI module. Errors go to stderr with a
//! non-zero exit.

use rowmap::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
