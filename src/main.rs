//! Students API entry point
//!
//! Parses arguments, dispatches to the CLI module, prints any error to
//! stderr and exits non-zero on failure. All boot logic lives in `cli`.

use students_api::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
