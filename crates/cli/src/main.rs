//! opskit - operational helpers for secret files, compose files and databases.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Initialize logging.
//! - Run the selected command and translate failures into exit codes.
//!
//! Does NOT handle:
//! - File lookup or secret parsing (see `crates/secrets`).
//! - Database access (see `crates/db`).
//!
//! Invariants:
//! - Errors are printed to stderr with their full context chain.
//! - The process exit code reflects the root cause (see `error` module).
//! - Everything runs on one thread, which keeps `ProcessEnv` mutation sound.

mod args;
mod commands;
mod dispatch;
mod error;
mod logging;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    let exit_code = match run_command(cli).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
