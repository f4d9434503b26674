//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the matching command handler.
//! - Resolve the origin shared by every file lookup.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Logging setup (see `logging` module).

use anyhow::{Context, Result};

use crate::args::{Cli, Commands};
use crate::commands::{self, Origin, sql::SqlArgs};

/// Dispatch CLI commands to their respective handlers.
pub(crate) async fn run_command(cli: Cli) -> Result<()> {
    let origin = Origin {
        path: cli
            .origin_path()
            .context("Failed to determine the current directory")?,
        dir_level: cli.dir_level(),
    };
    tracing::debug!(origin = %origin.path.display(), dir_level = ?origin.dir_level, "Resolved origin");

    match cli.command {
        Commands::Locate { target } => commands::locate::run(&origin, &target)?,
        Commands::Secrets { command } => commands::secrets::run(&origin, command)?,
        Commands::Compose { command } => commands::compose::run(&origin, command)?,
        Commands::Sql {
            env_file,
            database,
            echo,
            output,
            command,
        } => {
            let args = SqlArgs {
                env_file,
                database,
                echo,
                output,
            };
            commands::sql::run(&origin, args, command).await?;
        }
    }

    Ok(())
}
