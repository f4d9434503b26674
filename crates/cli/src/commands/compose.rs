//! `opskit compose fill`: inject secrets into a docker-compose file.

use anyhow::{Context, Result};
use opskit_secrets::{ComposeTargets, ProcessEnv, fill_compose_file};
use tracing::info;

use super::Origin;
use crate::args::ComposeCommand;

pub fn run(origin: &Origin, command: ComposeCommand) -> Result<()> {
    match command {
        ComposeCommand::Fill {
            env_file,
            compose_file,
            dry_run,
        } => {
            let targets = ComposeTargets {
                env_file: &env_file,
                compose_file: &compose_file,
                source: &origin.path,
                dir_level: origin.dir_level,
            };
            let outcome = fill_compose_file(&mut ProcessEnv, &targets, dry_run)
                .with_context(|| format!("Failed to fill secrets into {compose_file}"))?;

            for service in &outcome.fill.services {
                info!(service = %service.service, keys = ?service.keys, "Service environment filled");
            }

            if dry_run {
                print!("{}", outcome.fill.document);
            } else {
                println!("{}", outcome.compose_path.display());
            }
        }
    }

    Ok(())
}
