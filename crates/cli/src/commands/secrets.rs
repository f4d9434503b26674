//! `opskit secrets`: load an environment file into the process environment.
//!
//! Responsibilities:
//! - List the keys an environment file defines.
//! - Verify named secrets resolve to non-empty values.
//!
//! Invariants:
//! - Secret values are never written to stdout or logs.

use anyhow::{Context, Result};
use opskit_secrets::{ProcessEnv, get_secret, load_secrets_from_file};

use super::Origin;
use crate::args::SecretsCommand;

pub fn run(origin: &Origin, command: SecretsCommand) -> Result<()> {
    let mut env = ProcessEnv;

    match command {
        SecretsCommand::Keys { env_file } => {
            let report = load_secrets_from_file(&mut env, &env_file, &origin.path, origin.dir_level)
                .with_context(|| format!("Failed to load secrets from {env_file}"))?;
            for key in &report.keys {
                println!("{key}");
            }
        }
        SecretsCommand::Check { names, env_file } => {
            load_secrets_from_file(&mut env, &env_file, &origin.path, origin.dir_level)
                .with_context(|| format!("Failed to load secrets from {env_file}"))?;
            for name in &names {
                get_secret(&env, name)?;
                println!("{name}: ok");
            }
        }
    }

    Ok(())
}
