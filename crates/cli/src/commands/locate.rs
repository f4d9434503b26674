//! `opskit locate`: print the resolved path of a file near the origin.

use anyhow::Result;
use opskit_secrets::locate;

use super::Origin;

pub fn run(origin: &Origin, target: &str) -> Result<()> {
    let path = locate(target, &origin.path, origin.dir_level)?;
    println!("{}", path.display());
    Ok(())
}
