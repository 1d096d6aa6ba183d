//! Init command handler.

use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory with an initial `config.json` and an empty,
/// fully-migrated database.
///
/// # Arguments
/// - `home` - The directory that will be the root of the data directory,
///   e.g. `$HOME/spendlog`
///
/// # Errors
/// - Returns an error if the directory cannot be created or a database
///   already exists there.
pub async fn init(home: &Path) -> Result<Out<()>> {
    let config = Config::create(home)
        .await
        .context("Unable to create the data directory and config")?;
    Ok(format!(
        "Created {} and initialized an empty expense database",
        config.root().display()
    )
    .into())
}
