//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::cache::CacheDb;
use crate::Folio;

/// Clean the public directory and the build cache
pub fn run(folio: &Folio) -> Result<()> {
    if folio.public_dir.exists() {
        fs::remove_dir_all(&folio.public_dir)?;
        tracing::info!("Deleted: {:?}", folio.public_dir);
    }

    CacheDb::clear(&folio.base_dir)?;

    Ok(())
}
