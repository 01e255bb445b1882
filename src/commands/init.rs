use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::store::LocalStore;

pub fn run(path: &Path) -> Result<()> {
    let officehub_dir = path.join(".officehub");

    if officehub_dir.exists() {
        println!("Already initialized at {}", path.display());
        return Ok(());
    }

    fs::create_dir_all(&officehub_dir).context("Failed to create .officehub directory")?;
    LocalStore::open(&officehub_dir.join("local.db"))?;
    println!("Created {}", officehub_dir.display());

    Ok(())
}
