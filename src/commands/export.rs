use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};

use crate::db::Desk;

/// Full dump of every namespaced table, used as an ad hoc backup that can be
/// re-imported into another store.
#[derive(Serialize, Deserialize)]
pub struct ExportData {
    pub version: i32,
    pub exported_at: String,
    pub tables: BTreeMap<String, serde_json::Value>,
}

pub fn run_export(desk: &Desk, output_path: Option<&str>) -> Result<()> {
    let tables = desk.store().export_all()?;
    let data = ExportData {
        version: 1,
        exported_at: chrono::Utc::now().to_rfc3339(),
        tables,
    };

    let json = serde_json::to_string_pretty(&data)?;

    match output_path {
        Some(path) => {
            fs::write(path, json).context("Failed to write export file")?;
            eprintln!("Exported {} table(s) to {}", data.tables.len(), path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}

pub fn run_import(desk: &Desk, path: &str) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file {}", path))?;
    let data: ExportData =
        serde_json::from_str(&content).context("Import file is not valid JSON")?;

    let written = desk.store().import_all(&data.tables)?;
    println!("Imported {} table(s) from {}", written, path);
    Ok(())
}
