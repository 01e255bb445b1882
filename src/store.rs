use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Prefix under which every logical table is keyed, matching the original
/// browser storage layout (`db_cloud_tickets`, `db_cloud_ratings`, ...).
pub const NAMESPACE: &str = "db_cloud_";

/// A local key-value store standing in for the remote backend. Each table is
/// one JSON array under a namespaced key. Writes are last-write-wins; there is
/// no locking and no retry.
pub struct LocalStore {
    conn: Connection,
    latency: Duration,
}

impl LocalStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).context("Failed to open local store")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(LocalStore {
            conn,
            latency: Duration::ZERO,
        })
    }

    /// Artificial delay slept before every read or write, simulating the
    /// latency of the virtual backend. Zero disables it.
    pub fn set_latency(&mut self, latency: Duration) {
        self.latency = latency;
    }

    fn simulate_backend(&self) {
        if !self.latency.is_zero() {
            debug!(ms = self.latency.as_millis() as u64, "simulating backend latency");
            thread::sleep(self.latency);
        }
    }

    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Reads a whole table. A key that was never written yields an empty list.
    pub fn read_table<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        self.simulate_backend();
        let key = format!("{}{}", NAMESPACE, table);
        match self.get_raw(&key)? {
            Some(json) => serde_json::from_str(&json)
                .with_context(|| format!("Stored table '{}' is corrupted", table)),
            None => Ok(Vec::new()),
        }
    }

    /// Serializes and replaces a whole table under its namespaced key.
    pub fn write_table<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<()> {
        self.simulate_backend();
        let key = format!("{}{}", NAMESPACE, table);
        let json = serde_json::to_string(rows)?;
        self.put_raw(&key, &json)
            .with_context(|| format!("Failed to sync table '{}'", table))?;
        debug!(table, rows = rows.len(), "synced table");
        Ok(())
    }

    /// Every namespaced key with its parsed JSON value, for backup dumps.
    pub fn export_all(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        self.simulate_backend();
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM kv WHERE key LIKE ?1 ORDER BY key")?;
        let pattern = format!("{}%", NAMESPACE);
        let rows = stmt.query_map([pattern], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut tables = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            let parsed: serde_json::Value = serde_json::from_str(&value)
                .with_context(|| format!("Stored key '{}' is corrupted", key))?;
            tables.insert(key, parsed);
        }
        Ok(tables)
    }

    /// Restores tables from a dump. Keys outside the namespace are skipped.
    /// Returns how many tables were written.
    pub fn import_all(&self, tables: &BTreeMap<String, serde_json::Value>) -> Result<usize> {
        self.simulate_backend();
        let mut written = 0;
        for (key, value) in tables {
            if !key.starts_with(NAMESPACE) {
                debug!(key = key.as_str(), "skipping key outside namespace");
                continue;
            }
            self.put_raw(key, &serde_json::to_string(value)?)?;
            written += 1;
        }
        Ok(written)
    }
}
