// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Monthbook", "monthbook"));

/// Durable key-value medium with whole-value reads and writes.
pub trait KeyValueStore {
    /// `Ok(None)` when the key has never been written.
    fn load(&self, key: &str) -> Result<Option<String>>;

    fn save(&mut self, key: &str, value: &str) -> Result<()>;

    /// Write several keys. Implementations that can should make the writes
    /// visible together.
    fn save_all(&mut self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.save(key, value)?;
        }
        Ok(())
    }
}

pub fn db_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("monthbook.sqlite"))
}

pub fn open_or_init(path: Option<&Path>) -> anyhow::Result<SqliteStore> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => db_path()?,
    };
    SqliteStore::open(&path).with_context(|| format!("Open DB at {}", path.display()))
}

/// [`KeyValueStore`] on a single SQLite file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- whole serialized collections, one row per key
    CREATE TABLE IF NOT EXISTS kv(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

const UPSERT: &str = "INSERT INTO kv(key, value, updated_at) VALUES (?1, ?2, datetime('now'))
     ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at";

impl KeyValueStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let v = self
            .conn
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| r.get(0))
            .optional()?;
        Ok(v)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(UPSERT, params![key, value])?;
        Ok(())
    }

    fn save_all(&mut self, entries: &[(&str, String)]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            tx.execute(UPSERT, params![key, value])?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// In-process store, for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// While set, every write fails with [`Error::Persistence`].
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful `save_all`/`save` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Persistence(format!("write of '{}' refused", key)));
        }
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn save_all(&mut self, entries: &[(&str, String)]) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Persistence("write refused".to_string()));
        }
        for (key, value) in entries {
            self.values.insert(key.to_string(), value.clone());
        }
        self.writes += 1;
        Ok(())
    }
}
