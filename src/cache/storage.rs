//! Slot storage trait and SQLite implementation.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::Slot;

/// Storage backend for cache slots.
pub trait SlotStorage: Send + Sync {
  /// Read the serialized contents of one slot, if present.
  fn read(&self, slot: Slot) -> Result<Option<String>>;

  /// Write one slot, replacing any previous contents.
  fn write(&self, slot: Slot, json: &str) -> Result<()>;
}

/// Storage that persists nothing.
/// Used when caching is disabled - reads always miss, writes are discarded.
pub struct NoopStorage;

impl SlotStorage for NoopStorage {
  fn read(&self, _slot: Slot) -> Result<Option<String>> {
    Ok(None) // Always miss
  }

  fn write(&self, _slot: Slot, _json: &str) -> Result<()> {
    Ok(()) // Discard
  }
}

/// SQLite-backed slot storage.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

/// Schema for the slot table.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS slots (
    key TEXT PRIMARY KEY,
    data TEXT NOT NULL,
    saved_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl SqliteStorage {
  /// Open or create the cache database at the default location.
  pub fn open() -> Result<Self> {
    Self::open_at(&Self::default_path()?)
  }

  /// Open or create the cache database at an explicit path.
  pub fn open_at(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    conn
      .execute_batch(SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("hearth").join("cache.db"))
  }
}

impl SlotStorage for SqliteStorage {
  fn read(&self, slot: Slot) -> Result<Option<String>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .query_row(
        "SELECT data FROM slots WHERE key = ?",
        params![slot.key()],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read slot {}: {}", slot.key(), e))
  }

  fn write(&self, slot: Slot, json: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO slots (key, data, saved_at) VALUES (?, ?, datetime('now'))",
        params![slot.key(), json],
      )
      .map_err(|e| eyre!("Failed to write slot {}: {}", slot.key(), e))?;

    Ok(())
  }
}
