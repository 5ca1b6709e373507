//! [`SqliteStorage`] — the SQLite implementation of [`DocumentStorage`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use slr_core::storage::DocumentStorage;
use tracing::debug;

use crate::{Error, Result, schema::SCHEMA};

// ─── Storage ─────────────────────────────────────────────────────────────────

/// Document storage backed by a single SQLite file.
///
/// Every write is a single-statement upsert, so a value is either fully
/// replaced or left as it was.
pub struct SqliteStorage {
  conn: rusqlite::Connection,
}

impl SqliteStorage {
  /// Open (or create) a storage file at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    let conn = rusqlite::Connection::open(path)?;
    debug!(path = %path.display(), "opened sqlite storage");
    Self::init(conn)
  }

  /// Open an in-memory storage — useful for testing.
  pub fn open_in_memory() -> Result<Self> { Self::init(rusqlite::Connection::open_in_memory()?) }

  fn init(conn: rusqlite::Connection) -> Result<Self> {
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn })
  }

  /// When `key` was last written, if it exists.
  pub fn written_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = self
      .conn
      .query_row(
        "SELECT written_at FROM documents WHERE key = ?1",
        rusqlite::params![key],
        |row| row.get(0),
      )
      .optional()?;

    raw
      .map(|s| {
        DateTime::parse_from_rfc3339(&s)
          .map(|dt| dt.with_timezone(&Utc))
          .map_err(|e| Error::DateParse(e.to_string()))
      })
      .transpose()
  }

  /// Delete the value stored under `key`. Returns `false` if there was none.
  pub fn remove(&mut self, key: &str) -> Result<bool> {
    let n = self
      .conn
      .execute("DELETE FROM documents WHERE key = ?1", rusqlite::params![key])?;
    Ok(n > 0)
  }
}

// ─── DocumentStorage impl ────────────────────────────────────────────────────

impl DocumentStorage for SqliteStorage {
  type Error = Error;

  fn read(&self, key: &str) -> Result<Option<String>> {
    Ok(
      self
        .conn
        .query_row(
          "SELECT value FROM documents WHERE key = ?1",
          rusqlite::params![key],
          |row| row.get(0),
        )
        .optional()?,
    )
  }

  fn write(&mut self, key: &str, value: &str) -> Result<()> {
    let written_at = Utc::now().to_rfc3339();
    self.conn.execute(
      "INSERT INTO documents (key, value, written_at) VALUES (?1, ?2, ?3)
       ON CONFLICT(key) DO UPDATE SET value = excluded.value, written_at = excluded.written_at",
      rusqlite::params![key, value, written_at],
    )?;
    Ok(())
  }
}
