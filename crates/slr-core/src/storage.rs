//! The `DocumentStorage` trait and an in-memory implementation.
//!
//! Storage is a flat string key/value space. The review store keeps its whole
//! document under a single key and rewrites it on every mutation. Backends
//! (e.g. `slr-store-sqlite`) implement this trait; the store itself never
//! depends on a concrete backend.

use std::collections::HashMap;

use thiserror::Error;

/// The key the review document is stored under.
pub const STORAGE_KEY: &str = "slr_manager_v1";

/// Synchronous, whole-value key/value persistence.
pub trait DocumentStorage {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value stored under `key`, or `None` if there is none.
  fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Replace the value stored under `key`.
  fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

// ─── MemoryStorage ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryStorageError {
  #[error("storage quota exceeded while writing {key:?} ({len} bytes)")]
  QuotaExceeded { key: String, len: usize },
}

/// A process-local storage, useful for tests and ephemeral sessions.
///
/// An optional quota makes writes of larger values fail, which is how
/// durability loss is exercised.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
  entries: HashMap<String, String>,
  quota:   Option<usize>,
  writes:  usize,
}

impl MemoryStorage {
  pub fn new() -> Self { Self::default() }

  /// A storage already holding `value` under `key`.
  pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
    let mut storage = Self::default();
    storage.entries.insert(key.into(), value.into());
    storage
  }

  /// Reject any write whose value is longer than `bytes`.
  pub fn with_quota(mut self, bytes: usize) -> Self {
    self.quota = Some(bytes);
    self
  }

  pub fn set_quota(&mut self, bytes: Option<usize>) { self.quota = bytes; }

  /// Number of successful writes so far.
  pub fn writes(&self) -> usize { self.writes }

  pub fn get(&self, key: &str) -> Option<&str> { self.entries.get(key).map(String::as_str) }
}

impl DocumentStorage for MemoryStorage {
  type Error = MemoryStorageError;

  fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
    Ok(self.entries.get(key).cloned())
  }

  fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
    if self.quota.is_some_and(|q| value.len() > q) {
      return Err(MemoryStorageError::QuotaExceeded {
        key: key.to_owned(),
        len: value.len(),
      });
    }
    self.entries.insert(key.to_owned(), value.to_owned());
    self.writes += 1;
    Ok(())
  }
}
