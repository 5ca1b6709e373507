//! Entity identifiers.
//!
//! An id is a base-36 millisecond timestamp followed by five random base-36
//! characters. The timestamp part is forced to be strictly increasing within
//! a process, so two ids minted in the same millisecond still differ even
//! before the random suffix is considered. Uniqueness is session-local, not
//! cryptographic.

use std::{
  fmt,
  sync::atomic::{AtomicU64, Ordering},
};

use chrono::Utc;
use rand_core::{OsRng, RngCore as _};
use serde::{Deserialize, Serialize};

const RANDOM_SUFFIX_LEN: usize = 5;

static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

// ─── EntityId ────────────────────────────────────────────────────────────────

/// Identifier of any entity stored in a review document.
///
/// Ids are opaque strings. Documents written by other tools may carry ids of
/// any shape, so parsing accepts every string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
  /// Mint a fresh id.
  pub fn generate() -> Self {
    let millis = next_millis();
    let mut id = to_base36(millis);
    let mut noise = OsRng.next_u64();
    for _ in 0..RANDOM_SUFFIX_LEN {
      id.push(base36_digit((noise % 36) as u8));
      noise /= 36;
    }
    Self(id)
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for EntityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<String> for EntityId {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for EntityId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

fn next_millis() -> u64 {
  let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
  let prev = LAST_MILLIS
    .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
      Some(now.max(last + 1))
    })
    .unwrap_or(now);
  now.max(prev + 1)
}

fn base36_digit(d: u8) -> char {
  match d {
    0..=9 => char::from(b'0' + d),
    _ => char::from(b'a' + (d - 10)),
  }
}

fn to_base36(mut n: u64) -> String {
  if n == 0 {
    return "0".to_owned();
  }
  let mut digits = Vec::new();
  while n > 0 {
    digits.push(base36_digit((n % 36) as u8));
    n /= 36;
  }
  digits.iter().rev().collect()
}

// ─── EntityKind ──────────────────────────────────────────────────────────────

/// The collection an id belongs to; used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
  ResearchQuestion,
  Criterion,
  KeywordGroup,
  Source,
  SearchSession,
  Study,
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::ResearchQuestion => "research question",
      Self::Criterion => "criterion",
      Self::KeywordGroup => "keyword group",
      Self::Source => "source",
      Self::SearchSession => "search session",
      Self::Study => "study",
    };
    f.write_str(name)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn base36_encoding() {
    assert_eq!(to_base36(0), "0");
    assert_eq!(to_base36(35), "z");
    assert_eq!(to_base36(36), "10");
  }

  #[test]
  fn generated_ids_are_unique() {
    let ids: HashSet<_> = (0..1000).map(|_| EntityId::generate()).collect();
    assert_eq!(ids.len(), 1000);
  }

  #[test]
  fn generated_ids_are_lowercase_base36() {
    let id = EntityId::generate();
    assert!(id.as_str().len() > RANDOM_SUFFIX_LEN);
    assert!(
      id.as_str()
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
    );
  }

  #[test]
  fn time_component_is_strictly_increasing() {
    let a = next_millis();
    let b = next_millis();
    assert!(b > a);
  }
}
