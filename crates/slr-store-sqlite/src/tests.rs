//! Integration tests for `SqliteStorage`, in memory and on disk.

use pretty_assertions::assert_eq;
use slr_core::{
  ReviewStore,
  document::{QaAnswer, Verdict},
  input::{NewSource, NewStudy},
  storage::{DocumentStorage, STORAGE_KEY},
};

use crate::SqliteStorage;

fn storage() -> SqliteStorage { SqliteStorage::open_in_memory().expect("in-memory storage") }

// ─── Raw key/value ───────────────────────────────────────────────────────────

#[test]
fn read_missing_key_returns_none() {
  let s = storage();
  assert_eq!(s.read("absent").unwrap(), None);
  assert_eq!(s.written_at("absent").unwrap(), None);
}

#[test]
fn write_then_read() {
  let mut s = storage();
  s.write("k", "{\"a\":1}").unwrap();
  assert_eq!(s.read("k").unwrap().as_deref(), Some("{\"a\":1}"));
  assert!(s.written_at("k").unwrap().is_some());
}

#[test]
fn write_replaces_whole_value() {
  let mut s = storage();
  s.write("k", "first").unwrap();
  s.write("k", "second").unwrap();
  assert_eq!(s.read("k").unwrap().as_deref(), Some("second"));
}

#[test]
fn remove_key() {
  let mut s = storage();
  s.write("k", "v").unwrap();
  assert!(s.remove("k").unwrap());
  assert!(!s.remove("k").unwrap());
  assert_eq!(s.read("k").unwrap(), None);
}

// ─── Through the review store ────────────────────────────────────────────────

#[test]
fn store_persists_into_sqlite() {
  let mut store = ReviewStore::open(storage());
  store.set_title("SQLite review");
  let raw = store.storage().read(STORAGE_KEY).unwrap().unwrap();
  assert!(raw.contains("SQLite review"));
}

#[test]
fn review_survives_reopen_from_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("nested").join("review.db");

  let study_id = {
    let mut store = ReviewStore::open(SqliteStorage::open(&path).unwrap());
    store.add_source(NewSource::new("PubMed"));
    let study = store.add_study(NewStudy::titled("Statins and mortality"));
    store.set_verdict(&study.id, Verdict::Include).unwrap();
    store.set_qa_score(&study.id, 0, QaAnswer::Yes).unwrap();
    study.id
  };

  let reopened = ReviewStore::open(SqliteStorage::open(&path).unwrap());
  let doc = reopened.document();
  assert_eq!(doc.planning.sources[0].abbr, "PU");
  let study = doc.study(&study_id).expect("study persisted");
  assert_eq!(study.verdict, Verdict::Include);
  assert_eq!(reopened.qa_score(study), Some(1));
}

#[test]
fn corrupt_row_falls_back_to_fresh_document() {
  let mut s = storage();
  s.write(STORAGE_KEY, "not a document").unwrap();
  let store = ReviewStore::open(s);
  assert!(store.document().studies.is_empty());
  assert!(store.document().meta.created_at.is_some());
}
