//! SQLite backend for the review store.
//!
//! Implements [`slr_core::storage::DocumentStorage`] over a single key/value
//! table, so the whole review lives in one portable `.db` file.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStorage;

#[cfg(test)]
mod tests;
