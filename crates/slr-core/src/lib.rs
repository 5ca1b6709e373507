//! Core types and the review store for a systematic literature review.
//!
//! The whole review lives in one [`document::ReviewDocument`], owned by a
//! [`store::ReviewStore`] that persists it through any
//! [`storage::DocumentStorage`] backend. This crate is free of database and
//! CLI dependencies; the other workspace crates depend on it.

pub mod document;
pub mod error;
pub mod id;
pub mod input;
pub mod merge;
pub mod qa;
pub mod storage;
pub mod store;
pub mod views;

pub use error::{Error, Result};
pub use store::ReviewStore;
