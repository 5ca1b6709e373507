//! Error types for `slr-core`.

use thiserror::Error;

use crate::id::{EntityId, EntityKind};

#[derive(Debug, Error)]
pub enum Error {
  #[error("{entity} not found: {id}")]
  NotFound { entity: EntityKind, id: EntityId },

  #[error("QA question index {0} is out of range (there are {max} questions)", max = crate::qa::QA_QUESTIONS.len())]
  QaQuestionOutOfRange(usize),

  #[error("invalid review document: {0}")]
  InvalidDocument(String),

  #[error("serialization error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
  pub(crate) fn not_found(entity: EntityKind, id: &EntityId) -> Self {
    Self::NotFound { entity, id: id.clone() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
