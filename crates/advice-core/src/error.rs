//! Error types for `advice-core`.

use thiserror::Error;

use crate::{flow::Page, record::Role};

#[derive(Debug, Error)]
pub enum Error {
  /// Roles are split evenly, so a session needs an even head count.
  #[error("cannot split {0} participants evenly into row and column players")]
  OddParticipantCount(usize),

  #[error("ancestor session {session_id} has no {role} left to draw")]
  AncestorPoolExhausted { session_id: i64, role: Role },

  #[error("unknown role code: {0}")]
  UnknownRole(i64),

  #[error("unknown choice code: {0}")]
  UnknownChoice(i64),

  #[error("cannot {action} while on the {page} page")]
  InvalidTransition { page: Page, action: &'static str },

  #[error("participant not found: {0}")]
  ParticipantNotFound(i64),

  #[error("participant {0} has no partner")]
  NotPaired(i64),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
