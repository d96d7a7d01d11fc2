//! The `HistoryStore` trait.
//!
//! Implemented by storage backends (e.g. `advice-store-sqlite`). Bootstrap
//! and the HTTP layer depend on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::record::{HistoryRecord, NewHistoryRecord};

/// Append-only repository of completed rounds.
///
/// Every method is its own unit of work: nothing spans calls, and nothing is
/// retried. All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait HistoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the history table if it does not exist yet. Safe to call any
  /// number of times.
  fn ensure_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Persist one record and return it with its store-assigned fields.
  fn append(
    &self,
    record: NewHistoryRecord,
  ) -> impl Future<Output = Result<HistoryRecord, Self::Error>> + Send + '_;

  /// All records written by `session_id`, oldest first. Empty if the session
  /// never recorded anything.
  fn fetch_by_session(
    &self,
    session_id: i64,
  ) -> impl Future<Output = Result<Vec<HistoryRecord>, Self::Error>> + Send + '_;
}
