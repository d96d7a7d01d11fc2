//! [`SqliteStore`]: the SQLite implementation of [`HistoryStore`].

use std::path::Path;

use advice_core::{
  record::{HistoryRecord, NewHistoryRecord},
  store::HistoryStore,
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;

use crate::{
  Location, Result,
  encode::{RawHistoryRecord, encode_ancestor, encode_dt},
  schema::{HAS_TABLE, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A history store backed by a single SQLite database.
///
/// The handle is opened by the caller and passed to whoever needs it. Every
/// operation runs as its own transaction on that handle. Cloning is cheap:
/// the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open whatever a resolved database URL points at.
  pub async fn open_location(location: &Location) -> Result<Self> {
    match location {
      Location::Memory => Self::open_in_memory().await,
      Location::File(path) => Self::open(path).await,
    }
  }

  /// Create the schema unless the table is already there.
  async fn init_schema(&self) -> Result<()> {
    let created = self
      .conn
      .call(|conn| {
        let exists = conn
          .query_row(HAS_TABLE, [], |_| Ok(()))
          .optional()?
          .is_some();
        if !exists {
          conn.execute_batch(SCHEMA)?;
        }
        Ok(!exists)
      })
      .await?;

    if created {
      tracing::info!("created player_history table");
    }
    Ok(())
  }

  /// Number of history tables in the database; used to check idempotency.
  #[cfg(test)]
  pub(crate) async fn table_count(&self) -> Result<i64> {
    Ok(
      self
        .conn
        .call(|conn| {
          Ok(conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'player_history'",
            [],
            |r| r.get(0),
          )?)
        })
        .await?,
    )
  }
}

// ─── HistoryStore impl ───────────────────────────────────────────────────────

impl HistoryStore for SqliteStore {
  type Error = crate::Error;

  async fn ensure_schema(&self) -> Result<()> { self.init_schema().await }

  async fn append(&self, input: NewHistoryRecord) -> Result<HistoryRecord> {
    let recorded_at = Utc::now();
    let at_str = encode_dt(recorded_at);
    let (anc_session, anc_participant, anc_advice) =
      encode_ancestor(input.ancestor.as_ref());

    let session_id     = input.session_id;
    let participant_id = input.participant_id;
    let role_code      = input.role.code();
    let choice_code    = input.choice.code();
    let advice         = input.advice.clone();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO player_history (
             session_id, participant_id, role_type, choice, advice,
             ancestor_session_id, ancestor_participant_id, ancestor_advice,
             recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            session_id,
            participant_id,
            role_code,
            choice_code,
            advice,
            anc_session,
            anc_participant,
            anc_advice,
            at_str,
          ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
      })
      .await?;

    tracing::debug!(id, session_id, participant_id, "appended history record");

    Ok(HistoryRecord {
      id,
      session_id:     input.session_id,
      participant_id: input.participant_id,
      role:           input.role,
      choice:         input.choice,
      advice:         input.advice,
      ancestor:       input.ancestor,
      recorded_at,
    })
  }

  async fn fetch_by_session(&self, session_id: i64) -> Result<Vec<HistoryRecord>> {
    let raws: Vec<RawHistoryRecord> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let rows = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {} FROM player_history WHERE session_id = ?1 ORDER BY id",
            RawHistoryRecord::COLUMNS
          ))?;
          stmt
            .query_map(rusqlite::params![session_id], RawHistoryRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHistoryRecord::into_record).collect()
  }
}
