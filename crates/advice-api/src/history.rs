//! Handler for `GET /history/:session_id`.

use advice_core::{record::HistoryRecord, store::HistoryStore};
use axum::{
  Json,
  extract::{Path, State},
};

use crate::{ApiError, ApiState};

/// `GET /history/:session_id`: every record the session wrote, oldest first.
/// Unknown sessions return an empty list.
pub async fn by_session<S>(
  State(state): State<ApiState<S>>,
  Path(session_id): Path<i64>,
) -> Result<Json<Vec<HistoryRecord>>, ApiError>
where
  S: HistoryStore + 'static,
{
  let records = state
    .store
    .fetch_by_session(session_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(records))
}
