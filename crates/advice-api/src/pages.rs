//! Handlers for the three pages of a participant's flow.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/sessions/:sid/players/:pid/choice` | Choice page variables |
//! | `POST` | `/sessions/:sid/players/:pid/choice` | Body: [`SubmitBody`]; appends history |
//! | `GET`  | `/sessions/:sid/players/:pid/result` | 200 result variables, 202 while waiting; `?wait_ms=` blocks |

use std::time::Duration;

use advice_core::{
  flow::{ChoicePageVars, Page},
  record::Choice,
  store::HistoryStore,
};
use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::{ApiError, ApiState};

/// Upper bound on how long a result request may park on the barrier.
pub const MAX_WAIT: Duration = Duration::from_secs(30);

// ─── Choice page ──────────────────────────────────────────────────────────────

/// `GET /sessions/:sid/players/:pid/choice`
pub async fn choice<S>(
  State(state): State<ApiState<S>>,
  Path((session_id, participant_id)): Path<(i64, i64)>,
) -> Result<Json<ChoicePageVars>, ApiError>
where
  S: HistoryStore + 'static,
{
  let entry = state.sessions.get(session_id).await?;
  let session = entry.session.lock().await;
  let vars = session.player(participant_id)?.choice_page(session.matrix());
  Ok(Json(vars))
}

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  pub choice: Choice,
  #[serde(default)]
  pub advice: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
  /// Where the participant is now: `result_wait`, or `result` if the partner
  /// had already submitted.
  pub page: Page,
}

/// `POST /sessions/:sid/players/:pid/choice`
///
/// The history record is appended before the new state is committed, so a
/// failed write leaves the participant on the choice page.
pub async fn submit<S>(
  State(state): State<ApiState<S>>,
  Path((session_id, participant_id)): Path<(i64, i64)>,
  Json(body): Json<SubmitBody>,
) -> Result<Json<SubmitResponse>, ApiError>
where
  S: HistoryStore + 'static,
{
  let entry = state.sessions.get(session_id).await?;
  let mut session = entry.session.lock().await;

  let (next, record) =
    session.prepare_submission(participant_id, body.choice, body.advice)?;
  state.store.append(record).await.map_err(ApiError::store)?;
  session.commit(next)?;

  tracing::info!(session_id, participant_id, choice = %body.choice, "choice submitted");

  if session.try_resolve(participant_id)? {
    entry.resolved.notify_waiters();
  }

  let page = session.player(participant_id)?.page;
  Ok(Json(SubmitResponse { page }))
}

// ─── Result page ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ResultParams {
  /// How long to wait on the barrier before answering 202. Capped at
  /// [`MAX_WAIT`].
  pub wait_ms: Option<u64>,
}

/// `GET /sessions/:sid/players/:pid/result[?wait_ms=N]`
pub async fn result<S>(
  State(state): State<ApiState<S>>,
  Path((session_id, participant_id)): Path<(i64, i64)>,
  Query(params): Query<ResultParams>,
) -> Result<Response, ApiError>
where
  S: HistoryStore + 'static,
{
  let entry = state.sessions.get(session_id).await?;
  let wait = Duration::from_millis(params.wait_ms.unwrap_or(0)).min(MAX_WAIT);
  let deadline = Instant::now() + wait;

  loop {
    // Register interest before looking, so a resolution in between is not
    // missed.
    let notified = entry.resolved.notified();

    if let Some(vars) = entry.session.lock().await.result_page(participant_id)? {
      return Ok(Json(vars).into_response());
    }

    let now = Instant::now();
    if now >= deadline {
      break;
    }
    tracing::debug!(session_id, participant_id, "waiting for partner");
    let _ = tokio::time::timeout(deadline - now, notified).await;
  }

  Ok(
    (
      StatusCode::ACCEPTED,
      Json(SubmitResponse { page: Page::ResultWait }),
    )
      .into_response(),
  )
}
