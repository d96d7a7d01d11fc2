//! Handlers for `/sessions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/sessions` | Body: [`CreateBody`]; bootstraps roles and ancestors, returns 201 |
//! | `GET`  | `/sessions/:id` | Live session summary; 404 if never bootstrapped |

use std::collections::HashSet;

use advice_core::{
  bootstrap::bootstrap,
  flow::PlayerState,
  session::LiveSession,
  store::HistoryStore,
};
use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiState};

/// What a client sees of a live session.
#[derive(Debug, Serialize)]
pub struct SessionView {
  pub session_id:          i64,
  pub ancestor_session_id: i64,
  pub players:             Vec<PlayerState>,
  pub complete:            bool,
}

impl From<&LiveSession> for SessionView {
  fn from(s: &LiveSession) -> Self {
    Self {
      session_id:          s.session_id(),
      ancestor_session_id: s.ancestor_session_id(),
      players:             s.players().to_vec(),
      complete:            s.is_complete(),
    }
  }
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub session_id:          i64,
  /// Participants in session order; the count must be even.
  pub participant_ids:     Vec<i64>,
  /// `0` disables ancestors. Omitted means the server default.
  pub ancestor_session_id: Option<i64>,
}

/// `POST /sessions`: bootstrap a session once.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HistoryStore + 'static,
{
  if body.session_id <= 0 {
    return Err(ApiError::BadRequest("session_id must be positive".into()));
  }
  let unique: HashSet<i64> = body.participant_ids.iter().copied().collect();
  if unique.len() != body.participant_ids.len() {
    return Err(ApiError::BadRequest("participant ids must be unique".into()));
  }
  if state.sessions.contains(body.session_id).await {
    return Err(ApiError::Conflict(format!(
      "session {} is already running",
      body.session_id
    )));
  }

  let ancestor_session_id = body
    .ancestor_session_id
    .unwrap_or(state.default_ancestor_session_id);

  let participants = {
    let mut rng = state.rng.lock().await;
    bootstrap(
      state.store.as_ref(),
      &body.participant_ids,
      ancestor_session_id,
      &mut *rng,
    )
    .await?
  };

  let session = LiveSession::new(
    body.session_id,
    ancestor_session_id,
    state.matrix,
    participants,
  );
  let view = SessionView::from(&session);
  state.sessions.insert(session).await?;

  tracing::info!(
    session_id = view.session_id,
    ancestor_session_id,
    players = view.players.len(),
    "session started"
  );
  Ok((StatusCode::CREATED, Json(view)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /sessions/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(session_id): Path<i64>,
) -> Result<Json<SessionView>, ApiError>
where
  S: HistoryStore + 'static,
{
  let entry = state.sessions.get(session_id).await?;
  let session = entry.session.lock().await;
  Ok(Json(SessionView::from(&*session)))
}
