//! Shared handler state and the registry of live sessions.

use std::{collections::HashMap, sync::Arc};

use advice_core::{payoff::PayoffMatrix, session::LiveSession};
use rand::rngs::StdRng;
use tokio::sync::{Mutex, Notify, RwLock};

use crate::ApiError;

// ─── Live sessions ───────────────────────────────────────────────────────────

/// One bootstrapped session and the barrier its waiters park on.
#[derive(Debug)]
pub struct LiveEntry {
  pub session:  Mutex<LiveSession>,
  /// Fired every time a pair in this session passes the barrier.
  pub resolved: Notify,
}

/// Every session bootstrapped since the process started, keyed by session id.
#[derive(Debug, Default)]
pub struct SessionRegistry {
  sessions: RwLock<HashMap<i64, Arc<LiveEntry>>>,
}

impl SessionRegistry {
  pub async fn contains(&self, session_id: i64) -> bool {
    self.sessions.read().await.contains_key(&session_id)
  }

  /// Register a freshly bootstrapped session. A session id can only be
  /// bootstrapped once.
  pub async fn insert(&self, session: LiveSession) -> Result<Arc<LiveEntry>, ApiError> {
    let session_id = session.session_id();
    let mut sessions = self.sessions.write().await;
    if sessions.contains_key(&session_id) {
      return Err(ApiError::Conflict(format!(
        "session {session_id} is already running"
      )));
    }
    let entry = Arc::new(LiveEntry {
      session:  Mutex::new(session),
      resolved: Notify::new(),
    });
    sessions.insert(session_id, entry.clone());
    Ok(entry)
  }

  pub async fn get(&self, session_id: i64) -> Result<Arc<LiveEntry>, ApiError> {
    self
      .sessions
      .read()
      .await
      .get(&session_id)
      .cloned()
      .ok_or_else(|| ApiError::NotFound(format!("session {session_id} not found")))
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all API handlers.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  pub sessions: Arc<SessionRegistry>,
  /// Role shuffles and ancestor draws; locked for a whole bootstrap so draws
  /// never interleave.
  pub rng:      Arc<Mutex<StdRng>>,
  pub matrix:   PayoffMatrix,
  /// Used when a bootstrap request does not name an ancestor session.
  pub default_ancestor_session_id: i64,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, rng: StdRng) -> Self {
    Self {
      store,
      sessions: Arc::new(SessionRegistry::default()),
      rng: Arc::new(Mutex::new(rng)),
      matrix: PayoffMatrix::default(),
      default_ancestor_session_id: 0,
    }
  }

  pub fn with_default_ancestor_session(mut self, session_id: i64) -> Self {
    self.default_ancestor_session_id = session_id;
    self
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      sessions: self.sessions.clone(),
      rng:      self.rng.clone(),
      matrix:   self.matrix,
      default_ancestor_session_id: self.default_ancestor_session_id,
    }
  }
}
