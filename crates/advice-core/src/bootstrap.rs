//! Session bootstrap: roles and ancestors for every participant, once per
//! session, before anybody can submit.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  ancestry::AncestorPool,
  record::{Ancestor, Role},
  roles::assign_roles,
  store::HistoryStore,
};

/// A participant as bootstrap leaves them: a role and, optionally, the
/// ancestor whose advice they will see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
  pub participant_id: i64,
  pub role:           Role,
  pub ancestor:       Option<Ancestor>,
}

/// Assign roles and draw ancestors for `participant_ids`, in order.
///
/// With no pool every participant is left without an ancestor. With a pool,
/// each participant draws one same-role record, which is then gone for the
/// rest of the loop.
pub fn plan<R: Rng + ?Sized>(
  participant_ids: &[i64],
  mut pool: Option<&mut AncestorPool>,
  rng: &mut R,
) -> Result<Vec<Participant>> {
  let roles = assign_roles(participant_ids.len(), rng)?;

  let mut participants = Vec::with_capacity(participant_ids.len());
  for (&participant_id, role) in participant_ids.iter().zip(roles) {
    let ancestor = match pool.as_deref_mut() {
      Some(pool) => {
        let drawn = pool.draw(role, rng)?;
        tracing::debug!(
          participant_id,
          %role,
          ancestor_session_id = drawn.session_id,
          ancestor_participant_id = drawn.participant_id,
          "drew ancestor"
        );
        Some(drawn.to_ancestor())
      }
      None => None,
    };
    participants.push(Participant { participant_id, role, ancestor });
  }

  Ok(participants)
}

/// Load the ancestor pool for `ancestor_session_id`, or `None` when ancestors
/// are disabled (any id `<= 0`).
pub async fn load_pool<S: HistoryStore>(
  store: &S,
  ancestor_session_id: i64,
) -> Result<Option<AncestorPool>> {
  if ancestor_session_id <= 0 {
    return Ok(None);
  }
  let records = store
    .fetch_by_session(ancestor_session_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  tracing::info!(
    ancestor_session_id,
    candidates = records.len(),
    "loaded ancestor pool"
  );
  let pool = AncestorPool::new(ancestor_session_id, records);
  if pool.is_empty() {
    tracing::warn!(ancestor_session_id, "ancestor session has no history");
  }
  Ok(Some(pool))
}

/// Full bootstrap against a store: make sure the schema exists, load the
/// ancestor pool if requested, then [`plan`].
pub async fn bootstrap<S, R>(
  store: &S,
  participant_ids: &[i64],
  ancestor_session_id: i64,
  rng: &mut R,
) -> Result<Vec<Participant>>
where
  S: HistoryStore,
  R: Rng + Send + ?Sized,
{
  store
    .ensure_schema()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let mut pool = load_pool(store, ancestor_session_id).await?;
  let participants = plan(participant_ids, pool.as_mut(), rng)?;

  tracing::info!(
    participants = participants.len(),
    ancestor_session_id,
    "bootstrapped session"
  );
  Ok(participants)
}

#[cfg(test)]
mod tests {
  use std::{collections::HashSet, convert::Infallible, sync::Mutex};

  use chrono::Utc;
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;
  use crate::record::{Choice, HistoryRecord, NewHistoryRecord};

  #[derive(Default)]
  struct MemoryStore {
    rows: Mutex<Vec<HistoryRecord>>,
  }

  impl HistoryStore for MemoryStore {
    type Error = Infallible;

    async fn ensure_schema(&self) -> Result<(), Infallible> { Ok(()) }

    async fn append(&self, r: NewHistoryRecord) -> Result<HistoryRecord, Infallible> {
      let mut rows = self.rows.lock().unwrap();
      let record = HistoryRecord {
        id:             rows.len() as i64 + 1,
        session_id:     r.session_id,
        participant_id: r.participant_id,
        role:           r.role,
        choice:         r.choice,
        advice:         r.advice,
        ancestor:       r.ancestor,
        recorded_at:    Utc::now(),
      };
      rows.push(record.clone());
      Ok(record)
    }

    async fn fetch_by_session(&self, session_id: i64) -> Result<Vec<HistoryRecord>, Infallible> {
      let rows = self.rows.lock().unwrap();
      Ok(rows.iter().filter(|r| r.session_id == session_id).cloned().collect())
    }
  }

  async fn seed_session(store: &MemoryStore, session_id: i64, rows: usize, cols: usize) {
    let roles = std::iter::repeat_n(Role::RowPlayer, rows)
      .chain(std::iter::repeat_n(Role::ColumnPlayer, cols));
    for (i, role) in roles.enumerate() {
      store
        .append(NewHistoryRecord {
          session_id,
          participant_id: i as i64 + 1,
          role,
          choice: Choice::Defect,
          advice: format!("from {i}"),
          ancestor: None,
        })
        .await
        .unwrap();
    }
  }

  #[test]
  fn plan_without_pool_leaves_no_ancestors() {
    let mut rng = StdRng::seed_from_u64(3);
    let ps = plan(&[10, 11, 12, 13], None, &mut rng).unwrap();
    assert_eq!(ps.len(), 4);
    assert!(ps.iter().all(|p| p.ancestor.is_none()));
    assert_eq!(ps.iter().map(|p| p.participant_id).collect::<Vec<_>>(), [10, 11, 12, 13]);
  }

  #[tokio::test]
  async fn disabled_ancestry_skips_the_store() {
    let store = MemoryStore::default();
    seed_session(&store, 1, 2, 2).await;
    assert!(load_pool(&store, 0).await.unwrap().is_none());
    assert!(load_pool(&store, -4).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn unknown_ancestor_session_loads_an_empty_pool() {
    let store = MemoryStore::default();
    seed_session(&store, 1, 1, 1).await;
    let pool = load_pool(&store, 9).await.unwrap().unwrap();
    assert!(pool.is_empty());
    assert_eq!(pool.session_id(), 9);
  }

  #[tokio::test]
  async fn every_participant_gets_a_distinct_same_role_ancestor() {
    let store = MemoryStore::default();
    seed_session(&store, 1, 3, 3).await;

    let mut rng = StdRng::seed_from_u64(11);
    let ids: Vec<i64> = (100..106).collect();
    let ps = bootstrap(&store, &ids, 1, &mut rng).await.unwrap();

    let history = store.fetch_by_session(1).await.unwrap();
    let mut used = HashSet::new();
    for p in &ps {
      let a = p.ancestor.as_ref().expect("ancestor assigned");
      assert_eq!(a.session_id, 1);
      let source = history
        .iter()
        .find(|r| r.participant_id == a.participant_id)
        .unwrap();
      assert_eq!(source.role, p.role);
      assert_eq!(source.advice, a.advice);
      assert!(used.insert(a.participant_id), "ancestor reused");
    }
  }

  #[tokio::test]
  async fn unequal_ancestor_split_exhausts_the_pool() {
    let store = MemoryStore::default();
    seed_session(&store, 1, 3, 1).await;

    let mut rng = StdRng::seed_from_u64(5);
    let err = bootstrap(&store, &[1, 2, 3, 4], 1, &mut rng).await.unwrap_err();
    assert!(matches!(
      err,
      Error::AncestorPoolExhausted { session_id: 1, role: Role::ColumnPlayer }
    ));
  }

  #[tokio::test]
  async fn odd_head_count_fails_bootstrap() {
    let store = MemoryStore::default();
    let mut rng = StdRng::seed_from_u64(5);
    let err = bootstrap(&store, &[1, 2, 3], 0, &mut rng).await.unwrap_err();
    assert!(matches!(err, Error::OddParticipantCount(3)));
  }
}
