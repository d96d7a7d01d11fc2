//! The ancestor pool: records of an earlier session, grouped by role and
//! drawn without replacement.

use std::collections::HashMap;

use rand::Rng;

use crate::{
  Error, Result,
  record::{HistoryRecord, Role},
};

/// A multiset of ancestor candidates keyed by role.
///
/// Every draw removes the record it returns, so no two participants of the
/// same bootstrap can share an ancestor.
#[derive(Debug, Clone, Default)]
pub struct AncestorPool {
  session_id: i64,
  by_role:    HashMap<Role, Vec<HistoryRecord>>,
}

impl AncestorPool {
  pub fn new(
    session_id: i64,
    records: impl IntoIterator<Item = HistoryRecord>,
  ) -> Self {
    let mut by_role: HashMap<Role, Vec<HistoryRecord>> = HashMap::new();
    for record in records {
      by_role.entry(record.role).or_default().push(record);
    }
    Self { session_id, by_role }
  }

  /// The session these candidates were recorded in.
  pub fn session_id(&self) -> i64 { self.session_id }

  /// How many candidates of `role` are still available.
  pub fn remaining(&self, role: Role) -> usize {
    self.by_role.get(&role).map_or(0, Vec::len)
  }

  pub fn is_empty(&self) -> bool {
    self.by_role.values().all(Vec::is_empty)
  }

  /// Remove and return the `index`-th remaining candidate of `role`.
  ///
  /// The order of the remaining candidates is not stable across calls.
  pub fn take(&mut self, role: Role, index: usize) -> Result<HistoryRecord> {
    let session_id = self.session_id;
    match self.by_role.get_mut(&role) {
      Some(candidates) if index < candidates.len() => {
        Ok(candidates.swap_remove(index))
      }
      _ => Err(Error::AncestorPoolExhausted { session_id, role }),
    }
  }

  /// Remove and return a uniformly random candidate of `role`.
  pub fn draw<R: Rng + ?Sized>(
    &mut self,
    role: Role,
    rng: &mut R,
  ) -> Result<HistoryRecord> {
    let remaining = self.remaining(role);
    if remaining == 0 {
      return Err(Error::AncestorPoolExhausted {
        session_id: self.session_id,
        role,
      });
    }
    let index = rng.gen_range(0..remaining);
    self.take(role, index)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use chrono::Utc;
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;
  use crate::record::Choice;

  fn record(id: i64, role: Role) -> HistoryRecord {
    HistoryRecord {
      id,
      session_id: 9,
      participant_id: 100 + id,
      role,
      choice: Choice::Cooperate,
      advice: format!("advice {id}"),
      ancestor: None,
      recorded_at: Utc::now(),
    }
  }

  fn pool() -> AncestorPool {
    AncestorPool::new(9, [
      record(1, Role::RowPlayer),
      record(2, Role::ColumnPlayer),
      record(3, Role::RowPlayer),
      record(4, Role::ColumnPlayer),
      record(5, Role::RowPlayer),
    ])
  }

  #[test]
  fn groups_by_role() {
    let p = pool();
    assert_eq!(p.session_id(), 9);
    assert_eq!(p.remaining(Role::RowPlayer), 3);
    assert_eq!(p.remaining(Role::ColumnPlayer), 2);
    assert!(!p.is_empty());
  }

  #[test]
  fn take_removes_the_candidate() {
    let mut p = pool();
    let first = p.take(Role::ColumnPlayer, 0).unwrap();
    assert_eq!(first.role, Role::ColumnPlayer);
    assert_eq!(p.remaining(Role::ColumnPlayer), 1);

    let second = p.take(Role::ColumnPlayer, 0).unwrap();
    assert_ne!(first.id, second.id);
    assert!(p.take(Role::ColumnPlayer, 0).is_err());
    assert_eq!(p.remaining(Role::RowPlayer), 3);
  }

  #[test]
  fn take_out_of_range_fails() {
    let mut p = pool();
    assert!(matches!(
      p.take(Role::RowPlayer, 3),
      Err(Error::AncestorPoolExhausted { session_id: 9, role: Role::RowPlayer })
    ));
  }

  #[test]
  fn draws_never_repeat_and_match_role() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut p = pool();
    let mut seen = HashSet::new();
    for _ in 0..3 {
      let r = p.draw(Role::RowPlayer, &mut rng).unwrap();
      assert_eq!(r.role, Role::RowPlayer);
      assert!(seen.insert(r.id), "record {} drawn twice", r.id);
    }
    assert!(matches!(
      p.draw(Role::RowPlayer, &mut rng),
      Err(Error::AncestorPoolExhausted { .. })
    ));
  }

  #[test]
  fn empty_pool_is_exhausted_for_every_role() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut p = AncestorPool::new(3, Vec::<HistoryRecord>::new());
    assert!(p.is_empty());
    assert!(p.draw(Role::ColumnPlayer, &mut rng).is_err());
  }
}
