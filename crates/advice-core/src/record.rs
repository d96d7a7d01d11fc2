//! History records: the persisted snapshot of one participant's round.
//!
//! A record is written once, when the participant leaves the choice page, and
//! never updated. Records from earlier sessions become the ancestor pool for
//! later ones.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Role ────────────────────────────────────────────────────────────────────

/// Which axis of the payoff matrix a participant's choice indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  RowPlayer,
  ColumnPlayer,
}

impl Role {
  /// Integer code stored in the `role_type` column.
  pub fn code(self) -> i64 {
    match self {
      Self::RowPlayer => 1,
      Self::ColumnPlayer => 2,
    }
  }

  pub fn from_code(code: i64) -> Result<Self> {
    match code {
      1 => Ok(Self::RowPlayer),
      2 => Ok(Self::ColumnPlayer),
      other => Err(Error::UnknownRole(other)),
    }
  }

  /// Position of this role's payoff within a matrix cell.
  pub fn index(self) -> usize {
    match self {
      Self::RowPlayer => 0,
      Self::ColumnPlayer => 1,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::RowPlayer => "Row Player",
      Self::ColumnPlayer => "Column Player",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

// ─── Choice ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
  Cooperate,
  Defect,
}

impl Choice {
  /// Integer code stored in the `choice` column.
  pub fn code(self) -> i64 {
    match self {
      Self::Cooperate => 1,
      Self::Defect => 2,
    }
  }

  pub fn from_code(code: i64) -> Result<Self> {
    match code {
      1 => Ok(Self::Cooperate),
      2 => Ok(Self::Defect),
      other => Err(Error::UnknownChoice(other)),
    }
  }

  pub fn index(self) -> usize {
    match self {
      Self::Cooperate => 0,
      Self::Defect => 1,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Cooperate => "Cooperate",
      Self::Defect => "Defect",
    }
  }
}

impl fmt::Display for Choice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

// ─── Ancestor ────────────────────────────────────────────────────────────────

/// The earlier participant whose advice is shown to a current one.
///
/// Lineage is all-or-nothing: a player either has every ancestor field or
/// none, which is why it is carried as `Option<Ancestor>` rather than three
/// independent columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ancestor {
  pub session_id:     i64,
  pub participant_id: i64,
  pub advice:         String,
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::HistoryStore::append`]. `id` and `recorded_at`
/// are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryRecord {
  pub session_id:     i64,
  pub participant_id: i64,
  pub role:           Role,
  pub choice:         Choice,
  pub advice:         String,
  pub ancestor:       Option<Ancestor>,
}

/// One stored row of `player_history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
  pub id:             i64,
  pub session_id:     i64,
  pub participant_id: i64,
  pub role:           Role,
  pub choice:         Choice,
  pub advice:         String,
  pub ancestor:       Option<Ancestor>,
  pub recorded_at:    DateTime<Utc>,
}

impl HistoryRecord {
  /// This record seen as somebody else's ancestor.
  pub fn to_ancestor(&self) -> Ancestor {
    Ancestor {
      session_id:     self.session_id,
      participant_id: self.participant_id,
      advice:         self.advice.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn codes_match_stored_integers() {
    assert_eq!(Role::RowPlayer.code(), 1);
    assert_eq!(Role::ColumnPlayer.code(), 2);
    assert_eq!(Choice::Cooperate.code(), 1);
    assert_eq!(Choice::Defect.code(), 2);
    assert_eq!(Role::from_code(2).unwrap(), Role::ColumnPlayer);
    assert_eq!(Choice::from_code(1).unwrap(), Choice::Cooperate);
  }

  #[test]
  fn unknown_codes_are_rejected() {
    assert!(matches!(Role::from_code(0), Err(Error::UnknownRole(0))));
    assert!(matches!(Choice::from_code(3), Err(Error::UnknownChoice(3))));
  }
}
