//! Encoding and decoding helpers between domain types and the plain columns
//! stored in `player_history`.
//!
//! Timestamps are RFC 3339 strings. Roles and choices are their integer
//! codes. A missing ancestor is the `0 / 0 / ''` sentinel triple.

use advice_core::record::{Ancestor, Choice, HistoryRecord, Role};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Ancestor ────────────────────────────────────────────────────────────────

pub fn encode_ancestor(a: Option<&Ancestor>) -> (i64, i64, String) {
  match a {
    Some(a) => (a.session_id, a.participant_id, a.advice.clone()),
    None => (0, 0, String::new()),
  }
}

/// Any positive ancestor session id means the lineage was recorded.
pub fn decode_ancestor(
  session_id: i64,
  participant_id: i64,
  advice: String,
) -> Option<Ancestor> {
  (session_id > 0).then_some(Ancestor { session_id, participant_id, advice })
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `player_history` row.
pub struct RawHistoryRecord {
  pub id:                      i64,
  pub session_id:              i64,
  pub participant_id:          i64,
  pub role_type:               i64,
  pub choice:                  i64,
  pub advice:                  String,
  pub ancestor_session_id:     i64,
  pub ancestor_participant_id: i64,
  pub ancestor_advice:         String,
  pub recorded_at:             String,
}

impl RawHistoryRecord {
  pub const COLUMNS: &'static str = "id, session_id, participant_id, role_type, \
     choice, advice, ancestor_session_id, ancestor_participant_id, \
     ancestor_advice, recorded_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                      row.get(0)?,
      session_id:              row.get(1)?,
      participant_id:          row.get(2)?,
      role_type:               row.get(3)?,
      choice:                  row.get(4)?,
      advice:                  row.get(5)?,
      ancestor_session_id:     row.get(6)?,
      ancestor_participant_id: row.get(7)?,
      ancestor_advice:         row.get(8)?,
      recorded_at:             row.get(9)?,
    })
  }

  pub fn into_record(self) -> Result<HistoryRecord> {
    Ok(HistoryRecord {
      id:             self.id,
      session_id:     self.session_id,
      participant_id: self.participant_id,
      role:           Role::from_code(self.role_type)?,
      choice:         Choice::from_code(self.choice)?,
      advice:         self.advice,
      ancestor:       decode_ancestor(
        self.ancestor_session_id,
        self.ancestor_participant_id,
        self.ancestor_advice,
      ),
      recorded_at:    decode_dt(&self.recorded_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sentinel_triple_means_no_ancestor() {
    assert_eq!(encode_ancestor(None), (0, 0, String::new()));
    assert_eq!(decode_ancestor(0, 0, String::new()), None);
  }

  #[test]
  fn ancestor_with_empty_advice_survives() {
    let a = Ancestor { session_id: 4, participant_id: 9, advice: String::new() };
    let (s, p, adv) = encode_ancestor(Some(&a));
    assert_eq!(decode_ancestor(s, p, adv), Some(a));
  }

  #[test]
  fn bad_codes_fail_to_decode() {
    let raw = RawHistoryRecord {
      id:                      1,
      session_id:              1,
      participant_id:          1,
      role_type:               7,
      choice:                  1,
      advice:                  String::new(),
      ancestor_session_id:     0,
      ancestor_participant_id: 0,
      ancestor_advice:         String::new(),
      recorded_at:             encode_dt(Utc::now()),
    };
    assert!(matches!(
      raw.into_record(),
      Err(Error::Core(advice_core::Error::UnknownRole(7)))
    ));
  }

  #[test]
  fn bad_timestamp_fails_to_decode() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
