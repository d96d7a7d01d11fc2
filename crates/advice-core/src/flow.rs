//! The three-page flow as an explicit state machine.
//!
//! ```text
//! Choice --submit--> ResultWait --resolve (both partners)--> Result
//! ```
//!
//! Each transition is a pure function from the current state to the next
//! one. Hosts decide when to persist and when to commit the new state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  bootstrap::Participant,
  payoff::{Payoff, PayoffMatrix},
  record::{Choice, NewHistoryRecord, Role},
};

// ─── Page ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
  /// Shows the matrix and ancestor advice; collects choice and advice.
  Choice,
  /// Barrier until the partner has submitted too.
  ResultWait,
  /// Terminal.
  Result,
}

impl fmt::Display for Page {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Choice => "choice",
      Self::ResultWait => "result wait",
      Self::Result => "result",
    })
  }
}

// ─── Player state ────────────────────────────────────────────────────────────

/// What the participant typed on the choice page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
  pub choice: Choice,
  pub advice: String,
}

/// One participant's progress through the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerState {
  pub session_id:  i64,
  pub participant: Participant,
  pub page:        Page,
  pub submission:  Option<Submission>,
  pub payoff:      Option<Payoff>,
}

/// Template variables for the choice page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoicePageVars {
  pub role:                Role,
  pub role_label:          &'static str,
  pub payoff_matrix:       PayoffMatrix,
  /// `0` when the participant has no ancestor.
  pub ancestor_session_id: i64,
  /// Empty when the participant has no ancestor.
  pub ancestor_advice:     String,
}

/// Template variables for the result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPageVars {
  pub role_label:          &'static str,
  pub choice:              i64,
  pub choice_label:        &'static str,
  pub others_choice:       i64,
  pub others_choice_label: &'static str,
  pub payoff:              Payoff,
  pub others_payoff:       Payoff,
  pub payoff_matrix:       PayoffMatrix,
  /// The `[own][other]` cell the pair landed in.
  pub matrix_choice:       (usize, usize),
}

impl PlayerState {
  pub fn new(session_id: i64, participant: Participant) -> Self {
    Self {
      session_id,
      participant,
      page: Page::Choice,
      submission: None,
      payoff: None,
    }
  }

  pub fn participant_id(&self) -> i64 { self.participant.participant_id }

  pub fn role(&self) -> Role { self.participant.role }

  pub fn choice_page(&self, matrix: &PayoffMatrix) -> ChoicePageVars {
    let ancestor = self.participant.ancestor.as_ref();
    ChoicePageVars {
      role:                self.role(),
      role_label:          self.role().label(),
      payoff_matrix:       *matrix,
      ancestor_session_id: ancestor.map_or(0, |a| a.session_id),
      ancestor_advice:     ancestor.map(|a| a.advice.clone()).unwrap_or_default(),
    }
  }

  /// `Choice -> ResultWait`. Returns the next state and the history record
  /// the host must append before committing it.
  pub fn submit(
    &self,
    choice: Choice,
    advice: String,
  ) -> Result<(PlayerState, NewHistoryRecord)> {
    self.expect_page(Page::Choice, "submit a choice")?;

    let record = NewHistoryRecord {
      session_id: self.session_id,
      participant_id: self.participant_id(),
      role: self.role(),
      choice,
      advice: advice.clone(),
      ancestor: self.participant.ancestor.clone(),
    };

    let next = PlayerState {
      page: Page::ResultWait,
      submission: Some(Submission { choice, advice }),
      ..self.clone()
    };
    Ok((next, record))
  }

  /// `ResultWait -> Result` for both partners at once.
  pub fn resolve(
    a: &PlayerState,
    b: &PlayerState,
    matrix: &PayoffMatrix,
  ) -> Result<(PlayerState, PlayerState)> {
    let a_choice = a.waiting_choice()?;
    let b_choice = b.waiting_choice()?;

    let settle = |p: &PlayerState, own: Choice, other: Choice| PlayerState {
      page: Page::Result,
      payoff: Some(matrix.payoff(p.role(), own, other)),
      ..p.clone()
    };
    Ok((settle(a, a_choice, b_choice), settle(b, b_choice, a_choice)))
  }

  /// Result page variables, given the partner's final state.
  pub fn result_page(
    &self,
    other: &PlayerState,
    matrix: &PayoffMatrix,
  ) -> Result<ResultPageVars> {
    let (own, payoff) = self.settled()?;
    let (theirs, others_payoff) = other.settled()?;

    Ok(ResultPageVars {
      role_label: self.role().label(),
      choice: own.code(),
      choice_label: own.label(),
      others_choice: theirs.code(),
      others_choice_label: theirs.label(),
      payoff,
      others_payoff,
      payoff_matrix: *matrix,
      matrix_choice: PayoffMatrix::coordinates(own, theirs),
    })
  }

  fn expect_page(&self, page: Page, action: &'static str) -> Result<()> {
    if self.page == page {
      Ok(())
    } else {
      Err(Error::InvalidTransition { page: self.page, action })
    }
  }

  fn waiting_choice(&self) -> Result<Choice> {
    self.expect_page(Page::ResultWait, "compute payoffs")?;
    self
      .submission
      .as_ref()
      .map(|s| s.choice)
      .ok_or(Error::InvalidTransition { page: self.page, action: "compute payoffs" })
  }

  fn settled(&self) -> Result<(Choice, Payoff)> {
    self.expect_page(Page::Result, "show the result")?;
    match (&self.submission, self.payoff) {
      (Some(s), Some(payoff)) => Ok((s.choice, payoff)),
      _ => Err(Error::InvalidTransition { page: self.page, action: "show the result" }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{payoff::PRISONERS_DILEMMA, record::Ancestor};

  fn player(id: i64, role: Role, ancestor: Option<Ancestor>) -> PlayerState {
    PlayerState::new(
      7,
      Participant { participant_id: id, role, ancestor },
    )
  }

  #[test]
  fn choice_page_without_ancestor_uses_sentinels() {
    let p = player(1, Role::RowPlayer, None);
    let vars = p.choice_page(&PRISONERS_DILEMMA);
    assert_eq!(vars.role_label, "Row Player");
    assert_eq!(vars.ancestor_session_id, 0);
    assert_eq!(vars.ancestor_advice, "");
  }

  #[test]
  fn choice_page_shows_ancestor_advice() {
    let p = player(1, Role::ColumnPlayer, Some(Ancestor {
      session_id:     3,
      participant_id: 40,
      advice:         "always cooperate".into(),
    }));
    let vars = p.choice_page(&PRISONERS_DILEMMA);
    assert_eq!(vars.role, Role::ColumnPlayer);
    assert_eq!(vars.ancestor_session_id, 3);
    assert_eq!(vars.ancestor_advice, "always cooperate");
  }

  #[test]
  fn submit_moves_to_wait_and_builds_the_record() {
    let ancestor = Ancestor { session_id: 2, participant_id: 5, advice: "defect".into() };
    let p = player(1, Role::RowPlayer, Some(ancestor.clone()));

    let (next, record) = p.submit(Choice::Cooperate, "trust them".into()).unwrap();
    assert_eq!(next.page, Page::ResultWait);
    assert_eq!(record.session_id, 7);
    assert_eq!(record.participant_id, 1);
    assert_eq!(record.role, Role::RowPlayer);
    assert_eq!(record.choice, Choice::Cooperate);
    assert_eq!(record.advice, "trust them");
    assert_eq!(record.ancestor, Some(ancestor));
    // The input state is untouched.
    assert_eq!(p.page, Page::Choice);
  }

  #[test]
  fn second_submit_is_rejected() {
    let p = player(1, Role::RowPlayer, None);
    let (next, _) = p.submit(Choice::Defect, String::new()).unwrap();
    assert!(matches!(
      next.submit(Choice::Cooperate, String::new()),
      Err(Error::InvalidTransition { page: Page::ResultWait, .. })
    ));
  }

  #[test]
  fn resolve_requires_both_partners() {
    let row = player(1, Role::RowPlayer, None);
    let col = player(2, Role::ColumnPlayer, None);
    let (row, _) = row.submit(Choice::Defect, String::new()).unwrap();
    assert!(PlayerState::resolve(&row, &col, &PRISONERS_DILEMMA).is_err());
  }

  #[test]
  fn resolve_and_show_results() {
    let row = player(1, Role::RowPlayer, None);
    let col = player(2, Role::ColumnPlayer, None);
    let (row, _) = row.submit(Choice::Defect, String::new()).unwrap();
    let (col, _) = col.submit(Choice::Cooperate, String::new()).unwrap();

    let (row, col) = PlayerState::resolve(&row, &col, &PRISONERS_DILEMMA).unwrap();
    assert_eq!(row.page, Page::Result);
    // matrix[D][C][0] and matrix[C][D][1].
    assert_eq!(row.payoff, Some(5));
    assert_eq!(col.payoff, Some(5));

    let vars = col.result_page(&row, &PRISONERS_DILEMMA).unwrap();
    assert_eq!(vars.role_label, "Column Player");
    assert_eq!(vars.choice_label, "Cooperate");
    assert_eq!(vars.others_choice_label, "Defect");
    assert_eq!(vars.choice, 1);
    assert_eq!(vars.others_choice, 2);
    assert_eq!((vars.payoff, vars.others_payoff), (5, 5));
    assert_eq!(vars.matrix_choice, (0, 1));

    let vars = row.result_page(&col, &PRISONERS_DILEMMA).unwrap();
    assert_eq!(vars.matrix_choice, (1, 0));
  }

  #[test]
  fn result_page_before_resolution_fails() {
    let row = player(1, Role::RowPlayer, None);
    let col = player(2, Role::ColumnPlayer, None);
    assert!(row.result_page(&col, &PRISONERS_DILEMMA).is_err());
  }
}
