//! A live session: every participant's flow state plus who plays whom.

use std::collections::HashMap;

use crate::{
  Error, Result,
  bootstrap::Participant,
  flow::{Page, PlayerState, ResultPageVars},
  payoff::PayoffMatrix,
  record::{Choice, NewHistoryRecord, Role},
};

/// Pair the i-th row player with the i-th column player, in session order.
///
/// Surplus players of either role (only possible with an uneven split) are
/// left unpaired.
pub fn pair_up(participants: &[Participant]) -> Vec<(i64, i64)> {
  let of_role = |role: Role| {
    participants
      .iter()
      .filter(move |p| p.role == role)
      .map(|p| p.participant_id)
  };
  of_role(Role::RowPlayer)
    .zip(of_role(Role::ColumnPlayer))
    .collect()
}

#[derive(Debug, Clone)]
pub struct LiveSession {
  session_id:          i64,
  ancestor_session_id: i64,
  matrix:              PayoffMatrix,
  players:             Vec<PlayerState>,
  index:               HashMap<i64, usize>,
  partners:            HashMap<i64, i64>,
}

impl LiveSession {
  pub fn new(
    session_id: i64,
    ancestor_session_id: i64,
    matrix: PayoffMatrix,
    participants: Vec<Participant>,
  ) -> Self {
    let mut partners = HashMap::new();
    for (row, column) in pair_up(&participants) {
      partners.insert(row, column);
      partners.insert(column, row);
    }

    let players: Vec<PlayerState> = participants
      .into_iter()
      .map(|p| PlayerState::new(session_id, p))
      .collect();
    let index = players
      .iter()
      .enumerate()
      .map(|(i, p)| (p.participant_id(), i))
      .collect();

    Self { session_id, ancestor_session_id, matrix, players, index, partners }
  }

  pub fn session_id(&self) -> i64 { self.session_id }

  pub fn ancestor_session_id(&self) -> i64 { self.ancestor_session_id }

  pub fn matrix(&self) -> &PayoffMatrix { &self.matrix }

  pub fn players(&self) -> &[PlayerState] { &self.players }

  pub fn player(&self, participant_id: i64) -> Result<&PlayerState> {
    self
      .index
      .get(&participant_id)
      .map(|&i| &self.players[i])
      .ok_or(Error::ParticipantNotFound(participant_id))
  }

  pub fn partner(&self, participant_id: i64) -> Result<&PlayerState> {
    self.player(participant_id)?;
    let other = self
      .partners
      .get(&participant_id)
      .ok_or(Error::NotPaired(participant_id))?;
    self.player(*other)
  }

  /// Run the submit transition without committing it.
  pub fn prepare_submission(
    &self,
    participant_id: i64,
    choice: Choice,
    advice: String,
  ) -> Result<(PlayerState, NewHistoryRecord)> {
    self.player(participant_id)?.submit(choice, advice)
  }

  /// Replace a participant's state with the outcome of a transition.
  pub fn commit(&mut self, next: PlayerState) -> Result<()> {
    let id = next.participant_id();
    let &i = self.index.get(&id).ok_or(Error::ParticipantNotFound(id))?;
    self.players[i] = next;
    Ok(())
  }

  /// Pass the barrier if both partners are waiting. Returns whether the
  /// pair was resolved by this call.
  pub fn try_resolve(&mut self, participant_id: i64) -> Result<bool> {
    let me = self.player(participant_id)?;
    let other = self.partner(participant_id)?;
    if me.page != Page::ResultWait || other.page != Page::ResultWait {
      return Ok(false);
    }

    let (me, other) = PlayerState::resolve(me, other, &self.matrix)?;
    tracing::info!(
      session_id = self.session_id,
      participant_id,
      partner_id = other.participant_id(),
      payoff = ?me.payoff,
      partner_payoff = ?other.payoff,
      "pair resolved"
    );
    self.commit(me)?;
    self.commit(other)?;
    Ok(true)
  }

  /// Result variables, or `None` while still behind the barrier.
  pub fn result_page(&self, participant_id: i64) -> Result<Option<ResultPageVars>> {
    let me = self.player(participant_id)?;
    match me.page {
      Page::ResultWait => Ok(None),
      Page::Choice => Err(Error::InvalidTransition {
        page:   Page::Choice,
        action: "show the result",
      }),
      Page::Result => {
        let other = self.partner(participant_id)?;
        me.result_page(other, &self.matrix).map(Some)
      }
    }
  }

  /// Whether every paired participant has reached the result page.
  pub fn is_complete(&self) -> bool {
    self
      .players
      .iter()
      .filter(|p| self.partners.contains_key(&p.participant_id()))
      .all(|p| p.page == Page::Result)
  }
}
