//! The fixed 2x2 payoff table.

use serde::Serialize;

use crate::record::{Choice, Role};

pub type Payoff = u32;

/// Cells indexed by `[own choice][other's choice]`, each holding one payoff
/// per role. The role picks the element of the pair, never the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayoffMatrix(pub [[[Payoff; 2]; 2]; 2]);

/// The classic Prisoner's Dilemma.
pub const PRISONERS_DILEMMA: PayoffMatrix =
  PayoffMatrix([[[3, 3], [0, 5]], [[5, 0], [1, 1]]]);

impl PayoffMatrix {
  /// The payoff pair stored for `own` against `other`.
  pub fn cell(&self, own: Choice, other: Choice) -> [Payoff; 2] {
    self.0[own.index()][other.index()]
  }

  /// `matrix[own][other][role]`.
  pub fn payoff(&self, role: Role, own: Choice, other: Choice) -> Payoff {
    self.cell(own, other)[role.index()]
  }

  /// The `[own][other]` cell a joint choice lands in, for either role.
  pub fn coordinates(own: Choice, other: Choice) -> (usize, usize) {
    (own.index(), other.index())
  }
}

impl Default for PayoffMatrix {
  fn default() -> Self { PRISONERS_DILEMMA }
}
