//! Even, shuffled role assignment.

use rand::{Rng, seq::SliceRandom};

use crate::{Error, Result, record::Role};

/// Build `count / 2` row and `count / 2` column tags and shuffle them.
///
/// The i-th tag belongs to the i-th participant in session order. An odd
/// `count` cannot be split evenly and is rejected.
pub fn assign_roles<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Vec<Role>> {
  if count % 2 != 0 {
    return Err(Error::OddParticipantCount(count));
  }

  let half = count / 2;
  let mut roles: Vec<Role> = std::iter::repeat_n(Role::RowPlayer, half)
    .chain(std::iter::repeat_n(Role::ColumnPlayer, half))
    .collect();
  roles.shuffle(rng);
  Ok(roles)
}

#[cfg(test)]
mod tests {
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  #[test]
  fn even_counts_split_in_half() {
    let mut rng = StdRng::seed_from_u64(7);
    for n in (0..=40).step_by(2) {
      let roles = assign_roles(n, &mut rng).unwrap();
      assert_eq!(roles.len(), n);
      let rows = roles.iter().filter(|r| **r == Role::RowPlayer).count();
      assert_eq!(rows, n / 2, "n = {n}");
    }
  }

  #[test]
  fn odd_count_is_rejected() {
    let mut rng = StdRng::seed_from_u64(7);
    assert!(matches!(
      assign_roles(5, &mut rng),
      Err(Error::OddParticipantCount(5))
    ));
  }

  #[test]
  fn order_is_shuffled() {
    // With 20 players, the chance that every seed keeps rows first is nil.
    let unshuffled: Vec<Role> = std::iter::repeat_n(Role::RowPlayer, 10)
      .chain(std::iter::repeat_n(Role::ColumnPlayer, 10))
      .collect();
    let any_shuffled = (0..8).any(|seed| {
      let mut rng = StdRng::seed_from_u64(seed);
      assign_roles(20, &mut rng).unwrap() != unshuffled
    });
    assert!(any_shuffled);
  }
}
