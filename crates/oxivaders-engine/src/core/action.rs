use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::InvalidActionError;

/// An action the defender can take on a single tick.
///
/// The alphabet is fixed at four symbols, each with a stable small-integer encoding used by
/// genome files and by any external input mapping:
///
/// | Symbol  | Code |
/// |---------|------|
/// | `Stay`  | 0    |
/// | `Left`  | 1    |
/// | `Right` | 2    |
/// | `Shoot` | 3    |
///
/// # Example
///
/// ```
/// use oxivaders_engine::Action;
///
/// assert_eq!(Action::try_from(3), Ok(Action::Shoot));
/// assert_eq!(u8::from(Action::Left), 1);
/// assert!(Action::try_from(4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Action {
    #[default]
    Stay = 0,
    Left = 1,
    Right = 2,
    Shoot = 3,
}

impl Action {
    /// Number of symbols in the action alphabet (4).
    pub const LEN: usize = 4;

    /// All actions in code order.
    pub const ALL: [Action; Self::LEN] = [Action::Stay, Action::Left, Action::Right, Action::Shoot];

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Action::Stay => '.',
            Action::Left => '<',
            Action::Right => '>',
            Action::Shoot => '^',
        }
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        action.code()
    }
}

impl TryFrom<u8> for Action {
    type Error = InvalidActionError;

    fn try_from(symbol: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(symbol))
            .copied()
            .ok_or(InvalidActionError { symbol })
    }
}

impl Distribution<Action> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        match rng.random_range(0..=3) {
            0 => Action::Stay,
            1 => Action::Left,
            2 => Action::Right,
            _ => Action::Shoot,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_codes_match_alphabet_order() {
        for (i, action) in Action::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(action.code()), i);
            assert_eq!(Action::try_from(action.code()), Ok(action));
        }
    }

    #[test]
    fn test_rejects_out_of_range_symbol() {
        assert_eq!(Action::try_from(4), Err(InvalidActionError { symbol: 4 }));
        assert_eq!(
            Action::try_from(255),
            Err(InvalidActionError { symbol: 255 })
        );
    }

    #[test]
    fn test_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Action::Shoot).unwrap(), "3");
        let action: Action = serde_json::from_str("2").unwrap();
        assert_eq!(action, Action::Right);
        assert!(serde_json::from_str::<Action>("7").is_err());
    }

    #[test]
    fn test_uniform_sampling_covers_alphabet() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut counts = [0usize; Action::LEN];
        for _ in 0..4000 {
            let action: Action = rng.random();
            counts[usize::from(action.code())] += 1;
        }
        for count in counts {
            assert!((800..1200).contains(&count), "count {count} far from 1000");
        }
    }
}
