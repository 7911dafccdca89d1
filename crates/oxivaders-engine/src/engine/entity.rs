use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Horizontal travel direction of the invader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Column delta of one step: `-1` for left, `+1` for right.
    #[must_use]
    pub const fn delta(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl Distribution<Direction> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        if rng.random_bool(0.5) {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

/// The player-controlled unit. Its row is always the last grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defender {
    pub column: usize,
}

/// The adversary, descending the grid in a zig-zag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invader {
    pub row: usize,
    pub column: usize,
    pub direction: Direction,
}

/// A missile fired by the defender, travelling upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Missile {
    pub row: usize,
    pub column: usize,
}

/// A bomb released by the invader, travelling downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bomb {
    pub row: usize,
    pub column: usize,
}
