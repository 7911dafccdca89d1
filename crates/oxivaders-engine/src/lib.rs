pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid action symbol {symbol} (expected 0..=3)")]
pub struct InvalidActionError {
    pub symbol: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GenomeError {
    #[display("genome must contain at least one action")]
    Empty,
    #[display("locus {index}: {source}")]
    InvalidSymbol {
        index: usize,
        source: InvalidActionError,
    },
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EnvConfigError {
    #[display("grid must have at least 2 rows (got {_0})")]
    TooFewRows(#[error(not(source))] usize),
    #[display("grid must have at least 1 column (got {_0})")]
    TooFewColumns(#[error(not(source))] usize),
    #[display("invader_step_every must be at least 1")]
    ZeroInvaderCadence,
    #[display("missile_speed must be at least 1")]
    ZeroMissileSpeed,
    #[display("bomb_speed must be at least 1")]
    ZeroBombSpeed,
    #[display("max_steps must be at least 1")]
    ZeroMaxSteps,
    #[display("bomb_probability must be within [0, 1] (got {_0})")]
    BombProbabilityOutOfRange(#[error(not(source))] f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    #[display("defender column {column} is outside the grid")]
    DefenderOutOfBounds { column: usize },
    #[display("invader position ({row}, {column}) is outside the grid")]
    InvaderOutOfBounds { row: usize, column: usize },
}
