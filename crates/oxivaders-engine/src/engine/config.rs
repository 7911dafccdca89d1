use serde::{Deserialize, Serialize};

use crate::EnvConfigError;

/// Immutable parameters of an [`Environment`](super::Environment).
///
/// All values are fixed at construction. Missing fields fall back to [`EnvConfig::default`]
/// when deserializing, so a config file only needs to name the values it changes.
///
/// # Example
///
/// ```
/// use oxivaders_engine::EnvConfig;
///
/// let config = EnvConfig {
///     bomb_probability: 0.0,
///     ..EnvConfig::default()
/// };
/// assert!(config.validate().is_ok());
///
/// let broken = EnvConfig { rows: 1, ..EnvConfig::default() };
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Grid height. The defender lives on the last row.
    pub rows: usize,
    /// Grid width.
    pub cols: usize,
    /// The invader moves on every tick whose step count is a multiple of this value.
    pub invader_step_every: usize,
    /// Rows the invader descends each time it reaches a side wall.
    pub invader_zigzag_drop: usize,
    /// Probability per tick of the invader releasing a bomb while none is airborne.
    pub bomb_probability: f64,
    /// Cells per tick the missile travels upward.
    pub missile_speed: usize,
    /// Cells per tick the bomb travels downward.
    pub bomb_speed: usize,
    /// Hard limit on ticks per episode.
    pub max_steps: usize,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            rows: 12,
            cols: 11,
            invader_step_every: 1,
            invader_zigzag_drop: 1,
            bomb_probability: 0.05,
            missile_speed: 1,
            bomb_speed: 1,
            max_steps: 400,
        }
    }
}

impl EnvConfig {
    /// Checks that the configuration describes a playable grid.
    ///
    /// At least two rows are required: the invader spawns on row 0 or 1 and the defender
    /// occupies the last row.
    pub fn validate(&self) -> Result<(), EnvConfigError> {
        if self.rows < 2 {
            return Err(EnvConfigError::TooFewRows(self.rows));
        }
        if self.cols < 1 {
            return Err(EnvConfigError::TooFewColumns(self.cols));
        }
        if self.invader_step_every == 0 {
            return Err(EnvConfigError::ZeroInvaderCadence);
        }
        if self.missile_speed == 0 {
            return Err(EnvConfigError::ZeroMissileSpeed);
        }
        if self.bomb_speed == 0 {
            return Err(EnvConfigError::ZeroBombSpeed);
        }
        if self.max_steps == 0 {
            return Err(EnvConfigError::ZeroMaxSteps);
        }
        if !(0.0..=1.0).contains(&self.bomb_probability) {
            return Err(EnvConfigError::BombProbabilityOutOfRange(
                self.bomb_probability,
            ));
        }
        Ok(())
    }

    /// Row index of the defender (the last row).
    #[must_use]
    pub const fn defender_row(&self) -> usize {
        self.rows - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(EnvConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_malformed_values() {
        let base = EnvConfig::default();
        let cases = [
            (
                EnvConfig { rows: 0, ..base.clone() },
                EnvConfigError::TooFewRows(0),
            ),
            (
                EnvConfig { cols: 0, ..base.clone() },
                EnvConfigError::TooFewColumns(0),
            ),
            (
                EnvConfig {
                    invader_step_every: 0,
                    ..base.clone()
                },
                EnvConfigError::ZeroInvaderCadence,
            ),
            (
                EnvConfig {
                    missile_speed: 0,
                    ..base.clone()
                },
                EnvConfigError::ZeroMissileSpeed,
            ),
            (
                EnvConfig {
                    bomb_speed: 0,
                    ..base.clone()
                },
                EnvConfigError::ZeroBombSpeed,
            ),
            (
                EnvConfig {
                    max_steps: 0,
                    ..base.clone()
                },
                EnvConfigError::ZeroMaxSteps,
            ),
            (
                EnvConfig {
                    bomb_probability: 1.5,
                    ..base.clone()
                },
                EnvConfigError::BombProbabilityOutOfRange(1.5),
            ),
        ];
        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn test_rejects_nan_probability() {
        let config = EnvConfig {
            bomb_probability: f64::NAN,
            ..EnvConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EnvConfig = serde_json::from_str(r#"{"rows": 20, "bomb_probability": 0.0}"#).unwrap();
        assert_eq!(config.rows, 20);
        assert_eq!(config.bomb_probability, 0.0);
        assert_eq!(config.cols, 11);
        assert_eq!(config.max_steps, 400);
    }
}
