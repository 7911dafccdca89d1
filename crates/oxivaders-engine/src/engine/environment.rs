use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{EnvConfigError, PlacementError, core::Action};

use super::{
    config::EnvConfig,
    entity::{Bomb, Defender, Direction, Invader, Missile},
    grid::Grid,
};

/// Result of an episode-ending collision, as reported by [`Environment::step`].
///
/// When several conditions occur on the same tick only one is reported, in the priority order
/// `HitInvader` > `HitDefender` > `Landed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::IsVariant)]
pub enum Outcome {
    #[default]
    None,
    /// The missile struck the invader.
    HitInvader,
    /// A bomb struck the defender.
    HitDefender,
    /// The invader reached the defender's row.
    Landed,
}

impl Outcome {
    /// Integer outcome code: `+1` hit invader, `-1` hit defender, `-2` landed, `0` none.
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Outcome::None => 0,
            Outcome::HitInvader => 1,
            Outcome::HitDefender => -1,
            Outcome::Landed => -2,
        }
    }
}

/// Signals emitted by a single [`Environment::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// The episode has terminated (on this tick or earlier).
    pub done: bool,
    /// An active missile shares the invader's row after this tick.
    pub row_aligned: bool,
    /// `|missile column - invader column|` when row-aligned, otherwise zero.
    pub horizontal_distance: usize,
    /// Collision outcome of this tick.
    pub outcome: Outcome,
}

impl StepReport {
    /// Report returned when stepping an already terminated environment.
    pub const SATURATED: Self = Self {
        done: true,
        row_aligned: false,
        horizontal_distance: 0,
        outcome: Outcome::None,
    };
}

#[derive(Debug, Clone, Copy, Default)]
struct Collisions {
    hit_invader: bool,
    hit_defender: bool,
    landed: bool,
}

impl Collisions {
    fn any(self) -> bool {
        self.hit_invader || self.hit_defender || self.landed
    }

    fn outcome(self) -> Outcome {
        if self.hit_invader {
            Outcome::HitInvader
        } else if self.hit_defender {
            Outcome::HitDefender
        } else if self.landed {
            Outcome::Landed
        } else {
            Outcome::None
        }
    }
}

/// Deterministic grid combat simulation between a defender and a single invader.
///
/// # Rules
///
/// - The defender sits on the last row and moves one column per `Left`/`Right` action,
///   clamped to the grid. `Shoot` launches a missile from the cell above the defender, but
///   only while no other missile is airborne.
/// - The invader moves horizontally on every `invader_step_every`-th tick. When the next
///   column would leave the grid it reverses and descends `invader_zigzag_drop` rows instead.
/// - While no bomb is airborne the invader releases one with probability `bomb_probability`
///   per tick, from the cell below it.
/// - The missile travels up `missile_speed` cells per tick and the bomb travels down
///   `bomb_speed` cells per tick; each disappears when it leaves the grid.
/// - An episode ends when the missile hits the invader, a bomb hits the defender, the invader
///   reaches the last row, or `max_steps` ticks have elapsed.
///
/// All randomness comes from a `Pcg32` stream owned by the environment and seeded at
/// construction, so an environment replays identically for identical seeds and actions.
///
/// # Example
///
/// ```
/// use oxivaders_engine::{Action, EnvConfig, Environment};
///
/// let mut env = Environment::new(EnvConfig::default(), 42).unwrap();
/// loop {
///     let report = env.step(Action::Shoot);
///     if report.done {
///         break;
///     }
/// }
/// assert!(env.is_terminated());
/// assert!(env.steps() <= env.config().max_steps);
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    config: EnvConfig,
    rng: Pcg32,
    defender: Defender,
    invader: Invader,
    missile: Option<Missile>,
    bomb: Option<Bomb>,
    steps: usize,
    terminated: bool,
    grid: Grid,
}

impl Environment {
    /// Creates an environment and starts its first episode with [`Self::reset`].
    ///
    /// The configuration is validated here; no configuration error can surface later.
    pub fn new(config: EnvConfig, seed: u64) -> Result<Self, EnvConfigError> {
        config.validate()?;
        let grid = Grid::new(config.rows, config.cols);
        let mut env = Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
            defender: Defender { column: 0 },
            invader: Invader {
                row: 0,
                column: 0,
                direction: Direction::Right,
            },
            missile: None,
            bomb: None,
            steps: 0,
            terminated: false,
            grid,
        };
        env.reset();
        Ok(env)
    }

    #[must_use]
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    #[must_use]
    pub fn defender(&self) -> &Defender {
        &self.defender
    }

    #[must_use]
    pub fn defender_row(&self) -> usize {
        self.config.defender_row()
    }

    #[must_use]
    pub fn invader(&self) -> &Invader {
        &self.invader
    }

    #[must_use]
    pub fn missile(&self) -> Option<&Missile> {
        self.missile.as_ref()
    }

    #[must_use]
    pub fn bomb(&self) -> Option<&Bomb> {
        self.bomb.as_ref()
    }

    /// Ticks elapsed in the current episode.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Starts a fresh episode, re-randomizing both the defender and the invader.
    pub fn reset(&mut self) {
        self.defender = Defender {
            column: self.rng.random_range(0..self.config.cols),
        };
        self.start_episode();
    }

    /// Starts a fresh episode, re-randomizing only the invader.
    ///
    /// The defender keeps the column it ended the previous episode on.
    pub fn reseed_episode(&mut self) {
        self.start_episode();
    }

    /// Places the defender and the invader at explicit positions and restarts the episode.
    ///
    /// Projectiles are cleared and the step counter is zeroed. Intended for scripted
    /// scenarios; training episodes should use [`Self::reseed_episode`].
    pub fn place(&mut self, defender_column: usize, invader: Invader) -> Result<(), PlacementError> {
        if defender_column >= self.config.cols {
            return Err(PlacementError::DefenderOutOfBounds {
                column: defender_column,
            });
        }
        if invader.row >= self.config.rows || invader.column >= self.config.cols {
            return Err(PlacementError::InvaderOutOfBounds {
                row: invader.row,
                column: invader.column,
            });
        }
        self.defender = Defender {
            column: defender_column,
        };
        self.invader = invader;
        self.clear_episode_state();
        Ok(())
    }

    /// Advances the simulation by one tick with the defender taking `action`.
    ///
    /// Stepping a terminated environment is not an error: it returns
    /// [`StepReport::SATURATED`] and leaves the state untouched.
    pub fn step(&mut self, action: Action) -> StepReport {
        if self.terminated {
            return StepReport::SATURATED;
        }

        self.steps += 1;
        self.apply_action(action);

        if self.steps % self.config.invader_step_every == 0 {
            self.move_invader();
        }
        self.maybe_drop_bomb();
        self.move_projectiles();

        let collisions = self.resolve_collisions();
        self.project();

        self.terminated = collisions.any() || self.steps >= self.config.max_steps;
        if self.terminated {
            log::trace!(
                "episode terminated after {} steps with {:?}",
                self.steps,
                collisions.outcome()
            );
        }

        let (row_aligned, horizontal_distance) = match self.missile {
            Some(missile) if missile.row == self.invader.row => {
                (true, missile.column.abs_diff(self.invader.column))
            }
            _ => (false, 0),
        };

        StepReport {
            done: self.terminated,
            row_aligned,
            horizontal_distance,
            outcome: collisions.outcome(),
        }
    }

    fn start_episode(&mut self) {
        self.invader = Invader {
            row: self.rng.random_range(0..2),
            column: self.rng.random_range(0..self.config.cols),
            direction: self.rng.random(),
        };
        self.clear_episode_state();
    }

    fn clear_episode_state(&mut self) {
        self.missile = None;
        self.bomb = None;
        self.steps = 0;
        self.terminated = false;
        self.project();
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::Stay => {}
            Action::Left => {
                self.defender.column = self.defender.column.saturating_sub(1);
            }
            Action::Right => {
                self.defender.column = usize::min(self.defender.column + 1, self.config.cols - 1);
            }
            Action::Shoot => {
                if self.missile.is_none() {
                    self.missile = Some(Missile {
                        row: self.defender_row() - 1,
                        column: self.defender.column,
                    });
                }
            }
        }
    }

    fn move_invader(&mut self) {
        let next_column = self
            .invader
            .column
            .checked_add_signed(self.invader.direction.delta())
            .filter(|&column| column < self.config.cols);
        match next_column {
            Some(column) => self.invader.column = column,
            None => {
                // The row is clamped so the projection stays on the grid; reaching the last
                // row counts as landing.
                self.invader.row = usize::min(
                    self.invader.row + self.config.invader_zigzag_drop,
                    self.config.rows - 1,
                );
                self.invader.direction = self.invader.direction.flipped();
            }
        }
    }

    fn maybe_drop_bomb(&mut self) {
        if self.bomb.is_some() {
            return;
        }
        if self.rng.random_bool(self.config.bomb_probability) {
            let row = self.invader.row + 1;
            if row < self.config.rows {
                self.bomb = Some(Bomb {
                    row,
                    column: self.invader.column,
                });
            }
        }
    }

    fn move_projectiles(&mut self) {
        self.missile = self.missile.and_then(|missile| {
            let row = missile.row.checked_sub(self.config.missile_speed)?;
            Some(Missile { row, ..missile })
        });
        self.bomb = self.bomb.and_then(|bomb| {
            let row = bomb.row + self.config.bomb_speed;
            (row < self.config.rows).then_some(Bomb { row, ..bomb })
        });
    }

    fn resolve_collisions(&mut self) -> Collisions {
        let mut collisions = Collisions::default();

        if self
            .missile
            .is_some_and(|m| m.row == self.invader.row && m.column == self.invader.column)
        {
            collisions.hit_invader = true;
            self.missile = None;
        }

        let defender_row = self.defender_row();
        if self
            .bomb
            .is_some_and(|b| b.row == defender_row && b.column == self.defender.column)
        {
            collisions.hit_defender = true;
            self.bomb = None;
        }

        if self.invader.row >= defender_row {
            collisions.landed = true;
        }

        collisions
    }

    fn project(&mut self) {
        self.grid.project(
            self.config.defender_row(),
            &self.defender,
            &self.invader,
            self.missile.as_ref(),
            self.bomb.as_ref(),
        );
    }
}
