//! Simulation state and the per-tick state machine.
//!
//! This module implements the defender-versus-invader grid simulation:
//!
//! - [`EnvConfig`] - Immutable environment parameters (grid size, speeds, probabilities)
//! - [`Environment`] - Owns entity state and advances it one tick per [`Environment::step`]
//! - [`StepReport`] / [`Outcome`] - Per-tick signals used to compute fitness
//! - [`Grid`] - Cell projection of the entities, rebuilt after every transition
//! - [`Defender`], [`Invader`], [`Missile`], [`Bomb`] - Plain entity records
//!
//! # Episode Flow
//!
//! 1. Construct an [`Environment`] with a configuration and a seed
//! 2. Start an episode with [`Environment::reseed_episode`] (or [`Environment::reset`])
//! 3. Call [`Environment::step`] once per tick until the report says `done`
//! 4. Repeat from step 2 for further episodes
//!
//! # Example
//!
//! ```
//! use oxivaders_engine::{Action, EnvConfig, Environment, Outcome};
//!
//! let mut env = Environment::new(EnvConfig::default(), 7).unwrap();
//! let mut hits = 0;
//! for _ in 0..3 {
//!     env.reseed_episode();
//!     while !env.is_terminated() {
//!         if env.step(Action::Shoot).outcome == Outcome::HitInvader {
//!             hits += 1;
//!         }
//!     }
//! }
//! assert!(hits <= 3);
//! ```

pub use self::{config::*, entity::*, environment::*, grid::*};

mod config;
mod entity;
mod environment;
mod grid;
