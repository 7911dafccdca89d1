//! Fitness evaluation for evolved defender genomes.
//!
//! This crate bridges genomes (`oxivaders-engine::Genome`) and the simulation
//! (`oxivaders-engine::Environment`): it replays a genome through a number of independently
//! seeded episodes and reduces the per-tick signals to a single scalar fitness, lower being
//! better.
//!
//! # Architecture
//!
//! ```text
//! Genetic Algorithm (oxivaders-training)
//!     ↓ asks for the fitness of
//! Genome
//!     ↓ replayed by
//! FitnessEvaluator (this crate)
//!     ↓ steps
//! Environment (oxivaders-engine)
//!     ↓ reports
//! StepReport (row alignment, distance, outcome)
//! ```
//!
//! The evaluator is independent of the genetic algorithm: anything that can produce a
//! [`Genome`](oxivaders_engine::Genome) can be scored, and the genetic algorithm only sees a
//! scoring callback.
//!
//! # Example
//!
//! ```
//! use oxivaders_engine::{EnvConfig, Genome};
//! use oxivaders_evaluator::fitness::FitnessEvaluator;
//!
//! let evaluator = FitnessEvaluator::new(EnvConfig::default(), 8).unwrap();
//! let genome = Genome::from_symbols(&[3, 0, 0, 1, 2, 3]).unwrap();
//!
//! let fitness = evaluator.evaluate(&genome, 42);
//! assert_eq!(fitness, evaluator.evaluate(&genome, 42));
//! ```
//!
//! # Current Limitations
//!
//! - **Single fitness formula**: bonus and penalty magnitudes are configurable, but the
//!   shape of the formula (distance sum plus outcome terms) is fixed.
//! - **Distance only when row-aligned**: a missile that passes beside the invader between
//!   rows contributes nothing, so early generations get little gradient.

pub mod fitness;
