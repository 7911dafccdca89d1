//! Training system for evolving defender action genomes with a genetic algorithm.
//!
//! This crate searches the space of fixed-length action sequences for genomes that steer the
//! defender into shooting down the invader. Fitness comes from
//! `oxivaders-evaluator::FitnessEvaluator` and is minimized.
//!
//! # How Training Works
//!
//! 1. **Population** - Create a population of random genomes
//! 2. **Evaluation** - Each genome is replayed over several seeded episodes
//! 3. **Fitness** - Row-aligned distances plus outcome bonuses and penalties, summed
//! 4. **Selection** - Tournament selection favors lower fitness
//! 5. **Reproduction** - Crossover and mutation produce the next generation; the best
//!    individual is carried over unchanged
//! 6. **Repeat** - Continue for a fixed number of generations
//!
//! # Architecture
//!
//! ```text
//! Trainer (trainer)
//!     ↓ drives
//! GeneticAlgorithm (genetic)
//!     ↓ varies genomes with
//! crossover / mutate (genome_ops)
//!     ↓ individuals scored by
//! FitnessEvaluator (oxivaders-evaluator)
//!     ↓ summarized into
//! GenerationMetrics
//! ```
//!
//! # Genetic Algorithm Parameters
//!
//! - **Population size** - Number of individuals per generation
//! - **Genome length** - Number of actions in every genome
//! - **Crossover rate** - Probability of recombining a pair of parents
//! - **Mutation rate** - Per-locus probability of drawing a fresh action
//! - **Tournament size** - Number of contestants per parent selection
//!
//! See the [`genetic`] module for implementation details.
//!
//! # Example
//!
//! ```
//! use oxivaders_engine::EnvConfig;
//! use oxivaders_evaluator::fitness::FitnessEvaluator;
//! use oxivaders_training::{genetic::GeneticParams, trainer::Trainer};
//!
//! let params = GeneticParams {
//!     population_size: 10,
//!     genome_len: 40,
//!     ..GeneticParams::default()
//! };
//! let evaluator = FitnessEvaluator::new(EnvConfig::default(), 2).unwrap();
//! let mut trainer = Trainer::new(params, evaluator, 123).unwrap();
//!
//! let report = trainer.run(3, |_metrics| {});
//! assert_eq!(report.history.len(), 4);
//! println!("best: {}", report.global_best.genome.to_compact_string());
//! ```
//!
//! # Current Limitations
//!
//! - **Open-loop control**: Genomes cannot react to what they observe; they only encode a
//!   timing that tends to work across the training seeds
//! - **Simple GA**: No adaptive rates, island models or niching
//! - **Expensive**: Every individual plays every episode (parallelized but still linear in
//!   population size)

pub mod genetic;
pub mod genome_ops;
pub mod trainer;
