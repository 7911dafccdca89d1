//! Generation loop tying the genetic algorithm to the fitness evaluator.
//!
//! A [`Trainer`] owns two independent random streams derived from one master seed:
//!
//! - the **population stream**, consumed by [`GeneticAlgorithm`] for initialization,
//!   selection, crossover and mutation
//! - the **evaluation stream**, from which one evaluation seed per individual and generation
//!   is drawn before any evaluation starts
//!
//! Because evaluation seeds are drawn up front, sequential and parallel evaluation produce
//! bit-identical runs, and the number of episodes never shifts the population stream.

use oxivaders_engine::Genome;
use oxivaders_evaluator::fitness::FitnessEvaluator;
use oxivaders_stats::descriptive::{DescriptiveStats, smallest_k};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::genetic::{GeneticAlgorithm, GeneticParams, ParamsError, Population};

const EVALUATION_STREAM: u64 = 0x5eed_e7a1;

/// Fitness summary of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetrics {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub median_fitness: f64,
    pub std_fitness: f64,
    /// The `k` lowest fitness values, ascending.
    pub topk_fitness: Vec<f64>,
}

impl GenerationMetrics {
    /// Summarizes an evaluated population.
    ///
    /// At least one value is recorded in `topk_fitness`, even for `top_k == 0`. Returns `None`
    /// for an empty population.
    #[must_use]
    pub fn from_population(generation: usize, population: &Population, top_k: usize) -> Option<Self> {
        let DescriptiveStats {
            min,
            mean,
            median,
            std_dev,
            ..
        } = population.compute_fitness_stats()?;
        Some(Self {
            generation,
            best_fitness: min,
            mean_fitness: mean,
            median_fitness: median,
            std_fitness: std_dev,
            topk_fitness: smallest_k(population.fitness_values(), top_k.max(1)),
        })
    }
}

/// A genome together with the fitness and generation it was found at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestGenome {
    pub fitness: f64,
    pub generation: usize,
    pub genome: Genome,
}

impl BestGenome {
    fn of(population: &Population, generation: usize) -> Option<Self> {
        let best = population.best()?;
        Some(Self {
            fitness: best.fitness(),
            generation,
            genome: best.genome().clone(),
        })
    }
}

/// Result of a complete training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Metrics for generation 0 (the initial population) through the last generation.
    pub history: Vec<GenerationMetrics>,
    /// Lowest-fitness individual seen over the whole run.
    pub global_best: BestGenome,
    /// Best individual of the final generation.
    pub last_generation_best: BestGenome,
    pub final_population: Population,
}

/// Runs the genetic algorithm against a [`FitnessEvaluator`].
#[derive(Debug, Clone)]
pub struct Trainer {
    algorithm: GeneticAlgorithm,
    evaluator: FitnessEvaluator,
    evaluation_rng: Pcg32,
    top_k: usize,
    parallel: bool,
}

impl Trainer {
    /// Creates a trainer whose random streams are both derived from `seed`.
    pub fn new(
        params: GeneticParams,
        evaluator: FitnessEvaluator,
        seed: u64,
    ) -> Result<Self, ParamsError> {
        let algorithm = GeneticAlgorithm::new(params, Pcg32::seed_from_u64(seed))?;
        Ok(Self {
            algorithm,
            evaluator,
            evaluation_rng: Pcg32::new(seed, EVALUATION_STREAM),
            top_k: 3,
            parallel: false,
        })
    }

    /// Sets how many of the lowest fitness values are recorded per generation (at least one).
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Evaluates individuals on scoped threads instead of sequentially.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn params(&self) -> &GeneticParams {
        self.algorithm.params()
    }

    #[must_use]
    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    /// Evaluates the initial population, then evolves it for `generations` generations.
    ///
    /// `on_generation` is called once per evaluated generation, starting with generation 0.
    pub fn run<F>(&mut self, generations: usize, mut on_generation: F) -> TrainingReport
    where
        F: FnMut(&GenerationMetrics),
    {
        let mut population = self.algorithm.init_population();
        self.evaluate(&mut population);

        let mut history = Vec::with_capacity(generations + 1);
        let mut global_best = self.record(0, &population, &mut history, &mut on_generation);
        let mut last_generation_best = global_best.clone();

        for generation in 1..=generations {
            population = self.algorithm.next_generation(&population);
            self.evaluate(&mut population);

            let best = self.record(generation, &population, &mut history, &mut on_generation);
            if best.fitness < global_best.fitness {
                log::debug!(
                    "new global best at generation {generation}: {:.3}",
                    best.fitness
                );
                global_best = best.clone();
            }
            last_generation_best = best;
        }

        TrainingReport {
            history,
            global_best,
            last_generation_best,
            final_population: population,
        }
    }

    fn evaluate(&mut self, population: &mut Population) {
        let seeds = (0..population.len())
            .map(|_| self.evaluation_rng.random::<u64>())
            .collect::<Vec<_>>();
        let evaluator = &self.evaluator;
        if self.parallel {
            population.evaluate_parallel(&seeds, |genome, seed| evaluator.evaluate(genome, seed));
        } else {
            population.evaluate_with_seeds(&seeds, |genome, seed| evaluator.evaluate(genome, seed));
        }
    }

    fn record<F>(
        &self,
        generation: usize,
        population: &Population,
        history: &mut Vec<GenerationMetrics>,
        on_generation: &mut F,
    ) -> BestGenome
    where
        F: FnMut(&GenerationMetrics),
    {
        // population_size >= 1 is checked by GeneticParams::validate
        let metrics = GenerationMetrics::from_population(generation, population, self.top_k)
            .expect("population is never empty");
        log::info!(
            "Gen {:3} | best={:.2} mean={:.2} median={:.2} std={:.2}",
            metrics.generation,
            metrics.best_fitness,
            metrics.mean_fitness,
            metrics.median_fitness,
            metrics.std_fitness,
        );
        on_generation(&metrics);
        history.push(metrics);
        BestGenome::of(population, generation).expect("population is never empty")
    }
}
