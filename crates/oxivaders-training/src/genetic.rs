//! Genetic algorithm over fixed-length action genomes.
//!
//! This module implements a generational genetic algorithm (GA) that evolves populations of
//! [`Genome`]s toward lower fitness. The GA uses tournament selection, conditional
//! single-point crossover, per-locus resampling mutation and single-individual elitism.
//!
//! # Algorithm Overview
//!
//! 1. **Initialize** - Draw `population_size` genomes, each locus uniform over the alphabet
//! 2. **Evaluate** - Score every individual through a caller-supplied callback
//! 3. **Elitism** - Copy the best individual, fitness included, into slot 0
//! 4. **Tournament Selection** - Pick two parents, each the fittest of a random subset
//! 5. **Crossover** - With probability `crossover_rate`, swap the parents' tails at a random cut
//! 6. **Mutation** - Resample each locus of each child with probability `mutation_rate`
//! 7. **Repeat** steps 4–6 until the next population is full, then go back to step 2
//!
//! # Key Components
//!
//! - [`GeneticParams`] - Population size, genome length and operator rates
//! - [`Individual`] - A genome with its fitness (lower is better)
//! - [`Population`] - Individuals of one generation, plus evaluation and statistics
//! - [`GeneticAlgorithm`] - Owns the population-level random stream and produces generations
//!
//! # Fitness Convention
//!
//! Fitness is minimized. Newly created individuals hold `f64::INFINITY` until evaluated, so an
//! unevaluated individual never wins a tournament against an evaluated one.
//!
//! # Elitism and Evaluation
//!
//! The elite copy carries its fitness into the next generation and is marked as carried
//! over; [`Population::evaluate`] skips it. The best fitness of a generation therefore never
//! gets worse than the previous generation's best.
//!
//! # Randomness
//!
//! [`GeneticAlgorithm`] takes its random stream as an explicit `Pcg32` handle. It must not be
//! shared with environments or used to derive evaluation seeds, otherwise changing the number
//! of episodes would change the evolved population.
//!
//! # Example
//!
//! ```
//! use oxivaders_training::genetic::{GeneticAlgorithm, GeneticParams};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let params = GeneticParams {
//!     population_size: 6,
//!     genome_len: 8,
//!     ..GeneticParams::default()
//! };
//! let mut ga = GeneticAlgorithm::new(params, Pcg32::seed_from_u64(1)).unwrap();
//!
//! let mut population = ga.init_population();
//! // Fewer shots is "better" in this toy scoring function.
//! let shots = |genome: &oxivaders_engine::Genome| {
//!     genome.to_bytes().iter().filter(|&&code| code == 3).count() as f64
//! };
//! population.evaluate(shots);
//! for _ in 0..5 {
//!     population = ga.next_generation(&population);
//!     population.evaluate(shots);
//! }
//! assert_eq!(population.len(), 6);
//! ```
//!
//! # Current Limitations
//!
//! - **Single elite**: Only the best individual is preserved; runner-ups must win
//!   tournaments to survive
//! - **No adaptive rates**: Mutation and crossover rates are constant over a run
//! - **Single-objective only**: Fitness is a scalar

use std::{iter, thread};

use oxivaders_engine::Genome;
use oxivaders_stats::descriptive::DescriptiveStats;
use rand::{Rng, seq::index};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::genome_ops;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ParamsError {
    #[display("population_size must be at least 1")]
    EmptyPopulation,
    #[display("genome_len must be at least 1")]
    EmptyGenome,
    #[display("tournament_size must be at least 1")]
    EmptyTournament,
    #[display("{name} must be within [0, 1] (got {value})")]
    RateOutOfRange { name: &'static str, value: f64 },
}

/// Genetic algorithm parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticParams {
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Number of loci in every genome.
    pub genome_len: usize,
    /// Probability of resampling each locus of a child.
    pub mutation_rate: f64,
    /// Probability of crossing a pair of parents.
    pub crossover_rate: f64,
    /// Individuals drawn per tournament (clamped to the population size).
    pub tournament_size: usize,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 80,
            genome_len: 200,
            mutation_rate: 0.05,
            crossover_rate: 0.9,
            tournament_size: 4,
        }
    }
}

impl GeneticParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.population_size == 0 {
            return Err(ParamsError::EmptyPopulation);
        }
        if self.genome_len == 0 {
            return Err(ParamsError::EmptyGenome);
        }
        if self.tournament_size == 0 {
            return Err(ParamsError::EmptyTournament);
        }
        for (name, value) in [
            ("mutation_rate", self.mutation_rate),
            ("crossover_rate", self.crossover_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParamsError::RateOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

/// A single candidate solution: a genome and its fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    genome: Genome,
    fitness: f64,
    carried_over: bool,
}

impl Individual {
    /// Creates an unevaluated individual.
    #[must_use]
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            fitness: f64::INFINITY,
            carried_over: false,
        }
    }

    /// Creates an individual with a known fitness.
    #[must_use]
    pub fn with_fitness(genome: Genome, fitness: f64) -> Self {
        Self {
            genome,
            fitness,
            carried_over: false,
        }
    }

    #[must_use]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Fitness of this individual; lower is better and `INFINITY` means unevaluated.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_finite()
    }

    /// Whether this individual is the elite copied unchanged from the previous generation.
    #[must_use]
    pub fn is_carried_over(&self) -> bool {
        self.carried_over
    }

    fn needs_evaluation(&self) -> bool {
        !(self.carried_over && self.is_evaluated())
    }
}

/// The individuals of one generation.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    #[must_use]
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Returns the individual with the lowest fitness.
    ///
    /// Found by scanning; on ties the first one encountered wins.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals
            .iter()
            .reduce(|best, ind| if ind.fitness < best.fitness { ind } else { best })
    }

    /// Fitness of every individual, in population order.
    pub fn fitness_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.individuals.iter().map(|ind| ind.fitness)
    }

    /// Computes descriptive statistics of the population's fitness.
    ///
    /// Returns `None` for an empty population.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.fitness_values())
    }

    /// Scores every individual with `score`, in population order.
    ///
    /// The callback is invoked once per individual, except for a carried-over elite that
    /// already has a fitness.
    pub fn evaluate<F>(&mut self, mut score: F)
    where
        F: FnMut(&Genome) -> f64,
    {
        for ind in &mut self.individuals {
            if ind.needs_evaluation() {
                ind.fitness = score(&ind.genome);
            }
        }
    }

    /// Like [`Self::evaluate`], passing each individual its own pre-derived seed.
    ///
    /// # Panics
    ///
    /// Panics if `seeds` does not hold exactly one seed per individual.
    pub fn evaluate_with_seeds<F>(&mut self, seeds: &[u64], mut score: F)
    where
        F: FnMut(&Genome, u64) -> f64,
    {
        assert_eq!(seeds.len(), self.individuals.len());
        for (ind, &seed) in iter::zip(&mut self.individuals, seeds) {
            if ind.needs_evaluation() {
                ind.fitness = score(&ind.genome, seed);
            }
        }
    }

    /// Parallel variant of [`Self::evaluate_with_seeds`], one scoped thread per individual.
    ///
    /// Each evaluation only sees its own genome and seed, so the result is identical to the
    /// sequential version.
    ///
    /// # Panics
    ///
    /// Panics if `seeds` does not hold exactly one seed per individual.
    pub fn evaluate_parallel<F>(&mut self, seeds: &[u64], score: F)
    where
        F: Fn(&Genome, u64) -> f64 + Sync,
    {
        assert_eq!(seeds.len(), self.individuals.len());
        let score = &score;
        thread::scope(|s| {
            for (ind, &seed) in iter::zip(&mut self.individuals, seeds) {
                if !ind.needs_evaluation() {
                    continue;
                }
                s.spawn(move || {
                    ind.fitness = score(&ind.genome, seed);
                });
            }
        });
    }
}

/// Produces populations and successive generations from a dedicated random stream.
#[derive(Debug, Clone)]
pub struct GeneticAlgorithm {
    params: GeneticParams,
    rng: Pcg32,
}

impl GeneticAlgorithm {
    /// Creates the algorithm after validating `params`.
    pub fn new(params: GeneticParams, rng: Pcg32) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self { params, rng })
    }

    #[must_use]
    pub fn params(&self) -> &GeneticParams {
        &self.params
    }

    /// Draws `population_size` unevaluated individuals with uniform random genomes.
    pub fn init_population(&mut self) -> Population {
        let individuals = (0..self.params.population_size)
            .map(|_| Individual::new(Genome::random(&mut self.rng, self.params.genome_len)))
            .collect();
        Population { individuals }
    }

    /// Selects a parent by tournament (see [`tournament_select`]).
    ///
    /// # Panics
    ///
    /// Panics if the population is empty.
    pub fn tournament_select<'a>(&mut self, population: &'a Population) -> &'a Individual {
        tournament_select(
            &population.individuals,
            self.params.tournament_size,
            &mut self.rng,
        )
    }

    /// Creates the next generation from an evaluated population.
    ///
    /// 1. Copies the best individual (genome and fitness) into slot 0
    /// 2. Fills the remaining slots with mutated offspring of tournament-selected parents,
    ///    dropping the second child of the last mating if it would overshoot
    ///
    /// Offspring are unevaluated.
    ///
    /// # Panics
    ///
    /// Panics if the population is empty.
    pub fn next_generation(&mut self, population: &Population) -> Population {
        let size = self.params.population_size;
        let elite = population.best().expect("population must not be empty");
        let mut next = Vec::with_capacity(size);
        next.push(Individual {
            genome: elite.genome.clone(),
            fitness: elite.fitness,
            carried_over: true,
        });

        while next.len() < size {
            let p1 = self.tournament_select(population);
            let p2 = self.tournament_select(population);
            let (mut c1, mut c2) = genome_ops::crossover(
                &p1.genome,
                &p2.genome,
                self.params.crossover_rate,
                &mut self.rng,
            );

            genome_ops::mutate(&mut c1, self.params.mutation_rate, &mut self.rng);
            next.push(Individual::new(c1));
            if next.len() < size {
                genome_ops::mutate(&mut c2, self.params.mutation_rate, &mut self.rng);
                next.push(Individual::new(c2));
            }
        }

        Population { individuals: next }
    }
}

/// Selects an individual using tournament selection.
///
/// Draws `min(tournament_size, population.len())` distinct individuals uniformly without
/// replacement and returns the one with the strictly lowest fitness; ties go to the one
/// drawn first.
///
/// # Panics
///
/// Panics if `population` is empty or `tournament_size` is zero.
pub fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    assert!(!population.is_empty());
    let k = usize::min(tournament_size, population.len());
    index::sample(rng, population.len(), k)
        .into_iter()
        .map(|i| &population[i])
        .reduce(|best, ind| if ind.fitness < best.fitness { ind } else { best })
        .expect("tournament draws at least one individual")
}
