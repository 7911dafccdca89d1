use std::path::PathBuf;

use chrono::{DateTime, Utc};
use oxivaders_engine::EnvConfig;
use oxivaders_evaluator::fitness::{FitnessRewards, ReplayPolicy};
use oxivaders_training::{
    genetic::GeneticParams,
    trainer::{BestGenome, GenerationMetrics},
};
use serde::{Deserialize, Serialize};

/// Everything recorded about one `train` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetrics {
    pub run_started_at: DateTime<Utc>,
    pub run_finished_at: DateTime<Utc>,
    pub env: EnvConfig,
    pub ga: GaSettings,
    /// One entry per generation, starting with the initial population (generation 0)
    pub history: Vec<GenerationMetrics>,
    pub global_best: GlobalBest,
    pub last_gen_best: GenerationBest,
}

/// Genetic algorithm and evaluation settings of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaSettings {
    #[serde(flatten)]
    pub params: GeneticParams,
    pub generations: usize,
    pub episodes: usize,
    pub seed: u64,
    pub topk: usize,
    pub replay: ReplayPolicy,
    pub parallel: bool,
    pub rewards: FitnessRewards,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalBest {
    pub fitness: f64,
    pub generation: usize,
    pub saved_as: SavedGenome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGenome {
    pub json: PathBuf,
    pub bin: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationBest {
    pub fitness: f64,
    pub generation: usize,
}

impl From<&BestGenome> for GenerationBest {
    fn from(best: &BestGenome) -> Self {
        Self {
            fitness: best.fitness,
            generation: best.generation,
        }
    }
}
