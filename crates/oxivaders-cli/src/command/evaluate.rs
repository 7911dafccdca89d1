use std::path::PathBuf;

use anyhow::Context as _;
use oxivaders_evaluator::fitness::{FitnessEvaluator, ReplayPolicy};
use serde::Serialize;

use crate::{
    command::ReplayMode,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Genome file (JSON, or raw bytes with a `.bin` extension)
    genome: PathBuf,
    #[arg(long, default_value_t = 8)]
    episodes: usize,
    #[arg(long, default_value_t = 123)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = ReplayMode::StopAtEnd)]
    replay: ReplayMode,
    /// JSON file overriding environment settings
    #[arg(long)]
    env_config: Option<PathBuf>,
    /// Write the result here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EvaluationResult {
    genome: PathBuf,
    genome_len: usize,
    episodes: usize,
    seed: u64,
    replay: ReplayPolicy,
    fitness: f64,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let genome = util::read_genome_file(&arg.genome)?;
    let env = util::read_env_config(arg.env_config.as_deref())?;
    let evaluator = FitnessEvaluator::new(env, arg.episodes)
        .context("Invalid environment configuration")?
        .with_replay(arg.replay.into());

    let fitness = evaluator.evaluate(&genome, arg.seed);
    log::info!(
        "{}: fitness {fitness:.3} over {} episodes",
        arg.genome.display(),
        arg.episodes
    );

    let result = EvaluationResult {
        genome: arg.genome.clone(),
        genome_len: genome.len(),
        episodes: arg.episodes,
        seed: arg.seed,
        replay: evaluator.replay(),
        fitness,
    };
    Output::save_json(&result, arg.output.as_deref())
}
