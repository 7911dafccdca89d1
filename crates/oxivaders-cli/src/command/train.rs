use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use oxivaders_evaluator::fitness::FitnessEvaluator;
use oxivaders_training::{genetic::GeneticParams, trainer::Trainer};

use crate::{
    command::ReplayMode,
    schema::{
        genome_file::GenomeFile,
        run_metrics::{GaSettings, GenerationBest, GlobalBest, RunMetrics, SavedGenome},
    },
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of generations after the initial population
    #[arg(long, default_value_t = 50)]
    pub(super) generations: usize,
    /// Individuals per generation
    #[arg(long, default_value_t = 80)]
    pub(super) pop_size: usize,
    /// Episodes played per fitness evaluation
    #[arg(long, default_value_t = 8)]
    pub(super) episodes: usize,
    /// Actions per genome
    #[arg(long, default_value_t = 200)]
    pub(super) genome_len: usize,
    /// Per-locus probability of drawing a fresh action
    #[arg(long, default_value_t = 0.05)]
    pub(super) mutation_rate: f64,
    /// Probability of recombining a pair of parents
    #[arg(long, default_value_t = 0.9)]
    pub(super) crossover_rate: f64,
    /// Contestants per tournament
    #[arg(long, default_value_t = 4)]
    pub(super) tournament_k: usize,
    /// Master seed for the population and evaluation random streams
    #[arg(long, default_value_t = 123)]
    pub(super) seed: u64,
    /// Number of lowest fitness values recorded per generation
    #[arg(long, default_value_t = 3)]
    pub(super) topk: usize,
    #[arg(long, value_enum, default_value_t = ReplayMode::StopAtEnd)]
    pub(super) replay: ReplayMode,
    /// Evaluate individuals on multiple threads (same results as sequential)
    #[arg(long)]
    pub(super) parallel: bool,
    /// JSON file overriding environment settings
    #[arg(long)]
    pub(super) env_config: Option<PathBuf>,
    #[arg(long, default_value = "metrics.json")]
    pub(super) metrics_out: PathBuf,
    #[arg(long, default_value = "best_genome.json")]
    pub(super) best_json: PathBuf,
    #[arg(long, default_value = "best_genome.bin")]
    pub(super) best_bin: PathBuf,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let env = util::read_env_config(arg.env_config.as_deref())?;
    let params = GeneticParams {
        population_size: arg.pop_size,
        genome_len: arg.genome_len,
        mutation_rate: arg.mutation_rate,
        crossover_rate: arg.crossover_rate,
        tournament_size: arg.tournament_k,
    };
    let evaluator = FitnessEvaluator::new(env.clone(), arg.episodes)
        .context("Invalid environment configuration")?
        .with_replay(arg.replay.into());
    let rewards = evaluator.rewards().clone();
    let mut trainer = Trainer::new(params.clone(), evaluator, arg.seed)
        .context("Invalid genetic algorithm parameters")?
        .with_top_k(arg.topk)
        .with_parallel(arg.parallel);

    log::info!(
        "Training: {} generations, population {}, genome length {}, {} episodes, seed {}",
        arg.generations,
        params.population_size,
        params.genome_len,
        arg.episodes,
        arg.seed,
    );
    let run_started_at = Utc::now();
    let report = trainer.run(arg.generations, |_| {});
    let run_finished_at = Utc::now();

    let best = &report.global_best;
    let genome_file = GenomeFile {
        fitness: Some(best.fitness),
        generation: Some(best.generation),
        trained_at: Some(run_finished_at),
        ..GenomeFile::new(best.genome.clone())
    };
    Output::save_json(&genome_file, Some(arg.best_json.as_path()))?;
    util::write_genome_bin(&best.genome, &arg.best_bin)?;

    let metrics = RunMetrics {
        run_started_at,
        run_finished_at,
        env,
        ga: GaSettings {
            params,
            generations: arg.generations,
            episodes: arg.episodes,
            seed: arg.seed,
            topk: arg.topk,
            replay: arg.replay.into(),
            parallel: arg.parallel,
            rewards,
        },
        history: report.history,
        global_best: GlobalBest {
            fitness: best.fitness,
            generation: best.generation,
            saved_as: SavedGenome {
                json: arg.best_json.clone(),
                bin: arg.best_bin.clone(),
            },
        },
        last_gen_best: GenerationBest::from(&report.last_generation_best),
    };
    Output::save_json(&metrics, Some(arg.metrics_out.as_path()))?;

    log::info!("Training completed in {}", run_finished_at - run_started_at);
    log::info!(
        "Global best: fitness {:.3} at generation {}",
        best.fitness,
        best.generation
    );
    log::info!("  Genome: {}", best.genome.to_compact_string());
    log::info!(
        "  Saved to {} and {}",
        arg.best_json.display(),
        arg.best_bin.display()
    );
    log::info!("  Metrics: {}", arg.metrics_out.display());

    Ok(())
}
