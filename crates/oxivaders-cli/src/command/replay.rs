use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context as _;
use oxivaders_engine::{Action, Environment, StepReport};
use oxivaders_evaluator::fitness::FitnessEvaluator;

use crate::{command::ReplayMode, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Genome file (JSON, or raw bytes with a `.bin` extension)
    genome: PathBuf,
    #[arg(long, default_value_t = 1)]
    episodes: usize,
    #[arg(long, default_value_t = 123)]
    seed: u64,
    /// How actions are replayed. With `wrap`, every episode restarts from the first action,
    /// so per-episode scores add up to what `evaluate` reports for the same seed
    #[arg(long, value_enum, default_value_t = ReplayMode::Wrap)]
    replay: ReplayMode,
    /// JSON file overriding environment settings
    #[arg(long)]
    env_config: Option<PathBuf>,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let genome = util::read_genome_file(&arg.genome)?;
    let env_config = util::read_env_config(arg.env_config.as_deref())?;
    let evaluator = FitnessEvaluator::new(env_config, arg.episodes)
        .context("Invalid environment configuration")?
        .with_replay(arg.replay.into());

    // Same environment and episode sequence as `evaluate` with the same seed.
    let mut env = evaluator.environment(arg.seed);
    let mut out = io::stdout().lock();
    let mut total = 0.0;
    for episode in 0..arg.episodes {
        env.reseed_episode();
        writeln!(out, "=== episode {episode} ===")?;
        write!(out, "{}", env.grid())?;

        let mut written = Ok(());
        let stats = evaluator.play_episode_with(&mut env, &genome, |env, action, report| {
            if written.is_ok() {
                written = write_tick(&mut out, env, action, report);
            }
        });
        written?;

        let score = stats.score(evaluator.rewards());
        total += score;
        writeln!(
            out,
            "episode {episode}: {:?} after {} ticks, aligned distance {}, score {score:.3}",
            stats.outcome, stats.ticks, stats.aligned_distance,
        )?;
    }
    writeln!(out, "total fitness: {total:.3}")?;
    Ok(())
}

fn write_tick<W>(
    out: &mut W,
    env: &Environment,
    action: Action,
    report: &StepReport,
) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        out,
        "--- tick {} action {} outcome {} aligned {} distance {}{}",
        env.steps(),
        action.as_char(),
        report.outcome.code(),
        report.row_aligned,
        report.horizontal_distance,
        if report.done { " [done]" } else { "" },
    )?;
    write!(out, "{}", env.grid())
}
