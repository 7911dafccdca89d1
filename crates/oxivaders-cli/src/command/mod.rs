use clap::{Parser, Subcommand};
use oxivaders_evaluator::fitness::ReplayPolicy;

use self::{evaluate::EvaluateArg, replay::ReplayArg, train::TrainArg};

mod evaluate;
mod replay;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a genome with the genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Print the fitness of a saved genome
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Play a saved genome and print the grid after every tick
    Replay(#[clap(flatten)] ReplayArg),
}

/// How a genome shorter than the episode is replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ReplayMode {
    /// Stop the episode when the genome runs out
    StopAtEnd,
    /// Start over from the first action until the episode terminates
    Wrap,
}

impl From<ReplayMode> for ReplayPolicy {
    fn from(mode: ReplayMode) -> Self {
        match mode {
            ReplayMode::StopAtEnd => ReplayPolicy::StopAtEnd,
            ReplayMode::Wrap => ReplayPolicy::Wrap,
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition_is_valid() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_train_defaults() {
        let args = CommandArgs::try_parse_from(["oxivaders", "train"]).unwrap();
        let Mode::Train(arg) = args.mode else {
            panic!("expected train");
        };
        assert_eq!(arg.generations, 50);
        assert_eq!(arg.pop_size, 80);
        assert_eq!(arg.episodes, 8);
        assert_eq!(arg.genome_len, 200);
        assert_eq!(arg.tournament_k, 4);
        assert_eq!(arg.seed, 123);
        assert_eq!(arg.topk, 3);
        assert_eq!(arg.replay, ReplayMode::StopAtEnd);
        assert!(!arg.parallel);
    }

    #[test]
    fn test_replay_mode_parses_kebab_case() {
        let args =
            CommandArgs::try_parse_from(["oxivaders", "train", "--replay", "wrap", "--parallel"])
                .unwrap();
        let Mode::Train(arg) = args.mode else {
            panic!("expected train");
        };
        assert_eq!(ReplayPolicy::from(arg.replay), ReplayPolicy::Wrap);
        assert!(arg.parallel);
        assert!(CommandArgs::try_parse_from(["oxivaders", "train", "--replay", "loop"]).is_err());
    }
}
