//! Fitness evaluation: turning a genome into a scalar score by playing episodes.
//!
//! # How It Works
//!
//! For each configured episode the evaluator:
//!
//! 1. **Reseeds** the episode (new invader start, projectiles cleared)
//! 2. **Replays** the genome one action per tick
//! 3. **Accumulates** the per-tick signals reported by the environment
//! 4. **Stops** the episode as soon as the environment reports termination
//!
//! Episode scores are summed without normalization, so more episodes scale the signal
//! linearly and a genome is rewarded for performing consistently across invader starts.
//!
//! # Fitness Formula
//!
//! ```text
//! episode_score = Σ horizontal_distance   (over ticks where missile and invader share a row)
//!               - hit_invader_bonus        (if the missile hit the invader)
//!               + landing_penalty          (if the invader landed)
//!               + defender_hit_penalty     (if a bomb hit the defender)
//!
//! fitness = Σ episode_score                (lower is better)
//! ```
//!
//! The distance term gives a gradient toward "almost" hits: a missile that reaches the
//! invader's row off by one column scores better than one that is off by five.
//! `defender_hit_penalty` defaults to zero, so losing the defender is neutral unless
//! configured otherwise.
//!
//! # Replay Policy
//!
//! A genome holds a fixed number of actions. [`ReplayPolicy::StopAtEnd`] (the default)
//! treats that number as the per-episode action budget and ends the episode's replay when it
//! is exhausted; [`ReplayPolicy::Wrap`] cycles through the genome until the environment
//! terminates, which `max_steps` guarantees.
//!
//! # Determinism
//!
//! The evaluator owns no random state. The seed passed to [`FitnessEvaluator::evaluate`] is
//! expanded into an environment seed, so the result depends only on the genome, the seed,
//! the episode count and the configuration.

use oxivaders_engine::{Action, EnvConfig, EnvConfigError, Environment, Genome, Outcome, StepReport};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// How a genome is replayed when it is shorter than the episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "kebab-case")]
pub enum ReplayPolicy {
    /// Stop the episode's replay once every action has been used.
    #[default]
    StopAtEnd,
    /// Restart from the first action until the environment terminates.
    Wrap,
}

/// Bonus and penalty terms added to an episode's accumulated distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessRewards {
    /// Subtracted when the missile destroys the invader.
    pub hit_invader_bonus: f64,
    /// Added when the invader lands.
    pub landing_penalty: f64,
    /// Added when a bomb destroys the defender.
    pub defender_hit_penalty: f64,
}

impl Default for FitnessRewards {
    fn default() -> Self {
        Self {
            hit_invader_bonus: 50.0,
            landing_penalty: 50.0,
            defender_hit_penalty: 0.0,
        }
    }
}

/// Statistics collected while replaying one episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EpisodeStats {
    /// Ticks played.
    pub ticks: usize,
    /// Sum of horizontal distances over row-aligned ticks.
    pub aligned_distance: usize,
    /// Ticks on which the missile and the invader shared a row.
    pub aligned_ticks: usize,
    /// Outcome of the terminating collision, if any.
    pub outcome: Outcome,
    /// Whether the environment terminated (as opposed to the genome running out).
    pub terminated: bool,
}

impl EpisodeStats {
    fn record(&mut self, report: &StepReport) {
        self.ticks += 1;
        if report.row_aligned {
            self.aligned_ticks += 1;
            self.aligned_distance += report.horizontal_distance;
        }
        if !report.outcome.is_none() {
            self.outcome = report.outcome;
        }
        self.terminated = report.done;
    }

    /// Score of this episode under `rewards` (lower is better).
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn score(&self, rewards: &FitnessRewards) -> f64 {
        let bonus = match self.outcome {
            Outcome::None => 0.0,
            Outcome::HitInvader => -rewards.hit_invader_bonus,
            Outcome::HitDefender => rewards.defender_hit_penalty,
            Outcome::Landed => rewards.landing_penalty,
        };
        self.aligned_distance as f64 + bonus
    }
}

/// Scores genomes by replaying them in freshly seeded episodes.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    env_config: EnvConfig,
    episodes: usize,
    replay: ReplayPolicy,
    rewards: FitnessRewards,
}

impl FitnessEvaluator {
    /// Creates an evaluator playing `episodes` episodes per genome.
    ///
    /// The environment configuration is validated here so that evaluation itself cannot
    /// fail.
    pub fn new(env_config: EnvConfig, episodes: usize) -> Result<Self, EnvConfigError> {
        env_config.validate()?;
        Ok(Self {
            env_config,
            episodes,
            replay: ReplayPolicy::default(),
            rewards: FitnessRewards::default(),
        })
    }

    #[must_use]
    pub fn with_replay(mut self, replay: ReplayPolicy) -> Self {
        self.replay = replay;
        self
    }

    #[must_use]
    pub fn with_rewards(mut self, rewards: FitnessRewards) -> Self {
        self.rewards = rewards;
        self
    }

    #[must_use]
    pub fn env_config(&self) -> &EnvConfig {
        &self.env_config
    }

    #[must_use]
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    #[must_use]
    pub fn replay(&self) -> ReplayPolicy {
        self.replay
    }

    #[must_use]
    pub fn rewards(&self) -> &FitnessRewards {
        &self.rewards
    }

    /// Creates the environment used for an evaluation with `seed`.
    ///
    /// The environment seed is drawn from a `Pcg32` seeded with `seed`, so nearby evaluation
    /// seeds do not produce correlated environments.
    #[must_use]
    pub fn environment(&self, seed: u64) -> Environment {
        let env_seed = Pcg32::seed_from_u64(seed).random::<u64>();
        Environment::new(self.env_config.clone(), env_seed)
            .expect("environment config is validated in FitnessEvaluator::new")
    }

    /// Computes the fitness of `genome` (lower is better).
    #[must_use]
    pub fn evaluate(&self, genome: &Genome, seed: u64) -> f64 {
        let mut env = self.environment(seed);
        let mut total = 0.0;
        for episode in 0..self.episodes {
            env.reseed_episode();
            let stats = self.play_episode(&mut env, genome);
            log::trace!("episode {episode}: {stats:?}");
            total += stats.score(&self.rewards);
        }
        log::debug!(
            "genome evaluated over {} episodes (seed {seed}): fitness {total:.3}",
            self.episodes
        );
        total
    }

    /// Replays `genome` in the current episode of `env`.
    ///
    /// The caller is responsible for starting the episode (see
    /// [`Environment::reseed_episode`]).
    pub fn play_episode(&self, env: &mut Environment, genome: &Genome) -> EpisodeStats {
        self.play_episode_with(env, genome, |_, _, _| {})
    }

    /// Like [`Self::play_episode`], calling `on_step` after every tick with the action taken
    /// and the resulting report.
    pub fn play_episode_with<F>(
        &self,
        env: &mut Environment,
        genome: &Genome,
        mut on_step: F,
    ) -> EpisodeStats
    where
        F: FnMut(&Environment, Action, &StepReport),
    {
        let budget = match self.replay {
            ReplayPolicy::StopAtEnd => genome.len(),
            ReplayPolicy::Wrap => usize::MAX,
        };
        let mut stats = EpisodeStats::default();
        for &action in genome.actions().iter().cycle().take(budget) {
            let report = env.step(action);
            stats.record(&report);
            on_step(env, action, &report);
            if report.done {
                break;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use oxivaders_engine::{Direction, Invader};

    use super::*;

    fn still_config() -> EnvConfig {
        EnvConfig {
            invader_step_every: 1000,
            bomb_probability: 0.0,
            ..EnvConfig::default()
        }
    }

    fn genome(first: &[Action], len: usize) -> Genome {
        let mut actions = first.to_vec();
        actions.resize(len, Action::Stay);
        Genome::new(actions).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EnvConfig {
            rows: 1,
            ..EnvConfig::default()
        };
        assert!(FitnessEvaluator::new(config, 4).is_err());
    }

    #[test]
    fn test_same_inputs_give_identical_fitness() {
        let evaluator = FitnessEvaluator::new(EnvConfig::default(), 8).unwrap();
        let genome = Genome::from_symbols(&[3, 1, 3, 2, 0, 3, 2, 2, 1, 3]).unwrap();
        let a = evaluator.evaluate(&genome, 1234);
        let b = evaluator.evaluate(&genome, 1234);
        assert_eq!(a.to_bits(), b.to_bits());
        assert!(a.is_finite());
    }

    #[test]
    fn test_hit_earns_bonus() {
        let evaluator = FitnessEvaluator::new(still_config(), 1).unwrap();
        let mut env = evaluator.environment(0);
        env.place(
            5,
            Invader {
                row: 0,
                column: 5,
                direction: Direction::Right,
            },
        )
        .unwrap();

        let stats = evaluator.play_episode(&mut env, &genome(&[Action::Shoot], 30));
        assert_eq!(stats.outcome, Outcome::HitInvader);
        assert_eq!(stats.ticks, 10);
        assert!(stats.terminated);
        assert_eq!(stats.score(evaluator.rewards()), -50.0);
    }

    #[test]
    fn test_row_aligned_miss_adds_distance() {
        let evaluator = FitnessEvaluator::new(still_config(), 1).unwrap();
        let mut env = evaluator.environment(0);
        env.place(
            7,
            Invader {
                row: 3,
                column: 2,
                direction: Direction::Left,
            },
        )
        .unwrap();

        let stats = evaluator.play_episode(&mut env, &genome(&[Action::Shoot], 7));
        assert_eq!(stats.ticks, 7);
        assert!(!stats.terminated);
        assert_eq!(stats.aligned_ticks, 1);
        assert_eq!(stats.aligned_distance, 5);
        assert_eq!(stats.score(evaluator.rewards()), 5.0);
    }

    #[test]
    fn test_stop_at_end_uses_genome_as_budget() {
        let evaluator = FitnessEvaluator::new(EnvConfig::default(), 1).unwrap();
        let mut env = evaluator.environment(9);
        let stats = evaluator.play_episode(&mut env, &genome(&[], 3));
        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.outcome, Outcome::None);
        assert!(!stats.terminated);
    }

    #[test]
    fn test_wrap_replays_until_termination() {
        let config = EnvConfig {
            bomb_probability: 0.0,
            ..EnvConfig::default()
        };
        let evaluator = FitnessEvaluator::new(config, 1)
            .unwrap()
            .with_replay(ReplayPolicy::Wrap);
        let mut env = evaluator.environment(9);
        let stats = evaluator.play_episode(&mut env, &genome(&[], 3));
        assert!(stats.terminated);
        assert_eq!(stats.outcome, Outcome::Landed);
        assert!(stats.ticks > 3);
    }

    #[test]
    fn test_fitness_scales_with_episode_count() {
        let config = EnvConfig {
            bomb_probability: 0.0,
            ..EnvConfig::default()
        };
        let idle = genome(&[], 1);
        for episodes in [1, 4] {
            let evaluator = FitnessEvaluator::new(config.clone(), episodes)
                .unwrap()
                .with_replay(ReplayPolicy::Wrap);
            #[expect(clippy::cast_precision_loss)]
            let expected = 50.0 * episodes as f64;
            assert_eq!(evaluator.evaluate(&idle, 5), expected);
        }
    }

    #[test]
    fn test_defender_hit_penalty_is_configurable() {
        let rewards = FitnessRewards {
            defender_hit_penalty: 25.0,
            ..FitnessRewards::default()
        };
        let stats = EpisodeStats {
            outcome: Outcome::HitDefender,
            aligned_distance: 2,
            ..EpisodeStats::default()
        };
        assert_eq!(stats.score(&FitnessRewards::default()), 2.0);
        assert_eq!(stats.score(&rewards), 27.0);
    }

    #[test]
    fn test_rewards_deserialize_with_defaults() {
        let rewards: FitnessRewards = serde_json::from_str(r#"{"landing_penalty": 10.0}"#).unwrap();
        assert_eq!(rewards.landing_penalty, 10.0);
        assert_eq!(rewards.hit_invader_bonus, 50.0);
    }
}
