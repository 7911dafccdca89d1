use oxivaders_engine::EnvConfig;
use oxivaders_evaluator::fitness::{FitnessEvaluator, ReplayPolicy};
use oxivaders_training::{
    genetic::GeneticParams,
    trainer::{Trainer, TrainingReport},
};

fn params() -> GeneticParams {
    GeneticParams {
        population_size: 12,
        genome_len: 40,
        ..GeneticParams::default()
    }
}

fn run(seed: u64, parallel: bool, generations: usize) -> TrainingReport {
    let evaluator = FitnessEvaluator::new(EnvConfig::default(), 3).unwrap();
    Trainer::new(params(), evaluator, seed)
        .unwrap()
        .with_parallel(parallel)
        .run(generations, |_| {})
}

#[test]
fn test_best_fitness_never_regresses() {
    let report = run(7, false, 10);
    for pair in report.history.windows(2) {
        assert!(
            pair[1].best_fitness <= pair[0].best_fitness,
            "generation {} regressed: {} -> {}",
            pair[1].generation,
            pair[0].best_fitness,
            pair[1].best_fitness
        );
    }
    assert_eq!(report.global_best.fitness, report.last_generation_best.fitness);
    assert_eq!(
        report.global_best.fitness,
        report.history.last().unwrap().best_fitness
    );
}

#[test]
fn test_same_seed_reproduces_run() {
    let a = run(42, false, 5);
    let b = run(42, false, 5);
    assert_eq!(a.history, b.history);
    assert_eq!(a.global_best, b.global_best);
}

#[test]
fn test_parallel_matches_sequential() {
    let sequential = run(99, false, 5);
    let parallel = run(99, true, 5);
    assert_eq!(sequential.history, parallel.history);
    assert_eq!(sequential.global_best, parallel.global_best);
}

#[test]
fn test_different_seeds_diverge() {
    let a = run(1, false, 2);
    let b = run(2, false, 2);
    assert_ne!(a.global_best.genome, b.global_best.genome);
}

#[test]
fn test_global_best_survives_in_final_population() {
    let evaluator = FitnessEvaluator::new(EnvConfig::default(), 3)
        .unwrap()
        .with_replay(ReplayPolicy::Wrap);
    let mut trainer = Trainer::new(params(), evaluator, 5).unwrap();
    let report = trainer.run(3, |_| {});
    let best = &report.global_best;
    assert!(best.fitness.is_finite());
    assert_eq!(best.genome.len(), 40);
    assert!(
        report
            .final_population
            .individuals()
            .iter()
            .any(|ind| ind.genome() == &best.genome && ind.fitness() == best.fitness)
    );
}
