//! Genome operators for the genetic algorithm.
//!
//! These functions implement the variation steps used by
//! [`GeneticAlgorithm`](crate::genetic::GeneticAlgorithm):
//!
//! - **Crossover**: [`crossover`] performs conditional single-point crossover
//! - **Mutation**: [`mutate`] performs independent per-locus resampling
//!
//! Both operators preserve genome length and only ever write valid action symbols.

use oxivaders_engine::Genome;
use rand::Rng;

/// Swaps the tails of two equally long genomes at locus `cut`.
///
/// Children are `a[..cut] ++ b[cut..]` and `b[..cut] ++ a[cut..]`.
///
/// # Panics
///
/// Panics if the genomes differ in length or `cut` is not within `1..len`.
///
/// # Examples
///
/// ```
/// use oxivaders_engine::Genome;
/// use oxivaders_training::genome_ops;
///
/// let a = Genome::from_symbols(&[0, 0, 0, 0]).unwrap();
/// let b = Genome::from_symbols(&[3, 3, 3, 3]).unwrap();
/// let (c1, c2) = genome_ops::single_point_crossover(&a, &b, 1);
/// assert_eq!(c1.to_bytes(), vec![0, 3, 3, 3]);
/// assert_eq!(c2.to_bytes(), vec![3, 0, 0, 0]);
/// ```
#[must_use]
pub fn single_point_crossover(a: &Genome, b: &Genome, cut: usize) -> (Genome, Genome) {
    assert_eq!(a.len(), b.len());
    assert!((1..a.len()).contains(&cut), "cut point {cut} out of range");
    let mut c1 = a.clone();
    let mut c2 = b.clone();
    c1.actions_mut()[cut..].copy_from_slice(&b.actions()[cut..]);
    c2.actions_mut()[cut..].copy_from_slice(&a.actions()[cut..]);
    (c1, c2)
}

/// Conditionally recombines two parents.
///
/// A single Bernoulli trial with probability `rate` decides whether the pair is crossed.
/// On success a cut point is drawn uniformly from `1..len` and passed to
/// [`single_point_crossover`]; otherwise (and always for one-locus genomes, which have no
/// cut point) the children are copies of the parents.
///
/// # Panics
///
/// Panics if the genomes differ in length or `rate` is outside `[0, 1]`.
pub fn crossover<R>(a: &Genome, b: &Genome, rate: f64, rng: &mut R) -> (Genome, Genome)
where
    R: Rng + ?Sized,
{
    assert_eq!(a.len(), b.len());
    if !rng.random_bool(rate) || a.len() < 2 {
        return (a.clone(), b.clone());
    }
    let cut = rng.random_range(1..a.len());
    single_point_crossover(a, b, cut)
}

/// Resamples each locus independently with probability `rate`.
///
/// A resampled locus draws a fresh uniform action, which may coincide with the old one.
///
/// # Panics
///
/// Panics if `rate` is outside `[0, 1]`.
pub fn mutate<R>(genome: &mut Genome, rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for action in genome.actions_mut() {
        if rng.random_bool(rate) {
            *action = rng.random();
        }
    }
}

#[cfg(test)]
mod tests {
    use oxivaders_engine::Action;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn uniform(action: Action, len: usize) -> Genome {
        Genome::new(vec![action; len]).unwrap()
    }

    #[test]
    fn test_crossover_rate_zero_copies_parents() {
        let mut rng = Pcg32::seed_from_u64(1);
        let a = uniform(Action::Left, 10);
        let b = uniform(Action::Right, 10);
        for _ in 0..100 {
            let (c1, c2) = crossover(&a, &b, 0.0, &mut rng);
            assert_eq!(c1, a);
            assert_eq!(c2, b);
        }
    }

    #[test]
    fn test_crossover_rate_one_swaps_tails() {
        let mut rng = Pcg32::seed_from_u64(2);
        let a = uniform(Action::Left, 10);
        let b = uniform(Action::Right, 10);
        for _ in 0..100 {
            let (c1, c2) = crossover(&a, &b, 1.0, &mut rng);
            let cut = c1.actions().iter().position(|&x| x == Action::Right).unwrap();
            assert!((1..10).contains(&cut));
            assert!(c1.actions()[..cut].iter().all(|&x| x == Action::Left));
            assert!(c1.actions()[cut..].iter().all(|&x| x == Action::Right));
            assert!(c2.actions()[..cut].iter().all(|&x| x == Action::Right));
            assert!(c2.actions()[cut..].iter().all(|&x| x == Action::Left));
        }
    }

    #[test]
    fn test_single_locus_genomes_are_copied() {
        let mut rng = Pcg32::seed_from_u64(3);
        let a = uniform(Action::Shoot, 1);
        let b = uniform(Action::Stay, 1);
        let (c1, c2) = crossover(&a, &b, 1.0, &mut rng);
        assert_eq!((c1, c2), (a, b));
    }

    #[test]
    fn test_mutation_rate_zero_is_identity() {
        let mut rng = Pcg32::seed_from_u64(4);
        let original = Genome::random(&mut rng, 50);
        let mut genome = original.clone();
        mutate(&mut genome, 0.0, &mut rng);
        assert_eq!(genome, original);
    }

    #[test]
    fn test_mutation_rate_one_resamples_every_locus() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut genome = uniform(Action::Stay, 400);
        mutate(&mut genome, 1.0, &mut rng);
        assert_eq!(genome.len(), 400);
        // Roughly three quarters of the resampled loci differ from the old value.
        let changed = genome.actions().iter().filter(|&&a| a != Action::Stay).count();
        assert!((240..360).contains(&changed), "changed = {changed}");
    }
}
