//! Convex recombination.
//!
//! Each offspring bit copies the mating pool's value wherever the pool is
//! unanimous and is drawn uniformly at random wherever it disagrees. A
//! population of identical individuals is therefore a fixed point.

use rand::Rng;

use super::individual::{BitRng, Individual, Population};
use super::selection::MatingPool;

/// Recombination errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecombinationError {
    #[error("Cannot recombine an empty mating pool")]
    EmptyMatingPool,
}

/// Value shared by every pool member at `position`, if unanimous.
fn consensus(pool: &MatingPool<'_>, position: usize) -> Option<bool> {
    let (first, rest) = pool.members().split_first()?;
    let value = first.bit(position);
    rest.iter()
        .all(|ind| ind.bit(position) == value)
        .then_some(value)
}

/// Build one offspring from the mating pool.
pub fn recombine_individual<R: Rng + ?Sized>(
    pool: &MatingPool<'_>,
    rng: &mut R,
) -> Result<Individual, RecombinationError> {
    if pool.is_empty() {
        return Err(RecombinationError::EmptyMatingPool);
    }
    let bits = (0..pool.individual_size())
        .map(|position| consensus(pool, position).unwrap_or_else(|| rng.gen_bool(0.5)))
        .collect();
    Ok(Individual::from_bits(bits))
}

/// Build `size` independent offspring from the mating pool.
pub fn recombine_population(
    pool: &MatingPool<'_>,
    size: usize,
    rng: &mut BitRng,
) -> Result<Population, RecombinationError> {
    if pool.is_empty() {
        return Err(RecombinationError::EmptyMatingPool);
    }
    // Unanimous columns are shared by every offspring; compute them once.
    let mask: Vec<Option<bool>> = (0..pool.individual_size())
        .map(|position| consensus(pool, position))
        .collect();

    let offspring = rng.fan_out(size, |rng| {
        Individual::from_bits(
            mask.iter()
                .map(|&column| column.unwrap_or_else(|| rng.gen_bool(0.5)))
                .collect(),
        )
    });

    Ok(Population::from_offspring(offspring))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::individual::create_population;
    use proptest::prelude::*;

    fn population(bits: &[&str]) -> Population {
        Population::from_individuals(bits.iter().map(|s| s.parse().unwrap()).collect()).unwrap()
    }

    #[test]
    fn test_unanimous_columns_preserved() {
        let pop = population(&["1100", "1110", "1101"]);
        let pool = MatingPool::whole(&pop);
        let mut rng = BitRng::new(3);

        let mut seen_third = [false; 2];
        let mut seen_fourth = [false; 2];
        for _ in 0..200 {
            let child = recombine_individual(&pool, &mut rng).unwrap();
            assert_eq!(child.len(), 4);
            assert!(child.bit(0));
            assert!(child.bit(1));
            seen_third[child.bit(2) as usize] = true;
            seen_fourth[child.bit(3) as usize] = true;
        }
        // Disagreeing columns are free and take both values.
        assert_eq!(seen_third, [true, true]);
        assert_eq!(seen_fourth, [true, true]);
    }

    #[test]
    fn test_single_member_pool_clones() {
        let pop = population(&["10110"]);
        let pool = MatingPool::whole(&pop);
        let children = recombine_population(&pool, 6, &mut BitRng::new(0)).unwrap();
        assert_eq!(children.len(), 6);
        assert!(children.iter().all(|c| c.to_string() == "10110"));
    }

    #[test]
    fn test_offspring_are_independent() {
        let pop = population(&["00000000000000000000", "11111111111111111111"]);
        let pool = MatingPool::whole(&pop);
        let children = recombine_population(&pool, 10, &mut BitRng::new(11)).unwrap();
        // Every column disagrees; 10 identical 20-bit draws would be absurd.
        assert!(children.distinct_count() > 1);
    }

    #[test]
    fn test_empty_pool_rejected() {
        let pop = population(&["00", "11"]);
        let fitness = crate::compute::fitness::FitnessVector::from_scores(vec![0, 1]);
        let pool = crate::compute::selection::select_at_least(&pop, &fitness, 5.0);
        assert_eq!(
            recombine_individual(&pool, &mut BitRng::new(0)),
            Err(RecombinationError::EmptyMatingPool)
        );
        assert_eq!(
            recombine_population(&pool, 2, &mut BitRng::new(0)),
            Err(RecombinationError::EmptyMatingPool)
        );
    }

    #[test]
    fn test_recombination_deterministic() {
        let pop = create_population(10, 50, &mut BitRng::new(5));
        let pool = MatingPool::whole(&pop);
        let a = recombine_population(&pool, 10, &mut BitRng::new(9)).unwrap();
        let b = recombine_population(&pool, 10, &mut BitRng::new(9)).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_uniform_population_is_fixed_point(
            bits in proptest::collection::vec(any::<bool>(), 1..64),
            size in 1usize..20,
            seed in any::<u64>(),
        ) {
            let individual = Individual::from_bits(bits);
            let pop = Population::from_individuals(vec![individual; size]).unwrap();
            let pool = MatingPool::whole(&pop);
            let next = recombine_population(&pool, size, &mut BitRng::new(seed)).unwrap();
            prop_assert_eq!(next, pop);
        }

        #[test]
        fn prop_consensus_preserved(
            size in 1usize..12,
            length in 1usize..48,
            seed in any::<u64>(),
        ) {
            let mut rng = BitRng::new(seed);
            let pop = create_population(size, length, &mut rng);
            let pool = MatingPool::whole(&pop);
            let children = recombine_population(&pool, size, &mut rng).unwrap();
            prop_assert_eq!(children.len(), size);
            for position in 0..length {
                if let Some(value) = consensus(&pool, position) {
                    prop_assert!(children.iter().all(|c| c.bit(position) == value));
                }
            }
        }
    }
}
