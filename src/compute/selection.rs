//! Selection policies that filter a population into a mating pool.

use crate::schema::{FitnessFunction, GateThreshold, SearchConfig, SearchVariant};

use super::fitness::FitnessVector;
use super::individual::{Individual, Population};

/// How a mating pool was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStrategy {
    /// Whole population, used when every score is equal.
    WholePopulation,
    /// Everything strictly better than the worst score.
    BetterThanWorst,
    /// Everything at or above a threshold.
    AtLeastThreshold,
}

/// A filtered view of the current population's individuals.
#[derive(Debug, Clone)]
pub struct MatingPool<'a> {
    members: Vec<&'a Individual>,
    strategy: PoolStrategy,
}

impl<'a> MatingPool<'a> {
    /// The whole population as a mating pool.
    pub fn whole(population: &'a Population) -> Self {
        Self {
            members: population.iter().collect(),
            strategy: PoolStrategy::WholePopulation,
        }
    }

    pub fn members(&self) -> &[&'a Individual] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn strategy(&self) -> PoolStrategy {
        self.strategy
    }

    /// Bit length of the pool members, 0 for an empty pool.
    pub fn individual_size(&self) -> usize {
        self.members.first().map_or(0, |ind| ind.len())
    }
}

/// Selection errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("All fitness values are equal; selection would yield an empty mating pool")]
    DegenerateSelection,
}

/// Keep every individual scoring strictly above the minimum.
///
/// The result is non-empty and strictly smaller than the population whenever
/// the scores are not all equal. An all-equal fitness vector is rejected.
pub fn select_better_than_worst<'a>(
    population: &'a Population,
    fitness: &FitnessVector,
) -> Result<MatingPool<'a>, SelectionError> {
    if fitness.all_equal() {
        return Err(SelectionError::DegenerateSelection);
    }
    let worst = fitness.min().ok_or(SelectionError::DegenerateSelection)?;
    let members = population
        .iter()
        .zip(fitness.scores())
        .filter(|&(_, &score)| score > worst)
        .map(|(individual, _)| individual)
        .collect();
    Ok(MatingPool {
        members,
        strategy: PoolStrategy::BetterThanWorst,
    })
}

/// Keep every individual scoring at or above `threshold`.
///
/// Empty when the threshold exceeds the best score.
pub fn select_at_least<'a>(
    population: &'a Population,
    fitness: &FitnessVector,
    threshold: f64,
) -> MatingPool<'a> {
    let members = population
        .iter()
        .zip(fitness.scores())
        .filter(|&(_, &score)| score as f64 >= threshold)
        .map(|(individual, _)| individual)
        .collect();
    MatingPool {
        members,
        strategy: PoolStrategy::AtLeastThreshold,
    }
}

/// Keep every individual scoring at or above the mean. Never empty for a
/// non-empty population: the best scorer always qualifies.
pub fn select_above_avg<'a>(population: &'a Population, fitness: &FitnessVector) -> MatingPool<'a> {
    select_at_least(population, fitness, fitness.mean())
}

/// True iff more than two distinct scores reach `threshold`.
pub fn any_two_greater_than(fitness: &FitnessVector, threshold: f64) -> bool {
    fitness.distinct_at_least(threshold) > 2
}

/// Chooses the mating pool for each generation.
#[derive(Debug, Clone, Copy)]
pub struct SelectionPolicy {
    variant: SearchVariant,
    gate: GateThreshold,
    fitness_function: FitnessFunction,
    individual_size: usize,
}

impl SelectionPolicy {
    pub fn new(
        variant: SearchVariant,
        gate: GateThreshold,
        fitness_function: FitnessFunction,
        individual_size: usize,
    ) -> Self {
        Self {
            variant,
            gate,
            fitness_function,
            individual_size,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            config.search_variant,
            config.gate_threshold,
            config.fitness_function,
            config.individual_size,
        )
    }

    /// Threshold the gated variant compares against.
    pub fn gate_threshold(&self, fitness: &FitnessVector) -> f64 {
        match self.gate {
            GateThreshold::PopulationMean => fitness.mean(),
            GateThreshold::ExpectedValue => {
                self.fitness_function.expected_value(self.individual_size)
            }
        }
    }

    /// Pick the mating pool for the current generation.
    ///
    /// The equal-fitness check runs before any filtering policy, so a
    /// uniform fitness vector yields the whole population instead of an
    /// empty pool.
    pub fn mating_pool<'a>(
        &self,
        population: &'a Population,
        fitness: &FitnessVector,
    ) -> Result<MatingPool<'a>, SelectionError> {
        if fitness.all_equal() {
            return Ok(MatingPool::whole(population));
        }

        match self.variant {
            SearchVariant::Simple => select_better_than_worst(population, fitness),
            SearchVariant::Gated => {
                let threshold = self.gate_threshold(fitness);
                if any_two_greater_than(fitness, threshold) {
                    Ok(select_at_least(population, fitness, threshold))
                } else {
                    select_better_than_worst(population, fitness)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::fitness::evaluate_population;
    use crate::compute::individual::{BitRng, create_population};
    use proptest::prelude::*;

    fn population(bits: &[&str]) -> Population {
        Population::from_individuals(bits.iter().map(|s| s.parse().unwrap()).collect()).unwrap()
    }

    fn pool_strings(pool: &MatingPool<'_>) -> Vec<String> {
        pool.members().iter().map(|ind| ind.to_string()).collect()
    }

    #[test]
    fn test_better_than_worst() {
        let pop = population(&["0000", "1000", "1100", "0000", "1110"]);
        let fitness = evaluate_population(&pop, FitnessFunction::LeadingOnes);

        let pool = select_better_than_worst(&pop, &fitness).unwrap();
        assert_eq!(pool_strings(&pool), vec!["1000", "1100", "1110"]);
        assert_eq!(pool.strategy(), PoolStrategy::BetterThanWorst);
    }

    #[test]
    fn test_better_than_worst_degenerate() {
        let pop = population(&["1100", "1101", "1100"]);
        let fitness = evaluate_population(&pop, FitnessFunction::LeadingOnes);
        assert!(fitness.all_equal());

        let err = select_better_than_worst(&pop, &fitness).unwrap_err();
        assert_eq!(err, SelectionError::DegenerateSelection);
    }

    #[test]
    fn test_above_avg_includes_ties() {
        // Scores 1, 2, 3, 2: mean is 2.
        let pop = population(&["1000", "1100", "1110", "1101"]);
        let fitness = evaluate_population(&pop, FitnessFunction::LeadingOnes);

        let pool = select_above_avg(&pop, &fitness);
        assert_eq!(pool_strings(&pool), vec!["1100", "1110", "1101"]);
    }

    #[test]
    fn test_select_at_least_can_be_empty() {
        let pop = population(&["1000", "1100"]);
        let fitness = evaluate_population(&pop, FitnessFunction::LeadingOnes);
        assert!(select_at_least(&pop, &fitness, 3.0).is_empty());
    }

    #[test]
    fn test_any_two_greater_than() {
        let fitness = FitnessVector::from_scores(vec![0, 1, 2, 3, 3]);
        assert!(any_two_greater_than(&fitness, 1.0));
        assert!(!any_two_greater_than(&fitness, 2.0));

        // Repeated values count once.
        let fitness = FitnessVector::from_scores(vec![5, 5, 5, 6, 6]);
        assert!(!any_two_greater_than(&fitness, 0.0));
    }

    #[test]
    fn test_policy_uniform_fitness_takes_whole_population() {
        let pop = population(&["1100", "1101", "1100"]);
        let fitness = evaluate_population(&pop, FitnessFunction::LeadingOnes);

        for variant in [SearchVariant::Simple, SearchVariant::Gated] {
            let policy = SelectionPolicy::new(
                variant,
                GateThreshold::PopulationMean,
                FitnessFunction::LeadingOnes,
                4,
            );
            let pool = policy.mating_pool(&pop, &fitness).unwrap();
            assert_eq!(pool.len(), 3);
            assert_eq!(pool.strategy(), PoolStrategy::WholePopulation);
        }
    }

    #[test]
    fn test_gated_policy_switches_on_distinct_count() {
        let policy = SelectionPolicy::new(
            SearchVariant::Gated,
            GateThreshold::PopulationMean,
            FitnessFunction::BitCount,
            4,
        );

        // Scores 0, 1, 2, 3, 4: mean 2, distinct qualifying {2, 3, 4}.
        let pop = population(&["0000", "1000", "1100", "1110", "1111"]);
        let fitness = evaluate_population(&pop, FitnessFunction::BitCount);
        let pool = policy.mating_pool(&pop, &fitness).unwrap();
        assert_eq!(pool.strategy(), PoolStrategy::AtLeastThreshold);
        assert_eq!(pool_strings(&pool), vec!["1100", "1110", "1111"]);

        // Scores 0, 4, 4: mean 8/3, only {4} qualifies.
        let pop = population(&["0000", "1111", "1111"]);
        let fitness = evaluate_population(&pop, FitnessFunction::BitCount);
        let pool = policy.mating_pool(&pop, &fitness).unwrap();
        assert_eq!(pool.strategy(), PoolStrategy::BetterThanWorst);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_gated_policy_expected_value_threshold() {
        let policy = SelectionPolicy::new(
            SearchVariant::Gated,
            GateThreshold::ExpectedValue,
            FitnessFunction::LeadingOnes,
            4,
        );
        let fitness = FitnessVector::from_scores(vec![0, 0, 0, 4]);
        assert_eq!(policy.gate_threshold(&fitness), 1.875);

        // Scores 0, 2, 3, 4: distinct {2, 3, 4} reach 1.875, mean is 2.25.
        let pop = population(&["0000", "1100", "1110", "1111"]);
        let fitness = evaluate_population(&pop, FitnessFunction::LeadingOnes);
        let pool = policy.mating_pool(&pop, &fitness).unwrap();
        assert_eq!(pool.strategy(), PoolStrategy::AtLeastThreshold);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_simple_policy_ignores_gate() {
        let policy = SelectionPolicy::new(
            SearchVariant::Simple,
            GateThreshold::PopulationMean,
            FitnessFunction::BitCount,
            4,
        );
        let pop = population(&["0000", "1000", "1100", "1110", "1111"]);
        let fitness = evaluate_population(&pop, FitnessFunction::BitCount);
        let pool = policy.mating_pool(&pop, &fitness).unwrap();
        assert_eq!(pool.strategy(), PoolStrategy::BetterThanWorst);
        assert_eq!(pool.len(), 4);
    }

    proptest! {
        #[test]
        fn prop_better_than_worst_strict_subset(
            size in 2usize..40,
            length in 1usize..24,
            seed in any::<u64>(),
        ) {
            let pop = create_population(size, length, &mut BitRng::new(seed));
            let fitness = evaluate_population(&pop, FitnessFunction::BitCount);
            match select_better_than_worst(&pop, &fitness) {
                Ok(pool) => {
                    prop_assert!(!fitness.all_equal());
                    prop_assert!(!pool.is_empty());
                    prop_assert!(pool.len() < pop.len());
                }
                Err(SelectionError::DegenerateSelection) => prop_assert!(fitness.all_equal()),
            }
        }

        #[test]
        fn prop_above_avg_non_empty(
            size in 1usize..40,
            length in 1usize..24,
            seed in any::<u64>(),
        ) {
            let pop = create_population(size, length, &mut BitRng::new(seed));
            for f in [FitnessFunction::BitCount, FitnessFunction::LeadingOnes] {
                let fitness = evaluate_population(&pop, f);
                let pool = select_above_avg(&pop, &fitness);
                prop_assert!(!pool.is_empty());
                prop_assert!(pool.len() <= pop.len());
            }
        }

        #[test]
        fn prop_policy_pool_bounds(
            size in 1usize..30,
            length in 1usize..16,
            seed in any::<u64>(),
            gated in any::<bool>(),
            expected in any::<bool>(),
        ) {
            let pop = create_population(size, length, &mut BitRng::new(seed));
            let variant = if gated { SearchVariant::Gated } else { SearchVariant::Simple };
            let gate = if expected {
                GateThreshold::ExpectedValue
            } else {
                GateThreshold::PopulationMean
            };
            for f in [FitnessFunction::BitCount, FitnessFunction::LeadingOnes] {
                let fitness = evaluate_population(&pop, f);
                let policy = SelectionPolicy::new(variant, gate, f, length);
                let pool = policy.mating_pool(&pop, &fitness).unwrap();
                prop_assert!(!pool.is_empty());
                prop_assert!(pool.len() <= pop.len());
            }
        }
    }
}
