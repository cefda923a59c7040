//! Benchmark fitness functions and per-generation fitness vectors.
//!
//! Both landscapes score an individual of `n` bits in `[0, n]`:
//!
//! - `BitCount` (OneMax): number of 1-bits.
//! - `LeadingOnes`: length of the initial run of 1-bits.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::schema::FitnessFunction;

use super::individual::{Individual, Population};

impl FitnessFunction {
    /// Score a single individual.
    #[inline]
    pub fn evaluate(&self, individual: &Individual) -> usize {
        match self {
            FitnessFunction::BitCount => individual.count_ones(),
            FitnessFunction::LeadingOnes => individual.leading_ones(),
        }
    }

    /// Expected score of a uniform random individual of `individual_size`
    /// bits, in closed form.
    pub fn expected_value(&self, individual_size: usize) -> f64 {
        match self {
            FitnessFunction::BitCount => individual_size as f64 * 0.5,
            // Sum of fitnesses over strings with a leading one, 2^n - 1,
            // divided by their count 2^(n-1). Tends to 2.
            FitnessFunction::LeadingOnes => {
                let exponent = 1i32.saturating_sub(individual_size.min(i32::MAX as usize) as i32);
                2.0 - 2f64.powi(exponent)
            }
        }
    }

    /// Optimal score for `individual_size` bits.
    pub fn max_value(&self, individual_size: usize) -> usize {
        individual_size
    }
}

/// Fitness scores, index-aligned with the population they were computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitnessVector {
    scores: Vec<usize>,
}

impl FitnessVector {
    pub fn from_scores(scores: Vec<usize>) -> Self {
        Self { scores }
    }

    pub fn scores(&self) -> &[usize] {
        &self.scores
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<usize> {
        self.scores.get(index).copied()
    }

    pub fn min(&self) -> Option<usize> {
        self.scores.iter().copied().min()
    }

    pub fn max(&self) -> Option<usize> {
        self.scores.iter().copied().max()
    }

    /// Arithmetic mean, 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<usize>() as f64 / self.scores.len() as f64
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .scores
            .iter()
            .map(|&s| (s as f64 - mean).powi(2))
            .sum::<f64>()
            / self.scores.len() as f64;
        variance.sqrt()
    }

    /// True when every score is the same (vacuously true when empty).
    pub fn all_equal(&self) -> bool {
        match self.scores.split_first() {
            Some((first, rest)) => rest.iter().all(|s| s == first),
            None => true,
        }
    }

    /// Number of distinct scores at or above `threshold`.
    pub fn distinct_at_least(&self, threshold: f64) -> usize {
        self.scores
            .iter()
            .filter(|&&s| s as f64 >= threshold)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Score every individual, preserving order.
pub fn evaluate_population(population: &Population, fitness: FitnessFunction) -> FitnessVector {
    let scores = population
        .individuals()
        .par_iter()
        .map(|individual| fitness.evaluate(individual))
        .collect();
    FitnessVector { scores }
}
