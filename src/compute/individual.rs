//! Bit-vector individuals, populations and the random source that creates them.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::prelude::*;
use rayon::prelude::*;

/// A candidate solution: a fixed-length bit vector.
///
/// Individuals are never modified after construction; recombination always
/// produces new ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Individual {
    bits: Vec<bool>,
}

impl Individual {
    /// Wrap an explicit bit vector.
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The underlying bits.
    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Bit at `position`.
    #[inline]
    pub fn bit(&self, position: usize) -> bool {
        self.bits[position]
    }

    /// Number of 1-bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Length of the initial run of 1-bits.
    pub fn leading_ones(&self) -> usize {
        self.bits.iter().take_while(|&&b| b).count()
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Individual {
    type Err = PopulationError;

    /// Parse a string of `0` and `1` characters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(PopulationError::InvalidBit {
                    position,
                    found: other,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bits })
    }
}

/// An ordered, fixed-size collection of equal-length individuals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Build a population, checking that it is non-empty and that every
    /// individual has the same length.
    pub fn from_individuals(individuals: Vec<Individual>) -> Result<Self, PopulationError> {
        let first = individuals.first().ok_or(PopulationError::Empty)?;
        let expected = first.len();
        if let Some((index, individual)) = individuals
            .iter()
            .enumerate()
            .find(|(_, ind)| ind.len() != expected)
        {
            return Err(PopulationError::LengthMismatch {
                index,
                expected,
                found: individual.len(),
            });
        }
        Ok(Self { individuals })
    }

    /// Wrap offspring synthesised from a single mating pool, which share a
    /// length by construction.
    pub(crate) fn from_offspring(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// Number of individuals.
    #[inline]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Length shared by every individual.
    pub fn individual_size(&self) -> usize {
        self.individuals.first().map_or(0, Individual::len)
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    /// True when every individual is identical. Such a population is a
    /// fixed point of convex recombination.
    pub fn is_uniform(&self) -> bool {
        match self.individuals.split_first() {
            Some((first, rest)) => rest.iter().all(|ind| ind == first),
            None => true,
        }
    }

    /// Number of distinct individuals.
    pub fn distinct_count(&self) -> usize {
        self.individuals.iter().collect::<HashSet<_>>().len()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

/// Errors from constructing individuals or populations by hand.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PopulationError {
    #[error("Population must contain at least one individual")]
    Empty,
    #[error("Individual {index} has length {found}, expected {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("Invalid bit {found:?} at position {position}")]
    InvalidBit { position: usize, found: char },
}

/// Random source for a search run.
///
/// Work that fans out over threads draws one child seed per item from this
/// generator, in order, so results do not depend on thread scheduling.
pub struct BitRng {
    rng: StdRng,
}

impl BitRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw a seed for a derived generator.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Run `f` once per item in parallel, each with its own generator
    /// seeded from this one. Output order matches item order.
    pub fn fan_out<T, F>(&mut self, count: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&mut StdRng) -> T + Sync + Send,
    {
        let seeds: Vec<u64> = (0..count).map(|_| self.next_seed()).collect();
        seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                f(&mut rng)
            })
            .collect()
    }
}

impl RngCore for BitRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Draw `length` independent uniform random bits.
pub fn create_individual<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Individual {
    Individual {
        bits: (0..length).map(|_| rng.gen_bool(0.5)).collect(),
    }
}

/// Draw `size` independent random individuals of `length` bits.
pub fn create_population(size: usize, length: usize, rng: &mut BitRng) -> Population {
    Population {
        individuals: rng.fan_out(size, |rng| create_individual(length, rng)),
    }
}
