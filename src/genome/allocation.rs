//! Allocation genome
//!
//! A fixed-length vector of non-negative work-unit counts, one slot per worker.

use std::ops::Index;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::genome::traits::EvolutionaryGenome;

/// Work units assigned to each worker, indexed by worker position
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allocation {
    units: Vec<u32>,
}

impl Allocation {
    /// Create an allocation from explicit unit counts
    pub fn new(units: Vec<u32>) -> Self {
        Self { units }
    }

    /// Create an allocation with every slot empty
    pub fn zeros(num_workers: usize) -> Self {
        Self {
            units: vec![0; num_workers],
        }
    }

    /// Generate a random allocation that spends exactly `budget` units.
    ///
    /// Repeatedly adds a chunk drawn from `[1, min(remaining, max_chunk)]` to a
    /// uniformly chosen slot until the budget is exhausted.
    pub fn random<R: Rng>(rng: &mut R, num_workers: usize, budget: u32, max_chunk: u32) -> Self {
        let mut allocation = Self::zeros(num_workers);
        if num_workers == 0 {
            return allocation;
        }

        let max_chunk = max_chunk.max(1);
        let mut remaining = budget;
        while remaining > 0 {
            let slot = rng.gen_range(0..num_workers);
            let chunk = rng.gen_range(1..=remaining.min(max_chunk));
            allocation.units[slot] += chunk;
            remaining -= chunk;
        }
        allocation
    }

    /// Unit counts per worker
    pub fn units(&self) -> &[u32] {
        &self.units
    }

    /// Number of slots (workers)
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if the allocation has no slots
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Total units across all slots
    pub fn total(&self) -> u64 {
        self.units.iter().map(|&u| u as u64).sum()
    }

    /// Indices of slots holding at least one unit
    pub fn positive_indices(&self) -> Vec<usize> {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, &u)| u > 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Move `amount` units from slot `from` to slot `to`.
    ///
    /// Panics if `from` holds fewer than `amount` units.
    pub fn transfer(&mut self, from: usize, to: usize, amount: u32) {
        assert!(
            self.units[from] >= amount,
            "cannot transfer {} units from a slot holding {}",
            amount,
            self.units[from]
        );
        self.units[from] -= amount;
        self.units[to] += amount;
    }

    /// Absolute difference between the allocated total and `budget`
    pub fn drift_from(&self, budget: u32) -> u64 {
        self.total().abs_diff(budget as u64)
    }
}

impl Index<usize> for Allocation {
    type Output = u32;

    fn index(&self, index: usize) -> &u32 {
        &self.units[index]
    }
}

impl From<Vec<u32>> for Allocation {
    fn from(units: Vec<u32>) -> Self {
        Self::new(units)
    }
}

impl EvolutionaryGenome for Allocation {
    type Allele = u32;

    fn genes(&self) -> &[u32] {
        &self.units
    }

    fn from_genes(genes: Vec<u32>) -> Self {
        Self::new(genes)
    }
}
