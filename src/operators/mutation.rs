//! Mutation operators
//!
//! This module provides mutation operators for allocation genomes.

use rand::Rng;
use tracing::trace;

use crate::genome::allocation::Allocation;
use crate::operators::traits::MutationOperator;

/// Transfer mutation
///
/// Moves a random positive amount of units from a slot holding units to a
/// different slot. The unit total is preserved. Allocations with fewer than
/// two occupied slots are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct TransferMutation {
    /// Upper bound on the amount moved in one mutation (None = whole slot)
    pub max_transfer: Option<u32>,
}

impl TransferMutation {
    /// Create a transfer mutation that may move a slot's whole content
    pub fn new() -> Self {
        Self { max_transfer: None }
    }

    /// Create a transfer mutation that moves at most `max` units
    pub fn capped(max: u32) -> Self {
        Self {
            max_transfer: Some(max),
        }
    }
}

impl MutationOperator<Allocation> for TransferMutation {
    fn mutate<R: Rng>(&self, genome: &mut Allocation, rng: &mut R) {
        let n = genome.len();
        let occupied = genome.positive_indices();
        if n < 2 || occupied.len() < 2 {
            trace!(slots = n, occupied = occupied.len(), "mutation skipped");
            return;
        }

        let source = occupied[rng.gen_range(0..occupied.len())];
        let mut target = rng.gen_range(0..n);
        while target == source {
            target = rng.gen_range(0..n);
        }

        let held = genome[source];
        let upper = self.max_transfer.map_or(held, |cap| held.min(cap.max(1)));
        let amount = rng.gen_range(1..=upper);

        genome.transfer(source, target, amount);
    }
}
