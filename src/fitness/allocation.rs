//! Allocation fitness
//!
//! Linear cost and error of an allocation against a worker registry.

use crate::error::GenomeError;
use crate::fitness::traits::{MultiObjectiveFitness, Objectives};
use crate::fitness::workers::WorkerRegistry;
use crate::genome::allocation::Allocation;

/// Evaluates `cost = Σ units[i] * cost_rate[i]` and `error = Σ units[i] * error_rate[i]`
#[derive(Clone, Debug)]
pub struct AllocationFitness {
    registry: WorkerRegistry,
}

impl AllocationFitness {
    /// Create an evaluator over the given workers
    pub fn new(registry: WorkerRegistry) -> Self {
        Self { registry }
    }

    /// The workers this evaluator scores against
    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }
}

impl MultiObjectiveFitness<Allocation> for AllocationFitness {
    fn evaluate(&self, genome: &Allocation) -> Result<Objectives, GenomeError> {
        if genome.len() != self.registry.len() {
            return Err(GenomeError::DimensionMismatch {
                expected: self.registry.len(),
                actual: genome.len(),
            });
        }

        let objectives = genome
            .units()
            .iter()
            .zip(self.registry.iter())
            .fold(Objectives::default(), |acc, (&units, worker)| {
                let units = units as f64;
                Objectives::new(
                    acc.cost + units * worker.cost_rate,
                    acc.error + units * worker.error_rate,
                )
            });
        Ok(objectives)
    }
}
