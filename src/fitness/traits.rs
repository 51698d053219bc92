//! Fitness traits
//!
//! This module defines the objective vector and the multi-objective evaluation
//! trait. Both objectives are minimized.

use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::traits::EvolutionaryGenome;

/// The two minimized objectives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Objective {
    /// Total cost of an allocation
    Cost,
    /// Total expected error of an allocation
    Error,
}

impl Objective {
    /// All objectives in evaluation order
    pub const ALL: [Objective; 2] = [Objective::Cost, Objective::Error];
}

/// Objective values of an evaluated individual
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Objectives {
    /// Total cost
    pub cost: f64,
    /// Total error
    pub error: f64,
}

impl Objectives {
    /// Create a new objective pair
    pub fn new(cost: f64, error: f64) -> Self {
        Self { cost, error }
    }

    /// Value of a single objective
    pub fn get(&self, objective: Objective) -> f64 {
        match objective {
            Objective::Cost => self.cost,
            Objective::Error => self.error,
        }
    }

    /// Check if this point Pareto-dominates another
    /// (no objective worse and at least one strictly better, since we minimize)
    pub fn dominates(&self, other: &Self) -> bool {
        self.cost <= other.cost
            && self.error <= other.error
            && (self.cost < other.cost || self.error < other.error)
    }
}

/// Multi-objective fitness function trait
#[cfg(feature = "parallel")]
pub trait MultiObjectiveFitness<G: EvolutionaryGenome>: Send + Sync {
    /// Evaluate all objectives for a genome
    fn evaluate(&self, genome: &G) -> Result<Objectives, GenomeError>;
}

/// Multi-objective fitness function trait
#[cfg(not(feature = "parallel"))]
pub trait MultiObjectiveFitness<G: EvolutionaryGenome> {
    /// Evaluate all objectives for a genome
    fn evaluate(&self, genome: &G) -> Result<Objectives, GenomeError>;
}
