//! Individual wrapper type
//!
//! This module provides the Individual type that wraps a genome with its
//! objective values and ranking metadata.

use serde::{Deserialize, Serialize};

use crate::fitness::traits::{Objective, Objectives};
use crate::genome::traits::EvolutionaryGenome;

/// An individual in the population
///
/// The genome is fixed at construction; variation always builds a new,
/// unevaluated individual, so objective values never go stale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Individual<G>
where
    G: EvolutionaryGenome,
{
    genome: G,
    objectives: Option<Objectives>,
    rank: Option<usize>,
    #[serde(with = "crate::serde_float")]
    crowding_distance: f64,
    birth_generation: usize,
}

impl<G> Individual<G>
where
    G: EvolutionaryGenome,
{
    /// Create a new individual with an unevaluated genome
    pub fn new(genome: G) -> Self {
        Self {
            genome,
            objectives: None,
            rank: None,
            crowding_distance: 0.0,
            birth_generation: 0,
        }
    }

    /// Create a new individual with known objective values
    pub fn with_objectives(genome: G, objectives: Objectives) -> Self {
        Self {
            objectives: Some(objectives),
            ..Self::new(genome)
        }
    }

    /// Create a new, unevaluated individual with birth generation
    pub fn with_generation(genome: G, generation: usize) -> Self {
        Self {
            birth_generation: generation,
            ..Self::new(genome)
        }
    }

    /// Get a reference to the genome
    pub fn genome(&self) -> &G {
        &self.genome
    }

    /// Check if this individual has current objective values
    pub fn is_evaluated(&self) -> bool {
        self.objectives.is_some()
    }

    /// Objective values, if evaluated
    pub fn objectives(&self) -> Option<&Objectives> {
        self.objectives.as_ref()
    }

    /// Set the objective values
    pub fn set_objectives(&mut self, objectives: Objectives) {
        self.objectives = Some(objectives);
    }

    /// Total cost, if evaluated
    pub fn cost(&self) -> Option<f64> {
        self.objectives.map(|o| o.cost)
    }

    /// Total error, if evaluated
    pub fn error(&self) -> Option<f64> {
        self.objectives.map(|o| o.error)
    }

    /// Value of one objective; unevaluated individuals sort last
    pub fn objective(&self, objective: Objective) -> f64 {
        self.objectives
            .map(|o| o.get(objective))
            .unwrap_or(f64::INFINITY)
    }

    /// Pareto front index from the last ranking pass (0 = non-dominated)
    pub fn rank(&self) -> Option<usize> {
        self.rank
    }

    /// Set the Pareto front index
    pub fn set_rank(&mut self, rank: usize) {
        self.rank = Some(rank);
    }

    /// Crowding distance from the last crowding pass
    pub fn crowding_distance(&self) -> f64 {
        self.crowding_distance
    }

    /// Set the crowding distance
    pub fn set_crowding_distance(&mut self, distance: f64) {
        self.crowding_distance = distance;
    }

    /// Generation in which this individual was created
    pub fn birth_generation(&self) -> usize {
        self.birth_generation
    }

    /// Check if this individual dominates another.
    ///
    /// Unevaluated individuals neither dominate nor are dominated.
    pub fn dominates(&self, other: &Self) -> bool {
        match (&self.objectives, &other.objectives) {
            (Some(a), Some(b)) => a.dominates(b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::allocation::Allocation;

    #[test]
    fn test_individual_new() {
        let individual = Individual::new(Allocation::new(vec![1, 2, 3]));

        assert!(!individual.is_evaluated());
        assert_eq!(individual.rank(), None);
        assert_eq!(individual.crowding_distance(), 0.0);
        assert_eq!(individual.birth_generation(), 0);
    }

    #[test]
    fn test_individual_with_objectives() {
        let individual =
            Individual::with_objectives(Allocation::new(vec![1]), Objectives::new(3.0, 4.0));

        assert!(individual.is_evaluated());
        assert_eq!(individual.cost(), Some(3.0));
        assert_eq!(individual.error(), Some(4.0));
    }

    #[test]
    fn test_unevaluated_never_dominates() {
        let evaluated =
            Individual::with_objectives(Allocation::new(vec![1]), Objectives::new(1.0, 1.0));
        let unevaluated = Individual::new(Allocation::new(vec![1]));

        assert!(!evaluated.dominates(&unevaluated));
        assert!(!unevaluated.dominates(&evaluated));
    }

    #[test]
    fn test_objective_of_unevaluated_is_infinite() {
        let individual = Individual::new(Allocation::new(vec![1]));
        assert!(individual.objective(Objective::Cost).is_infinite());
    }

    #[test]
    fn test_infinite_crowding_survives_json() {
        let mut individual =
            Individual::with_objectives(Allocation::new(vec![2, 3]), Objectives::new(1.5, 4.0));
        individual.set_rank(0);
        individual.set_crowding_distance(f64::INFINITY);

        let json = serde_json::to_string(&individual).unwrap();
        let back: Individual<Allocation> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, individual);
    }

    #[test]
    fn test_with_generation() {
        let individual = Individual::with_generation(Allocation::new(vec![1]), 10);
        assert_eq!(individual.birth_generation(), 10);
    }
}
