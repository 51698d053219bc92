//! Diagnostics and results
//!
//! Per-generation statistics, the final ranked result, and the observer
//! hooks that receive them.

pub mod observer;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::genome::allocation::Allocation;
use crate::population::individual::Individual;
use crate::population::population::Population;

pub use observer::*;

/// Statistics for a single generation
///
/// Objective statistics are NaN when no individual is evaluated; they are
/// serialized as `"NaN"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number
    pub generation: usize,
    /// Number of individuals
    pub population_size: usize,
    /// Number of fronts (0 when the population is unranked)
    pub front_count: usize,
    /// Number of rank-0 individuals
    pub pareto_size: usize,
    /// Lowest cost
    #[serde(with = "crate::serde_float")]
    pub min_cost: f64,
    /// Highest cost
    #[serde(with = "crate::serde_float")]
    pub max_cost: f64,
    /// Mean cost
    #[serde(with = "crate::serde_float")]
    pub mean_cost: f64,
    /// Lowest error
    #[serde(with = "crate::serde_float")]
    pub min_error: f64,
    /// Highest error
    #[serde(with = "crate::serde_float")]
    pub max_error: f64,
    /// Mean error
    #[serde(with = "crate::serde_float")]
    pub mean_error: f64,
    /// Largest deviation of an allocation's unit total from the budget
    pub budget_drift: u64,
}

impl GenerationStats {
    /// Compute statistics from a population
    ///
    /// Objective statistics only cover evaluated individuals; with none
    /// evaluated they are NaN.
    pub fn from_population(
        population: &Population<Allocation>,
        generation: usize,
        budget: u32,
    ) -> Self {
        let evaluated: Vec<(f64, f64)> = population
            .iter()
            .filter_map(|i| i.objectives().map(|o| (o.cost, o.error)))
            .collect();

        let (min_cost, max_cost, mean_cost) = summarize(evaluated.iter().map(|p| p.0));
        let (min_error, max_error, mean_error) = summarize(evaluated.iter().map(|p| p.1));

        let front_count = if population.iter().all(|i| i.rank().is_some()) {
            population
                .iter()
                .filter_map(|i| i.rank())
                .max()
                .map_or(0, |r| r + 1)
        } else {
            0
        };

        Self {
            generation,
            population_size: population.len(),
            front_count,
            pareto_size: population.iter().filter(|i| i.rank() == Some(0)).count(),
            min_cost,
            max_cost,
            mean_cost,
            min_error,
            max_error,
            mean_error,
            budget_drift: population
                .iter()
                .map(|i| i.genome().drift_from(budget))
                .max()
                .unwrap_or(0),
        }
    }
}

fn summarize(values: impl Iterator<Item = f64>) -> (f64, f64, f64) {
    let (count, min, max, sum) = values.fold(
        (0usize, f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(count, min, max, sum), v| (count + 1, min.min(v), max.max(v), sum + v),
    );
    if count == 0 {
        (f64::NAN, f64::NAN, f64::NAN)
    } else {
        (min, max, sum / count as f64)
    }
}

/// Statistics collector for an entire run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Statistics per generation
    pub generations: Vec<GenerationStats>,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
}

impl EvolutionStats {
    /// Create a new stats collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation's statistics
    pub fn record(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    /// Get the number of generations recorded
    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// Lowest cost seen per generation
    pub fn min_cost_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.min_cost).collect()
    }

    /// Lowest error seen per generation
    pub fn min_error_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.min_error).collect()
    }

    /// Set the total runtime
    pub fn set_runtime(&mut self, runtime: std::time::Duration) {
        self.total_runtime_ms = runtime.as_secs_f64() * 1000.0;
    }
}

/// Individuals sharing one Pareto rank
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Front {
    /// Rank of every member (0 = non-dominated)
    pub rank: usize,
    /// Members of this front
    pub members: Vec<Individual<Allocation>>,
}

impl Front {
    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the front has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Final ranked population of a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Fronts in increasing rank order
    pub fronts: Vec<Front>,
    /// Number of generations run
    pub generations: usize,
    /// Statistics history
    pub stats: EvolutionStats,
}

impl EvolutionResult {
    /// The non-dominated front, if any
    pub fn pareto_front(&self) -> Option<&Front> {
        self.fronts.first()
    }

    /// Total number of individuals across all fronts
    pub fn population_size(&self) -> usize {
        self.fronts.iter().map(Front::len).sum()
    }

    /// Iterate over every individual in rank order
    pub fn individuals(&self) -> impl Iterator<Item = &Individual<Allocation>> {
        self.fronts.iter().flat_map(|f| f.members.iter())
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for EvolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for front in &self.fronts {
            writeln!(f, "Pareto Front {}:", front.rank + 1)?;
            for individual in &front.members {
                let cost = individual.cost().unwrap_or(f64::NAN);
                let error = individual.error().unwrap_or(f64::NAN);
                let units: Vec<String> = individual
                    .genome()
                    .units()
                    .iter()
                    .map(|u| u.to_string())
                    .collect();
                writeln!(f, "  Cost: {:.2}, Error: {:.2}", cost, error)?;
                writeln!(f, "  Allocation: {}", units.join(", "))?;
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::traits::Objectives;
    use approx::assert_relative_eq;

    fn individual(
        units: Vec<u32>,
        cost: f64,
        error: f64,
        rank: Option<usize>,
    ) -> Individual<Allocation> {
        let mut individual =
            Individual::with_objectives(Allocation::new(units), Objectives::new(cost, error));
        if let Some(rank) = rank {
            individual.set_rank(rank);
        }
        individual
    }

    #[test]
    fn test_generation_stats_ranked() {
        let population = Population::from_individuals(vec![
            individual(vec![10, 0], 10.0, 50.0, Some(0)),
            individual(vec![0, 10], 50.0, 10.0, Some(0)),
            individual(vec![8, 4], 28.0, 44.0, Some(1)),
        ]);
        let stats = GenerationStats::from_population(&population, 3, 10);

        assert_eq!(stats.generation, 3);
        assert_eq!(stats.population_size, 3);
        assert_eq!(stats.front_count, 2);
        assert_eq!(stats.pareto_size, 2);
        assert_relative_eq!(stats.min_cost, 10.0);
        assert_relative_eq!(stats.max_cost, 50.0);
        assert_relative_eq!(stats.mean_error, 104.0 / 3.0);
        assert_eq!(stats.budget_drift, 2);
    }

    #[test]
    fn test_generation_stats_unranked() {
        let population = Population::from_individuals(vec![
            individual(vec![5, 5], 30.0, 30.0, None),
            individual(vec![5, 5], 30.0, 30.0, Some(0)),
        ]);
        let stats = GenerationStats::from_population(&population, 0, 10);
        assert_eq!(stats.front_count, 0);
        assert_eq!(stats.pareto_size, 1);
    }

    #[test]
    fn test_generation_stats_unevaluated() {
        let population =
            Population::from_individuals(vec![Individual::new(Allocation::new(vec![1]))]);
        let stats = GenerationStats::from_population(&population, 0, 1);
        assert!(stats.min_cost.is_nan());
        assert_eq!(stats.budget_drift, 0);
    }

    #[test]
    fn test_result_display() {
        let result = EvolutionResult {
            fronts: vec![
                Front {
                    rank: 0,
                    members: vec![individual(vec![10, 0], 10.0, 50.0, Some(0))],
                },
                Front {
                    rank: 1,
                    members: vec![individual(vec![6, 4], 26.5, 34.25, Some(1))],
                },
            ],
            generations: 0,
            stats: EvolutionStats::new(),
        };

        let report = result.to_string();
        assert_eq!(
            report,
            "Pareto Front 1:\n  Cost: 10.00, Error: 50.00\n  Allocation: 10, 0\n\n\
             Pareto Front 2:\n  Cost: 26.50, Error: 34.25\n  Allocation: 6, 4\n\n"
        );
        assert_eq!(result.population_size(), 2);
        assert_eq!(result.pareto_front().map(Front::len), Some(1));
    }

    #[test]
    fn test_result_to_json() {
        let result = EvolutionResult {
            fronts: vec![Front {
                rank: 0,
                members: vec![individual(vec![3], 3.0, 1.0, Some(0))],
            }],
            generations: 2,
            stats: EvolutionStats::new(),
        };
        let json = result.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["generations"], 2);
        assert_eq!(value["fronts"][0]["members"][0]["genome"]["units"][0], 3);
    }

    #[test]
    fn test_result_json_roundtrip_with_non_finite_values() {
        let mut boundary = individual(vec![10, 0], 10.0, 50.0, Some(0));
        boundary.set_crowding_distance(f64::INFINITY);
        let unevaluated =
            Population::from_individuals(vec![Individual::new(Allocation::new(vec![1]))]);

        let mut stats = EvolutionStats::new();
        stats.record(GenerationStats::from_population(&unevaluated, 0, 1));
        let result = EvolutionResult {
            fronts: vec![Front {
                rank: 0,
                members: vec![boundary],
            }],
            generations: 1,
            stats,
        };

        let back: EvolutionResult = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(back.fronts, result.fronts);
        assert!(back.fronts[0].members[0].crowding_distance().is_infinite());
        assert_eq!(back.stats.num_generations(), 1);
        assert!(back.stats.generations[0].min_cost.is_nan());
        assert!(back.stats.generations[0].mean_error.is_nan());
    }

    #[test]
    fn test_evolution_stats_history() {
        let mut stats = EvolutionStats::new();
        let population =
            Population::from_individuals(vec![individual(vec![1], 4.0, 2.0, Some(0))]);
        stats.record(GenerationStats::from_population(&population, 0, 1));
        stats.record(GenerationStats::from_population(&population, 1, 1));

        assert_eq!(stats.num_generations(), 2);
        assert_eq!(stats.min_cost_history(), vec![4.0, 4.0]);
        assert_eq!(stats.min_error_history(), vec![2.0, 2.0]);
    }
}
