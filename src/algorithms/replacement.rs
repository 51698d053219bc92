//! Replacement policies
//!
//! Reduce a candidate population to the target size. Both policies rank the
//! candidates first, so survivors carry a fresh rank.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::algorithms::crowding::calculate_front_crowding;
use crate::algorithms::dominance::SortStrategy;
use crate::fitness::traits::Objective;
use crate::genome::traits::EvolutionaryGenome;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// How the next population is chosen from the candidates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplacementPolicy {
    /// Rank by counting, then keep the cheapest individuals.
    ///
    /// Ranks are only informational here; the cut is made on cost alone.
    CostTruncation,
    /// Fill front by front; the overflowing front is cut by descending
    /// crowding distance.
    CrowdedElitism,
}

impl ReplacementPolicy {
    /// The sorting strategy this policy ranks with
    pub fn sort_strategy(&self) -> SortStrategy {
        match self {
            Self::CostTruncation => SortStrategy::RankCounting,
            Self::CrowdedElitism => SortStrategy::FastNonDominated,
        }
    }

    /// Reduce `candidates` to at most `target` individuals
    pub fn replace<G: EvolutionaryGenome>(
        &self,
        candidates: Population<G>,
        target: usize,
    ) -> Population<G> {
        let generation = candidates.generation();
        let individuals = candidates.into_individuals();
        let survivors = match self {
            Self::CostTruncation => cost_truncation(individuals, target),
            Self::CrowdedElitism => crowded_elitism(individuals, target),
        };
        Population::from_individuals(survivors).at_generation(generation)
    }
}

fn cost_truncation<G: EvolutionaryGenome>(
    mut individuals: Vec<Individual<G>>,
    target: usize,
) -> Vec<Individual<G>> {
    SortStrategy::RankCounting.sort(&mut individuals);

    individuals.sort_by(|a, b| {
        a.objective(Objective::Cost)
            .partial_cmp(&b.objective(Objective::Cost))
            .unwrap_or(Ordering::Equal)
    });
    individuals.truncate(target);
    individuals
}

fn crowded_elitism<G: EvolutionaryGenome>(
    mut individuals: Vec<Individual<G>>,
    target: usize,
) -> Vec<Individual<G>> {
    let fronts = SortStrategy::FastNonDominated.sort(&mut individuals);
    calculate_front_crowding(&mut individuals, &fronts);

    let mut slots: Vec<Option<Individual<G>>> = individuals.into_iter().map(Some).collect();
    let mut survivors = Vec::with_capacity(target);

    for mut front in fronts {
        if survivors.len() >= target {
            break;
        }

        front.sort_by(|&a, &b| {
            let da = slots[a].as_ref().map_or(0.0, |i| i.crowding_distance());
            let db = slots[b].as_ref().map_or(0.0, |i| i.crowding_distance());
            db.partial_cmp(&da).unwrap_or(Ordering::Equal)
        });

        let remaining = target - survivors.len();
        if front.len() > remaining {
            trace!(
                front_size = front.len(),
                remaining,
                "truncating boundary front by crowding distance"
            );
        }
        survivors.extend(front.into_iter().take(remaining).filter_map(|i| slots[i].take()));
    }

    survivors
}
