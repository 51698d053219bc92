//! Non-dominated sorting
//!
//! Partitions a population into Pareto fronts. Two strategies are provided:
//!
//! - [`rank_counting_sort`]: for every individual, scans the whole population to
//!   count its dominators and collect the individuals it dominates.
//! - [`fast_non_dominated_sort`]: visits each unordered pair exactly once and
//!   records the relation in both directions (Deb et al., 2002).
//!
//! Both peel fronts the same way and produce identical partitions. Bookkeeping
//! is by position in the slice for the duration of one pass.

use serde::{Deserialize, Serialize};

use crate::genome::traits::EvolutionaryGenome;
use crate::population::individual::Individual;

/// Fronts as lists of positions into the sorted slice; `fronts[0]` is the
/// non-dominated front
pub type Fronts = Vec<Vec<usize>>;

/// Which non-dominated sorting strategy to apply
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortStrategy {
    /// Per-individual full scan
    RankCounting,
    /// Single pass over unordered pairs
    FastNonDominated,
}

impl SortStrategy {
    /// Sort the population into fronts and assign ranks
    pub fn sort<G: EvolutionaryGenome>(&self, population: &mut [Individual<G>]) -> Fronts {
        match self {
            Self::RankCounting => rank_counting_sort(population),
            Self::FastNonDominated => fast_non_dominated_sort(population),
        }
    }
}

/// Rank-counting non-dominated sort
///
/// Returns fronts where `front[0]` is the Pareto-optimal front
pub fn rank_counting_sort<G: EvolutionaryGenome>(population: &mut [Individual<G>]) -> Fronts {
    let n = population.len();
    if n == 0 {
        return vec![];
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_set: Vec<Vec<usize>> = vec![vec![]; n];

    for p in 0..n {
        for q in 0..n {
            if population[p].dominates(&population[q]) {
                dominated_set[p].push(q);
            } else if population[q].dominates(&population[p]) {
                domination_count[p] += 1;
            }
        }
    }

    peel_fronts(population, &dominated_set, domination_count)
}

/// Fast non-dominated sort
///
/// Returns fronts where `front[0]` is the Pareto-optimal front
pub fn fast_non_dominated_sort<G: EvolutionaryGenome>(
    population: &mut [Individual<G>],
) -> Fronts {
    let n = population.len();
    if n == 0 {
        return vec![];
    }

    // domination_count[i] = number of individuals that dominate i
    let mut domination_count = vec![0usize; n];
    // dominated_set[i] = set of individuals that i dominates
    let mut dominated_set: Vec<Vec<usize>> = vec![vec![]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            if population[i].dominates(&population[j]) {
                dominated_set[i].push(j);
                domination_count[j] += 1;
            } else if population[j].dominates(&population[i]) {
                dominated_set[j].push(i);
                domination_count[i] += 1;
            }
        }
    }

    peel_fronts(population, &dominated_set, domination_count)
}

/// Peel successive fronts off the domination graph, assigning ranks as it goes.
///
/// Terminates because every peeled individual's dominated set only decreases
/// counts, and an individual joins a front exactly once (when its count hits zero).
fn peel_fronts<G: EvolutionaryGenome>(
    population: &mut [Individual<G>],
    dominated_set: &[Vec<usize>],
    mut domination_count: Vec<usize>,
) -> Fronts {
    let mut fronts: Fronts = vec![];
    let mut current_front: Vec<usize> = (0..population.len())
        .filter(|&i| domination_count[i] == 0)
        .collect();

    let mut rank = 0;
    while !current_front.is_empty() {
        for &i in &current_front {
            population[i].set_rank(rank);
        }

        let mut next_front = vec![];
        for &i in &current_front {
            for &j in &dominated_set[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    next_front.push(j);
                }
            }
        }

        fronts.push(current_front);
        current_front = next_front;
        rank += 1;
    }

    fronts
}
