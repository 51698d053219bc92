//! Crowding distance
//!
//! Density estimate within a single front: the sum over objectives of the
//! normalized gap between an individual's two neighbours. Boundary individuals
//! get an infinite distance so truncation never drops the extremes.

use std::cmp::Ordering;

use crate::fitness::traits::Objective;
use crate::genome::traits::EvolutionaryGenome;
use crate::population::individual::Individual;

/// Calculate crowding distance for a front
///
/// `front` holds positions into `population`. Distances of the front's members
/// are reset before accumulation; other individuals are left untouched.
pub fn calculate_crowding_distance<G: EvolutionaryGenome>(
    population: &mut [Individual<G>],
    front: &[usize],
) {
    let n = front.len();
    if n == 0 {
        return;
    }

    for &i in front {
        population[i].set_crowding_distance(0.0);
    }

    for objective in Objective::ALL {
        let mut sorted: Vec<usize> = front.to_vec();
        sorted.sort_by(|&a, &b| {
            population[a]
                .objective(objective)
                .partial_cmp(&population[b].objective(objective))
                .unwrap_or(Ordering::Equal)
        });

        population[sorted[0]].set_crowding_distance(f64::INFINITY);
        population[sorted[n - 1]].set_crowding_distance(f64::INFINITY);

        let obj_min = population[sorted[0]].objective(objective);
        let obj_max = population[sorted[n - 1]].objective(objective);
        let obj_range = obj_max - obj_min;
        if obj_range == 0.0 || !obj_range.is_finite() {
            continue;
        }

        for k in 1..n.saturating_sub(1) {
            let prev = population[sorted[k - 1]].objective(objective);
            let next = population[sorted[k + 1]].objective(objective);
            let idx = sorted[k];
            let distance = population[idx].crowding_distance() + (next - prev) / obj_range;
            population[idx].set_crowding_distance(distance);
        }
    }
}

/// Calculate crowding distance for every front
pub fn calculate_front_crowding<G: EvolutionaryGenome>(
    population: &mut [Individual<G>],
    fronts: &[Vec<usize>],
) {
    for front in fronts {
        calculate_crowding_distance(population, front);
    }
}
