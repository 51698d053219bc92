//! Selection operators
//!
//! Binary mating selection. Each call draws two individuals uniformly with
//! replacement and keeps one of them.

use rand::Rng;

use crate::genome::traits::EvolutionaryGenome;
use crate::operators::traits::SelectionOperator;
use crate::population::individual::Individual;

/// Binary tournament on Pareto rank
///
/// Keeps the lower-ranked of the two; on a tie the second draw wins.
/// Unranked individuals lose to any ranked one.
#[derive(Clone, Debug, Default)]
pub struct RankTournament;

impl RankTournament {
    /// Create a new rank tournament
    pub fn new() -> Self {
        Self
    }
}

impl<G: EvolutionaryGenome> SelectionOperator<G> for RankTournament {
    fn select<R: Rng>(&self, population: &[Individual<G>], rng: &mut R) -> usize {
        assert!(!population.is_empty(), "Population cannot be empty");

        let i = rng.gen_range(0..population.len());
        let j = rng.gen_range(0..population.len());

        let rank_i = population[i].rank().unwrap_or(usize::MAX);
        let rank_j = population[j].rank().unwrap_or(usize::MAX);
        if rank_i < rank_j {
            i
        } else {
            j
        }
    }
}

/// Random pairing
///
/// Keeps either draw with equal probability, ignoring rank.
#[derive(Clone, Debug)]
pub struct RandomPairing {
    /// Probability of keeping the first draw
    pub first_probability: f64,
}

impl RandomPairing {
    /// Create a fair random pairing
    pub fn new() -> Self {
        Self {
            first_probability: 0.5,
        }
    }
}

impl Default for RandomPairing {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: EvolutionaryGenome> SelectionOperator<G> for RandomPairing {
    fn select<R: Rng>(&self, population: &[Individual<G>], rng: &mut R) -> usize {
        assert!(!population.is_empty(), "Population cannot be empty");

        let i = rng.gen_range(0..population.len());
        let j = rng.gen_range(0..population.len());

        if rng.gen::<f64>() < self.first_probability {
            i
        } else {
            j
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::allocation::Allocation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ranked(ranks: &[usize]) -> Vec<Individual<Allocation>> {
        ranks
            .iter()
            .map(|&rank| {
                let mut individual = Individual::new(Allocation::new(vec![0]));
                individual.set_rank(rank);
                individual
            })
            .collect()
    }

    #[test]
    fn test_rank_tournament_prefers_lower_rank() {
        let mut rng = StdRng::seed_from_u64(42);
        let population = ranked(&[0, 5, 5, 5, 5, 5, 5, 5, 5, 5]);

        let selected = RankTournament::new().select_many(&population, 2000, &mut rng);
        let winners = selected.iter().filter(|&&i| i == 0).count();

        // P(index 0 drawn at least once) = 1 - 0.9^2 = 0.19
        assert!(winners > 250 && winners < 500, "winners = {}", winners);
    }

    #[test]
    fn test_rank_tournament_never_picks_worse_of_two_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let population = ranked(&[0, 1]);

        let selected = RankTournament::new().select_many(&population, 500, &mut rng);
        // rank 1 only wins when both draws hit it
        let losers = selected.iter().filter(|&&i| i == 1).count();
        assert!(losers < 200, "losers = {}", losers);
    }

    #[test]
    fn test_rank_tournament_unranked_loses() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut population = ranked(&[3]);
        population.push(Individual::new(Allocation::new(vec![0])));

        let selected = RankTournament::new().select_many(&population, 400, &mut rng);
        let unranked = selected.iter().filter(|&&i| i == 1).count();
        assert!(unranked < 160, "unranked = {}", unranked);
    }

    #[test]
    fn test_random_pairing_ignores_rank() {
        let mut rng = StdRng::seed_from_u64(42);
        let population = ranked(&[0, 9]);

        let selected = RandomPairing::new().select_many(&population, 4000, &mut rng);
        let worse = selected.iter().filter(|&&i| i == 1).count();
        assert!(worse > 1800 && worse < 2200, "worse = {}", worse);
    }

    #[test]
    fn test_selection_indices_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let population = ranked(&[0, 1, 2]);

        for index in RandomPairing::new().select_many(&population, 100, &mut rng) {
            assert!(index < population.len());
        }
        for index in RankTournament::new().select_many(&population, 100, &mut rng) {
            assert!(index < population.len());
        }
    }

    #[test]
    #[should_panic(expected = "Population cannot be empty")]
    fn test_empty_population_panics() {
        let mut rng = StdRng::seed_from_u64(1);
        let population: Vec<Individual<Allocation>> = vec![];
        RankTournament::new().select(&population, &mut rng);
    }
}
