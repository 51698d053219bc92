//! Crossover operators
//!
//! This module provides crossover operators for fixed-length genomes.

use rand::Rng;

use crate::error::{OperatorError, OperatorResult};
use crate::genome::traits::EvolutionaryGenome;
use crate::operators::traits::CrossoverOperator;

/// Single-point crossover
///
/// Picks a cut point in `[1, len - 1]`; child one takes the first parent's
/// prefix and the second parent's suffix, child two the complement. Genomes
/// shorter than two genes are passed through unchanged.
///
/// For allocations the children keep their length but not necessarily the
/// parents' unit total.
#[derive(Clone, Debug, Default)]
pub struct SinglePointCrossover;

impl SinglePointCrossover {
    /// Create a new single-point crossover
    pub fn new() -> Self {
        Self
    }
}

impl<G: EvolutionaryGenome> CrossoverOperator<G> for SinglePointCrossover {
    fn crossover<R: Rng>(&self, parent1: &G, parent2: &G, rng: &mut R) -> OperatorResult<(G, G)> {
        if parent1.dimension() != parent2.dimension() {
            return OperatorResult::Failed(OperatorError::CrossoverFailed(format!(
                "Parent dimensions do not match: {} vs {}",
                parent1.dimension(),
                parent2.dimension()
            )));
        }

        let n = parent1.dimension();
        if n < 2 {
            return OperatorResult::Success((parent1.clone(), parent2.clone()));
        }

        let point = rng.gen_range(1..n);
        let (head1, tail1) = parent1.genes().split_at(point);
        let (head2, tail2) = parent2.genes().split_at(point);

        let child1 = G::from_genes(head1.iter().chain(tail2).copied().collect());
        let child2 = G::from_genes(head2.iter().chain(tail1).copied().collect());

        OperatorResult::Success((child1, child2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::allocation::Allocation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_single_point_crossover_complementary() {
        let mut rng = StdRng::seed_from_u64(5);
        let parent1 = Allocation::new(vec![1; 8]);
        let parent2 = Allocation::new(vec![0; 8]);

        for _ in 0..20 {
            let (child1, child2) = SinglePointCrossover::new()
                .crossover(&parent1, &parent2, &mut rng)
                .into_result()
                .unwrap();

            assert_eq!(child1.len(), 8);
            assert_eq!(child2.len(), 8);
            for i in 0..8 {
                assert_ne!(child1[i], child2[i]);
            }
            // Cut point is never 0 or len: both parents contribute to each child
            assert_eq!(child1[0], 1);
            assert_eq!(child1[7], 0);
            assert_eq!(child2[0], 0);
            assert_eq!(child2[7], 1);
        }
    }

    #[test]
    fn test_single_point_crossover_prefix_suffix() {
        let mut rng = StdRng::seed_from_u64(9);
        let parent1 = Allocation::new(vec![1, 2, 3, 4]);
        let parent2 = Allocation::new(vec![10, 20, 30, 40]);

        let (child1, child2) = SinglePointCrossover::new()
            .crossover(&parent1, &parent2, &mut rng)
            .into_result()
            .unwrap();

        let point = child1.units().iter().position(|&u| u >= 10).unwrap();
        assert!((1..4).contains(&point));
        assert_eq!(&child1.units()[..point], &parent1.units()[..point]);
        assert_eq!(&child1.units()[point..], &parent2.units()[point..]);
        assert_eq!(&child2.units()[..point], &parent2.units()[..point]);
        assert_eq!(&child2.units()[point..], &parent1.units()[point..]);
    }

    #[test]
    fn test_single_point_crossover_short_genomes_pass_through() {
        let mut rng = StdRng::seed_from_u64(1);
        let parent1 = Allocation::new(vec![7]);
        let parent2 = Allocation::new(vec![3]);

        let (child1, child2) = SinglePointCrossover::new()
            .crossover(&parent1, &parent2, &mut rng)
            .into_result()
            .unwrap();
        assert_eq!(child1, parent1);
        assert_eq!(child2, parent2);
    }

    #[test]
    fn test_single_point_crossover_dimension_mismatch() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = SinglePointCrossover::new().crossover(
            &Allocation::new(vec![1, 2]),
            &Allocation::new(vec![1, 2, 3]),
            &mut rng,
        );
        assert!(matches!(
            result,
            OperatorResult::Failed(OperatorError::CrossoverFailed(_))
        ));
    }

    #[test]
    fn test_single_point_crossover_may_break_unit_total() {
        let mut rng = StdRng::seed_from_u64(2);
        let parent1 = Allocation::new(vec![10, 0]);
        let parent2 = Allocation::new(vec![0, 10]);

        let (child1, child2) = SinglePointCrossover::new()
            .crossover(&parent1, &parent2, &mut rng)
            .into_result()
            .unwrap();
        // the only cut point is 1: [10] + [10] and [0] + [0]
        assert_eq!(child1.total(), 20);
        assert_eq!(child2.total(), 0);
    }
}
