//! Core genome traits
//!
//! This module defines the `EvolutionaryGenome` trait shared by the variation
//! operators.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

/// Core genome abstraction for evolutionary algorithms.
///
/// Genomes are fixed-length gene vectors. They must be cloneable, serializable
/// and thread-safe so populations can be handed to other threads as snapshots.
pub trait EvolutionaryGenome:
    Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// The allele type for individual genes
    type Allele: Copy + Debug + Send + Sync;

    /// Number of genes
    fn dimension(&self) -> usize {
        self.genes().len()
    }

    /// Get the genes as a slice
    fn genes(&self) -> &[Self::Allele];

    /// Create from a vector of genes
    fn from_genes(genes: Vec<Self::Allele>) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct MockGenome {
        genes: Vec<i64>,
    }

    impl EvolutionaryGenome for MockGenome {
        type Allele = i64;

        fn genes(&self) -> &[i64] {
            &self.genes
        }

        fn from_genes(genes: Vec<i64>) -> Self {
            Self { genes }
        }
    }

    #[test]
    fn test_default_dimension() {
        let genome = MockGenome::from_genes(vec![1, 2, 3]);
        assert_eq!(genome.dimension(), 3);
    }
}
