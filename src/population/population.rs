//! Population type
//!
//! This module provides the Population container type.

use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::GenomeError;
use crate::fitness::traits::MultiObjectiveFitness;
use crate::genome::allocation::Allocation;
use crate::genome::traits::EvolutionaryGenome;
use crate::population::individual::Individual;

/// A population of individuals
///
/// Populations are passed by value between generational stages; a stage
/// consumes one population and produces the next.
#[derive(Clone, Debug, PartialEq)]
pub struct Population<G>
where
    G: EvolutionaryGenome,
{
    /// The individuals in this population
    individuals: Vec<Individual<G>>,
    /// Current generation number
    generation: usize,
}

impl<G> Population<G>
where
    G: EvolutionaryGenome,
{
    /// Create an empty population
    pub fn new() -> Self {
        Self {
            individuals: Vec::new(),
            generation: 0,
        }
    }

    /// Create a population with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(capacity),
            generation: 0,
        }
    }

    /// Create a population from a vector of individuals
    pub fn from_individuals(individuals: Vec<Individual<G>>) -> Self {
        Self {
            individuals,
            generation: 0,
        }
    }

    /// Get the current generation
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Builder-style generation setter
    pub fn at_generation(mut self, generation: usize) -> Self {
        self.generation = generation;
        self
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Add an individual to the population
    pub fn push(&mut self, individual: Individual<G>) {
        self.individuals.push(individual);
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> impl Iterator<Item = &Individual<G>> {
        self.individuals.iter()
    }

    /// Get the underlying individuals
    pub fn individuals(&self) -> &[Individual<G>] {
        &self.individuals
    }

    /// Take the individuals out of this population
    pub fn into_individuals(self) -> Vec<Individual<G>> {
        self.individuals
    }

    /// Check if all individuals have current objective values
    pub fn all_evaluated(&self) -> bool {
        self.individuals.iter().all(|i| i.is_evaluated())
    }

    /// Evaluate every individual without current objectives (sequential)
    pub fn evaluate<Fit>(&mut self, fitness: &Fit) -> Result<(), GenomeError>
    where
        Fit: MultiObjectiveFitness<G>,
    {
        for individual in &mut self.individuals {
            if !individual.is_evaluated() {
                let objectives = fitness.evaluate(individual.genome())?;
                individual.set_objectives(objectives);
            }
        }
        Ok(())
    }

    /// Evaluate every individual without current objectives (parallel)
    #[cfg(feature = "parallel")]
    pub fn evaluate_parallel<Fit>(&mut self, fitness: &Fit) -> Result<(), GenomeError>
    where
        Fit: MultiObjectiveFitness<G>,
    {
        self.individuals
            .par_iter_mut()
            .filter(|i| !i.is_evaluated())
            .try_for_each(|individual| {
                let objectives = fitness.evaluate(individual.genome())?;
                individual.set_objectives(objectives);
                Ok(())
            })
    }

    /// Evaluate every individual without current objectives (sequential fallback)
    #[cfg(not(feature = "parallel"))]
    pub fn evaluate_parallel<Fit>(&mut self, fitness: &Fit) -> Result<(), GenomeError>
    where
        Fit: MultiObjectiveFitness<G>,
    {
        self.evaluate(fitness)
    }
}

impl Population<Allocation> {
    /// Create a population of random allocations that each spend `budget` units
    pub fn random<R: Rng>(
        size: usize,
        num_workers: usize,
        budget: u32,
        max_chunk: u32,
        rng: &mut R,
    ) -> Self {
        let individuals = (0..size)
            .map(|_| Individual::new(Allocation::random(rng, num_workers, budget, max_chunk)))
            .collect();
        Self::from_individuals(individuals)
    }
}

impl<G> Default for Population<G>
where
    G: EvolutionaryGenome,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G> FromIterator<Individual<G>> for Population<G>
where
    G: EvolutionaryGenome,
{
    fn from_iter<I: IntoIterator<Item = Individual<G>>>(iter: I) -> Self {
        Self::from_individuals(iter.into_iter().collect())
    }
}

impl<G> IntoIterator for Population<G>
where
    G: EvolutionaryGenome,
{
    type Item = Individual<G>;
    type IntoIter = std::vec::IntoIter<Individual<G>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

impl<G> std::ops::Index<usize> for Population<G>
where
    G: EvolutionaryGenome,
{
    type Output = Individual<G>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}
