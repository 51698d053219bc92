//! Generational allocation optimizer
//!
//! Drives a fixed number of generations of
//! evaluate → rank and replace → mating selection → crossover and mutation,
//! then ranks the last population once more and reports it. The two
//! [`Variant`]s differ only in the strategies plugged into those stages:
//!
//! | stage       | [`Variant::RankCost`]       | [`Variant::CrowdedElitist`]         |
//! |-------------|-----------------------------|-------------------------------------|
//! | ranking     | rank counting               | fast non-dominated sort             |
//! | replacement | cheapest `population_size`  | whole fronts, crowding on the cut   |
//! | mating      | binary rank tournament      | random pairing                      |
//! | transfer    | up to the whole slot        | at most 10 units                    |

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::algorithms::dominance::SortStrategy;
use crate::algorithms::replacement::ReplacementPolicy;
use crate::diagnostics::{
    ChannelObserver, EvolutionObserver, EvolutionResult, EvolutionStats, Front,
    GenerationSnapshot, GenerationStats, NoopObserver, RunEvent,
};
use crate::error::{EvoResult, EvolutionError};
use crate::fitness::allocation::AllocationFitness;
use crate::fitness::workers::WorkerRegistry;
use crate::genome::allocation::Allocation;
use crate::operators::crossover::SinglePointCrossover;
use crate::operators::mutation::TransferMutation;
use crate::operators::selection::{RandomPairing, RankTournament};
use crate::operators::traits::{CrossoverOperator, MutationOperator, SelectionOperator};
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Transfer cap used by [`Variant::CrowdedElitist`] unless overridden
pub const DEFAULT_CAPPED_TRANSFER: u32 = 10;

/// Optimizer variant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Rank counting, cost truncation, rank tournament, uncapped transfers
    RankCost,
    /// Fast sorting, crowded elitism, random pairing, capped transfers
    #[default]
    CrowdedElitist,
}

impl Variant {
    /// Replacement policy of this variant
    pub fn replacement(&self) -> ReplacementPolicy {
        match self {
            Self::RankCost => ReplacementPolicy::CostTruncation,
            Self::CrowdedElitist => ReplacementPolicy::CrowdedElitism,
        }
    }

    /// Sorting strategy of this variant
    pub fn sort_strategy(&self) -> SortStrategy {
        self.replacement().sort_strategy()
    }

    /// Transfer cap of this variant's mutation
    pub fn default_max_transfer(&self) -> Option<u32> {
        match self {
            Self::RankCost => None,
            Self::CrowdedElitist => Some(DEFAULT_CAPPED_TRANSFER),
        }
    }
}

/// Upper bound on units moved by one mutation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferLimit {
    /// Whatever the variant uses
    #[default]
    VariantDefault,
    /// Up to the whole source slot
    Unbounded,
    /// At most this many units
    AtMost(u32),
}

/// Configuration for the optimizer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Population size
    pub population_size: usize,
    /// Number of generations (0 = rank the initial population only)
    pub generations: usize,
    /// Optimizer variant
    pub variant: Variant,
    /// Units every initial allocation spends
    pub total_work_units: u32,
    /// Largest chunk added to one slot while building an initial allocation
    pub max_initial_chunk: u32,
    /// Mutation transfer cap
    pub max_transfer: TransferLimit,
    /// Let survivors compete with their offspring for the next population
    pub merge_parents: bool,
    /// Whether to evaluate in parallel (requires the `parallel` feature)
    pub parallel_evaluation: bool,
    /// Random seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 500,
            variant: Variant::default(),
            total_work_units: 100,
            max_initial_chunk: 9,
            max_transfer: TransferLimit::default(),
            merge_parents: false,
            parallel_evaluation: false,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> EvoResult<Self> {
        serde_json::from_str(json).map_err(|e| EvolutionError::Configuration(e.to_string()))
    }

    /// Effective mutation transfer cap
    pub fn max_transfer(&self) -> Option<u32> {
        match self.max_transfer {
            TransferLimit::VariantDefault => self.variant.default_max_transfer(),
            TransferLimit::Unbounded => None,
            TransferLimit::AtMost(cap) => Some(cap),
        }
    }

    /// Check the configuration against the workers it will run on
    pub fn validate(&self, registry: &WorkerRegistry) -> EvoResult<()> {
        if registry.is_empty() {
            return Err(EvolutionError::Configuration(
                "Worker registry must not be empty".to_string(),
            ));
        }
        if self.population_size == 0 {
            return Err(EvolutionError::Configuration(
                "Population size must be positive".to_string(),
            ));
        }
        if self.total_work_units == 0 {
            return Err(EvolutionError::Configuration(
                "Total work units must be positive".to_string(),
            ));
        }
        if self.max_initial_chunk == 0 {
            return Err(EvolutionError::Configuration(
                "Initial chunk size must be positive".to_string(),
            ));
        }
        if self.max_transfer == TransferLimit::AtMost(0) {
            return Err(EvolutionError::Configuration(
                "Transfer cap must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`Optimizer`]
#[derive(Clone, Debug, Default)]
pub struct OptimizerBuilder {
    config: OptimizerConfig,
}

impl OptimizerBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set the number of generations
    pub fn generations(mut self, generations: usize) -> Self {
        self.config.generations = generations;
        self
    }

    /// Set the variant
    pub fn variant(mut self, variant: Variant) -> Self {
        self.config.variant = variant;
        self
    }

    /// Set the number of work units to allocate
    pub fn total_work_units(mut self, units: u32) -> Self {
        self.config.total_work_units = units;
        self
    }

    /// Set the largest initial chunk
    pub fn max_initial_chunk(mut self, chunk: u32) -> Self {
        self.config.max_initial_chunk = chunk;
        self
    }

    /// Set the mutation transfer cap
    pub fn max_transfer(mut self, limit: TransferLimit) -> Self {
        self.config.max_transfer = limit;
        self
    }

    /// Let survivors compete with their offspring for the next population
    pub fn merge_parents(mut self, enabled: bool) -> Self {
        self.config.merge_parents = enabled;
        self
    }

    /// Enable or disable parallel evaluation
    pub fn parallel_evaluation(mut self, enabled: bool) -> Self {
        self.config.parallel_evaluation = enabled;
        self
    }

    /// Seed the random source
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate the configuration and build the optimizer
    pub fn build(self, registry: WorkerRegistry) -> EvoResult<Optimizer> {
        self.config.validate(&registry)?;

        let mutation = TransferMutation {
            max_transfer: self.config.max_transfer(),
        };
        Ok(Optimizer {
            config: self.config,
            fitness: AllocationFitness::new(registry),
            crossover: SinglePointCrossover::new(),
            mutation,
        })
    }
}

/// Flag checked once per generation boundary to stop a run early
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle to a run executing on its own thread
#[derive(Debug)]
pub struct RunHandle {
    handle: JoinHandle<EvoResult<EvolutionResult>>,
    events: Receiver<RunEvent>,
    token: CancellationToken,
}

impl RunHandle {
    /// Snapshots and the final result, in order; closes when the run ends
    pub fn events(&self) -> &Receiver<RunEvent> {
        &self.events
    }

    /// Ask the run to stop at the next generation boundary
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token that cancels this run
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Check whether the run thread has finished
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run to finish
    pub fn join(self) -> EvoResult<EvolutionResult> {
        self.handle
            .join()
            .map_err(|_| EvolutionError::WorkerPanicked)?
    }
}

/// Multi-objective allocation optimizer
#[derive(Clone, Debug)]
pub struct Optimizer {
    config: OptimizerConfig,
    fitness: AllocationFitness,
    crossover: SinglePointCrossover,
    mutation: TransferMutation,
}

impl Optimizer {
    /// Create a builder for Optimizer
    pub fn builder() -> OptimizerBuilder {
        OptimizerBuilder::new()
    }

    /// Build an optimizer from a configuration
    pub fn new(config: OptimizerConfig, registry: WorkerRegistry) -> EvoResult<Self> {
        OptimizerBuilder::new().config(config).build(registry)
    }

    /// The validated configuration
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// The workers being allocated to
    pub fn registry(&self) -> &WorkerRegistry {
        self.fitness.registry()
    }

    /// Run to completion without observing intermediate generations
    pub fn run(&self) -> EvoResult<EvolutionResult> {
        self.run_with_observer(NoopObserver)
    }

    /// Run to completion, reporting to `observer`, seeded from the configuration
    pub fn run_with_observer<O: EvolutionObserver>(
        &self,
        observer: O,
    ) -> EvoResult<EvolutionResult> {
        let mut rng = self.seeded_rng();
        self.execute(&mut rng, observer, None)
    }

    /// Run to completion with a caller-supplied random source
    pub fn run_with_rng<R: Rng, O: EvolutionObserver>(
        &self,
        rng: &mut R,
        observer: O,
    ) -> EvoResult<EvolutionResult> {
        self.execute(rng, observer, None)
    }

    /// Run until completion or until `token` is cancelled
    pub fn run_cancellable<R: Rng, O: EvolutionObserver>(
        &self,
        rng: &mut R,
        observer: O,
        token: &CancellationToken,
    ) -> EvoResult<EvolutionResult> {
        self.execute(rng, observer, Some(token))
    }

    /// Run on a dedicated thread, streaming events over a channel
    pub fn spawn(self) -> RunHandle {
        let (observer, events) = ChannelObserver::channel();
        let token = CancellationToken::new();
        let run_token = token.clone();

        let handle = thread::spawn(move || {
            let mut rng = self.seeded_rng();
            self.execute(&mut rng, observer, Some(&run_token))
        });

        RunHandle {
            handle,
            events,
            token,
        }
    }

    /// Random initial population; every allocation spends the full budget
    pub fn initialize<R: Rng>(&self, rng: &mut R) -> Population<Allocation> {
        Population::random(
            self.config.population_size,
            self.registry().len(),
            self.config.total_work_units,
            self.config.max_initial_chunk,
            rng,
        )
    }

    /// Evaluate every individual lacking current objectives
    pub fn evaluate(&self, population: &mut Population<Allocation>) -> EvoResult<()> {
        if self.config.parallel_evaluation {
            population.evaluate_parallel(&self.fitness)?;
        } else {
            population.evaluate(&self.fitness)?;
        }
        Ok(())
    }

    /// One generation: evaluate, replace, select mates, and vary
    ///
    /// With `merge_parents`, survivors and offspring are cut back to
    /// `population_size` together before the population is returned.
    pub fn step<R: Rng>(
        &self,
        population: Population<Allocation>,
        rng: &mut R,
    ) -> EvoResult<Population<Allocation>> {
        let next_generation = population.generation() + 1;

        let mut population = population;
        self.evaluate(&mut population)?;

        let replacement = self.config.variant.replacement();
        let survivors = replacement.replace(population, self.config.population_size);
        if survivors.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }
        debug!(
            generation = next_generation - 1,
            fronts = survivors.iter().filter_map(Individual::rank).max().map_or(0, |r| r + 1),
            survivors = survivors.len(),
            "Replacement complete"
        );

        let pool = self.mating_pool(&survivors, rng);
        let offspring = self.create_offspring(&pool, next_generation, rng)?;

        if !self.config.merge_parents {
            return Ok(offspring);
        }

        let merged: Population<Allocation> = survivors.into_iter().chain(offspring).collect();
        Ok(replacement
            .replace(merged, self.config.population_size)
            .at_generation(next_generation))
    }

    /// Draw `population_size` parents with the variant's mating selection
    pub fn mating_pool<R: Rng>(
        &self,
        population: &Population<Allocation>,
        rng: &mut R,
    ) -> Vec<Individual<Allocation>> {
        let count = self.config.population_size;
        let indices = match self.config.variant {
            Variant::RankCost => {
                RankTournament::new().select_many(population.individuals(), count, rng)
            }
            Variant::CrowdedElitist => {
                RandomPairing::new().select_many(population.individuals(), count, rng)
            }
        };
        indices.into_iter().map(|i| population[i].clone()).collect()
    }

    /// Produce exactly `population_size` evaluated offspring from random pool pairs
    pub fn create_offspring<R: Rng>(
        &self,
        pool: &[Individual<Allocation>],
        generation: usize,
        rng: &mut R,
    ) -> EvoResult<Population<Allocation>> {
        if pool.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }

        let size = self.config.population_size;
        let mut offspring = Population::with_capacity(size);

        while offspring.len() < size {
            let parent1 = &pool[rng.gen_range(0..pool.len())];
            let parent2 = &pool[rng.gen_range(0..pool.len())];

            let (mut child1, mut child2) = self
                .crossover
                .crossover(parent1.genome(), parent2.genome(), rng)
                .into_result()?;

            self.mutation.mutate(&mut child1, rng);
            self.mutation.mutate(&mut child2, rng);

            offspring.push(Individual::with_generation(child1, generation));
            if offspring.len() < size {
                offspring.push(Individual::with_generation(child2, generation));
            }
        }

        let mut offspring = offspring.at_generation(generation);
        self.evaluate(&mut offspring)?;
        Ok(offspring)
    }

    /// Evaluate and rank the last population and group it into fronts
    ///
    /// Crowding distances left over from the last replacement are cleared.
    pub fn finalize(&self, population: Population<Allocation>) -> EvoResult<Vec<Front>> {
        let mut population = population;
        self.evaluate(&mut population)?;

        let mut individuals = population.into_individuals();
        for individual in &mut individuals {
            individual.set_crowding_distance(0.0);
        }
        let fronts = self.config.variant.sort_strategy().sort(&mut individuals);

        let mut slots: Vec<Option<Individual<Allocation>>> =
            individuals.into_iter().map(Some).collect();
        Ok(fronts
            .into_iter()
            .enumerate()
            .map(|(rank, front)| Front {
                rank,
                members: front.into_iter().filter_map(|i| slots[i].take()).collect(),
            })
            .collect())
    }

    fn seeded_rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    #[instrument(
        level = "info",
        skip_all,
        fields(
            variant = ?self.config.variant,
            population_size = self.config.population_size,
            generations = self.config.generations
        )
    )]
    fn execute<R: Rng, O: EvolutionObserver>(
        &self,
        rng: &mut R,
        mut observer: O,
        cancel: Option<&CancellationToken>,
    ) -> EvoResult<EvolutionResult> {
        let start_time = Instant::now();
        let budget = self.config.total_work_units;
        info!(
            workers = self.registry().len(),
            total_work_units = budget,
            "Starting allocation run"
        );

        let mut stats = EvolutionStats::new();
        let mut population = self.initialize(rng);

        for generation in 0..self.config.generations {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                info!(generation, "Run cancelled");
                return Err(EvolutionError::Cancelled { generation });
            }

            population = self.step(population, rng)?;

            let gen_stats = GenerationStats::from_population(&population, generation, budget);
            debug!(
                generation,
                min_cost = gen_stats.min_cost,
                min_error = gen_stats.min_error,
                budget_drift = gen_stats.budget_drift,
                "Generation complete"
            );
            stats.record(gen_stats.clone());
            observer.on_generation(GenerationSnapshot {
                generation,
                individuals: population.individuals().to_vec(),
                stats: gen_stats,
            });
        }

        let fronts = self.finalize(population)?;
        stats.set_runtime(start_time.elapsed());

        let result = EvolutionResult {
            fronts,
            generations: self.config.generations,
            stats,
        };
        info!(
            fronts = result.fronts.len(),
            pareto_size = result.pareto_front().map_or(0, Front::len),
            runtime_ms = result.stats.total_runtime_ms,
            "Allocation run complete"
        );
        observer.on_complete(&result);
        Ok(result)
    }
}
