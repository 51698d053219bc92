//! Error types for workforce-evo
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for genome operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenomeError {
    /// Allocation length does not match the worker registry
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Crossover operation failed
    #[error("Crossover failed: {0}")]
    CrossoverFailed(String),

    /// Mutation operation failed
    #[error("Mutation failed: {0}")]
    MutationFailed(String),
}

/// Error type for loading worker data
#[derive(Debug, Error)]
pub enum RegistryError {
    /// IO error while reading worker data
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input has no header or no worker lines
    #[error("Worker data is empty or missing required data")]
    MissingHeader,

    /// First line is not a worker count
    #[error("The first line should contain the number of workers, got {0:?}")]
    InvalidHeader(String),

    /// Header declares more workers than there are lines
    #[error("Header declares {declared} workers but only {found} worker lines follow")]
    TooFewLines { declared: usize, found: usize },

    /// A worker line could not be parsed as `cost,error`
    #[error("Line {line} contains invalid data: {content:?}")]
    InvalidLine { line: usize, content: String },

    /// A worker has a negative cost or error rate
    #[error("Line {line} has a negative rate")]
    NegativeRate { line: usize },
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Genome error
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Worker data error
    #[error("Worker registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,

    /// Run was cancelled at a generation boundary
    #[error("Run cancelled before generation {generation}")]
    Cancelled {
        /// Generation that was about to start
        generation: usize,
    },

    /// Background optimizer thread panicked
    #[error("Optimizer thread panicked")]
    WorkerPanicked,
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;

/// Result of an operator application
#[derive(Debug, Clone)]
pub enum OperatorResult<G> {
    /// Operation succeeded
    Success(G),
    /// Operation failed unrecoverably
    Failed(OperatorError),
}

impl<G> OperatorResult<G> {
    /// Converts into a `Result`, so fatal operator failures can be propagated with `?`
    pub fn into_result(self) -> Result<G, OperatorError> {
        match self {
            Self::Success(g) => Ok(g),
            Self::Failed(e) => Err(e),
        }
    }
}
