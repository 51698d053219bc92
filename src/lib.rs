//! # workforce-evo
//!
//! Multi-objective evolutionary search for splitting a fixed budget of work
//! units across a pool of workers.
//!
//! Every worker has a cost rate and an error rate per unit. An allocation
//! assigns a non-negative number of units to each worker; its cost and error
//! are the rate-weighted sums. Neither objective can be improved for free, so
//! the optimizer returns the population grouped into Pareto fronts rather
//! than a single answer.
//!
//! ## Variants
//!
//! - [`Variant::RankCost`](algorithms::optimizer::Variant::RankCost): rank
//!   counting, survivors truncated by cost, rank-based tournaments and
//!   uncapped transfer mutation.
//! - [`Variant::CrowdedElitist`](algorithms::optimizer::Variant::CrowdedElitist):
//!   fast non-dominated sorting with crowding distance, whole-front elitism,
//!   random pairing and transfers capped at 10 units.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use workforce_evo::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = WorkerRegistry::from_path("workers.txt")?;
//!
//! let result = Optimizer::builder()
//!     .population_size(100)
//!     .generations(500)
//!     .variant(Variant::CrowdedElitist)
//!     .seed(42)
//!     .build(registry)?
//!     .run()?;
//!
//! print!("{result}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.

pub mod algorithms;
pub mod diagnostics;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod population;
mod serde_float;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::diagnostics::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
}
