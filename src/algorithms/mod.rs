//! Evolutionary algorithms
//!
//! Pareto ranking, crowding, survivor replacement and the generational
//! optimizer that ties them together.

pub mod crowding;
pub mod dominance;
pub mod optimizer;
pub mod replacement;

pub mod prelude {
    pub use super::crowding::*;
    pub use super::dominance::*;
    pub use super::optimizer::*;
    pub use super::replacement::*;
}
