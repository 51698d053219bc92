//! Fitness evaluation
//!
//! Workers, objectives and the allocation evaluator.

pub mod allocation;
pub mod traits;
pub mod workers;

pub mod prelude {
    pub use super::allocation::*;
    pub use super::traits::*;
    pub use super::workers::*;
}
