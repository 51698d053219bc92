//! Genome types
//!
//! This module provides the genome trait and the allocation genome.

pub mod allocation;
pub mod traits;

pub mod prelude {
    pub use super::allocation::*;
    pub use super::traits::*;
}
