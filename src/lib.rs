//! Pantry Engine library crate
//!
//! Re-exports core modules for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod recommendation;

// Re-export commonly used types
pub use config::Config;
pub use dataset::{Dataset, LoadStats, RawRecipeRecord};
pub use error::{Error, Result};
pub use recommendation::*;
