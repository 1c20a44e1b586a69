//! Recommendation Module
//!
//! Matches a user's ingredients against the recipe dataset.
//!
//! ## Architecture
//!
//! 1. **Parser** - Decode `c("...")` ingredient fields and merge quantities with parts
//! 2. **Normalizer** - Strip quantity/unit prefixes and case-fold for comparison
//! 3. **Engine** - Score recipes by exact coverage or partial overlap
//! 4. **Substitutions** - Fallback table consulted when exact mode finds nothing
//!
//! ## Algorithm Overview
//!
//! - Exact: a recipe matches when every normalized ingredient is in the user's set.
//!   With no exact match, a recipe still qualifies if each missing ingredient has
//!   a listed substitute the user holds.
//! - Partial: score is the size of the overlap; zero-overlap recipes are dropped
//!   and the rest are ranked by score, dataset order breaking ties.

pub mod engine;
pub mod generator;
pub mod metrics;
pub mod normalizer;
pub mod parser;
pub mod substitutions;

// Re-export the types that are actually used externally
pub use engine::{
    MatchMode, MatchSource, RecipeMatch, RecommendationEngine, Recommendations, UserIngredients,
    DEFAULT_TOP_N,
};
pub use generator::{generate_recipe, GeneratedRecipe};
pub use normalizer::normalize;
pub use parser::{merge, parse_list, MergedIngredients, ParsedList, ParsedRecipe};
pub use substitutions::SubstitutionTable;
