//! Recommendation Engine
//!
//! Scores every recipe's normalized ingredient set against what the user has
//! on hand and selects results per match mode:
//!
//! - **exact**: recipes whose whole ingredient set is covered, in dataset
//!   order. If none exist, recipes whose missing ingredients all have a
//!   substitute the user holds.
//! - **partial**: recipes sharing at least one ingredient, by descending
//!   overlap; ties keep dataset order.
//!
//! The scan is a pure function of its inputs. Progress notices go to
//! `tracing` only.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use super::metrics::{PerformanceTimer, RecommendationStats, SLOW_SCAN_THRESHOLD_MS};
use super::normalizer::normalize;
use super::parser::ParsedRecipe;
use super::substitutions::SubstitutionTable;

/// Result cap used when the caller does not pick one
pub const DEFAULT_TOP_N: usize = 5;

/// How recipes are matched against the user's ingredients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Every recipe ingredient must be available
    #[default]
    Exact,
    /// Rank by number of shared ingredients
    Partial,
}

impl MatchMode {
    /// Parse a mode string, falling back to `Exact` for anything unrecognized.
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "exact" => MatchMode::Exact,
            "partial" => MatchMode::Partial,
            other => {
                debug!(mode = other, "unrecognized match mode, using exact");
                MatchMode::Exact
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Partial => "partial",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which selection branch produced a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Exact,
    Substitution,
    Partial,
    /// Nothing matched
    None,
}

impl MatchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchSource::Exact => "exact",
            MatchSource::Substitution => "substitution",
            MatchSource::Partial => "partial",
            MatchSource::None => "none",
        }
    }
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's ingredients as a set, normalized like recipe ingredients
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIngredients {
    items: HashSet<String>,
}

impl UserIngredients {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            items: items
                .into_iter()
                .map(|item| normalize(item.as_ref()))
                .filter(|item| !item.is_empty())
                .collect(),
        }
    }

    /// Split a comma-separated line such as `"flour, Egg, banana"`
    pub fn from_comma_separated(line: &str) -> Self {
        Self::new(line.split(','))
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.items.contains(ingredient)
    }

    pub fn as_set(&self) -> &HashSet<String> {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for UserIngredients {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A returned recipe: its name and original merged ingredient strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeMatch {
    #[serde(rename = "Name")]
    pub name: String,
    pub ingredients: Vec<String>,
}

impl From<&ParsedRecipe> for RecipeMatch {
    fn from(recipe: &ParsedRecipe) -> Self {
        Self {
            name: recipe.name.clone(),
            ingredients: recipe.ingredients.clone(),
        }
    }
}

/// Ordered result set, at most `top_n` long
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub recipes: Vec<RecipeMatch>,
    pub source: MatchSource,
}

impl Recommendations {
    pub fn empty() -> Self {
        Self {
            recipes: Vec::new(),
            source: MatchSource::None,
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.recipes.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Transient per-recipe score, keyed by dataset position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MatchResult {
    index: usize,
    score: usize,
}

/// Normalized ingredient set of a recipe
pub fn normalized_set(ingredients: &[String]) -> HashSet<String> {
    ingredients.iter().map(|i| normalize(i)).collect()
}

/// Score a recipe's normalized set against the user's ingredients.
///
/// Exact mode is binary (1 when fully covered); partial mode counts overlap.
pub fn match_score(normalized: &HashSet<String>, user: &UserIngredients, mode: MatchMode) -> usize {
    match mode {
        MatchMode::Exact => usize::from(normalized.is_subset(user.as_set())),
        MatchMode::Partial => normalized.intersection(user.as_set()).count(),
    }
}

/// Main recommendation engine
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    substitutions: Arc<SubstitutionTable>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(Arc::new(SubstitutionTable::default()))
    }
}

impl RecommendationEngine {
    pub fn new(substitutions: Arc<SubstitutionTable>) -> Self {
        Self { substitutions }
    }

    pub fn substitutions(&self) -> &SubstitutionTable {
        &self.substitutions
    }

    /// Recommend up to `top_n` recipes for the user's ingredients.
    ///
    /// Never fails: no match is an empty result with `MatchSource::None`.
    pub fn recommend(
        &self,
        user: &UserIngredients,
        recipes: &[ParsedRecipe],
        mode: MatchMode,
        top_n: usize,
    ) -> Recommendations {
        let timer = PerformanceTimer::new("recommend");
        let mut stats = RecommendationStats::new(mode, recipes.len());

        let result = if top_n == 0 {
            debug!("top_n is zero, returning no recipes");
            Recommendations::empty()
        } else {
            // Order-preserving parallel map: index i is recipes[i]
            let normalized: Vec<HashSet<String>> = recipes
                .par_iter()
                .map(|recipe| normalized_set(&recipe.ingredients))
                .collect();

            match mode {
                MatchMode::Exact => self.select_exact(user, recipes, &normalized, top_n, &mut stats),
                MatchMode::Partial => Self::select_partial(user, recipes, &normalized, top_n, &mut stats),
            }
        };

        stats.source = result.source;
        stats.returned = result.len();
        stats.duration_ms = timer.elapsed_ms();
        stats.log();
        timer.log_if_slow(SLOW_SCAN_THRESHOLD_MS);

        result
    }

    /// `recommend` with the default cap of five
    pub fn recommend_default(
        &self,
        user: &UserIngredients,
        recipes: &[ParsedRecipe],
        mode: MatchMode,
    ) -> Recommendations {
        self.recommend(user, recipes, mode, DEFAULT_TOP_N)
    }

    fn select_exact(
        &self,
        user: &UserIngredients,
        recipes: &[ParsedRecipe],
        normalized: &[HashSet<String>],
        top_n: usize,
        stats: &mut RecommendationStats,
    ) -> Recommendations {
        let exact: Vec<usize> = normalized
            .par_iter()
            .enumerate()
            .filter(|(_, set)| match_score(set, user, MatchMode::Exact) == 1)
            .map(|(index, _)| index)
            .collect();

        if !exact.is_empty() {
            stats.matched = exact.len();
            return Self::take_top(recipes, exact, top_n, MatchSource::Exact);
        }

        info!("No exact match found, trying substitutions");

        let substituted: Vec<usize> = normalized
            .par_iter()
            .enumerate()
            .filter(|(_, set)| self.covered_with_substitutes(set, user))
            .map(|(index, _)| index)
            .collect();

        if substituted.is_empty() {
            info!("No suitable recipes even with substitutions");
            return Recommendations::empty();
        }

        info!(count = substituted.len(), "Found recipes using substitutes");
        stats.matched = substituted.len();
        Self::take_top(recipes, substituted, top_n, MatchSource::Substitution)
    }

    fn select_partial(
        user: &UserIngredients,
        recipes: &[ParsedRecipe],
        normalized: &[HashSet<String>],
        top_n: usize,
        stats: &mut RecommendationStats,
    ) -> Recommendations {
        let mut scored: Vec<MatchResult> = normalized
            .par_iter()
            .enumerate()
            .map(|(index, set)| MatchResult {
                index,
                score: match_score(set, user, MatchMode::Partial),
            })
            .filter(|result| result.score > 0)
            .collect();

        if scored.is_empty() {
            info!("No matching recipes found for partial match");
            return Recommendations::empty();
        }

        stats.matched = scored.len();

        // Stable sort: equal scores keep dataset order
        scored.sort_by_key(|result| Reverse(result.score));

        Self::take_top(
            recipes,
            scored.into_iter().map(|result| result.index).collect(),
            top_n,
            MatchSource::Partial,
        )
    }

    /// Every ingredient the user lacks must have a substitute the user holds
    fn covered_with_substitutes(&self, normalized: &HashSet<String>, user: &UserIngredients) -> bool {
        normalized
            .iter()
            .filter(|ingredient| !user.contains(ingredient))
            .all(|missing| self.substitutions.is_substitutable(missing, user.as_set()))
    }

    fn take_top(
        recipes: &[ParsedRecipe],
        indices: Vec<usize>,
        top_n: usize,
        source: MatchSource,
    ) -> Recommendations {
        Recommendations {
            recipes: indices
                .into_iter()
                .take(top_n)
                .map(|index| RecipeMatch::from(&recipes[index]))
                .collect(),
            source,
        }
    }
}
