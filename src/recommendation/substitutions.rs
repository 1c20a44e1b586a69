//! Ingredient Substitution Table
//!
//! Maps a canonical ingredient to the substitutes that may stand in for it.
//! The mapping is one-directional: holding "banana" covers a missing "egg",
//! holding "egg" does not cover a missing "banana".
//!
//! The built-in table can be replaced with a TOML file of the form:
//!
//! ```toml
//! [substitutions]
//! egg = ["banana", "chia seeds", "flaxseed"]
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use super::normalizer::normalize;
use crate::error::{Error, Result};

const DEFAULT_SUBSTITUTIONS: &[(&str, &[&str])] = &[
    ("milk", &["almond milk", "soy milk", "water"]),
    ("butter", &["olive oil", "margarine", "ghee"]),
    ("egg", &["banana", "chia seeds", "flaxseed"]),
    ("sugar", &["honey", "jaggery", "maple syrup"]),
    ("flour", &["oat flour", "almond flour", "cornstarch"]),
    ("yogurt", &["curd", "buttermilk"]),
    ("cream", &["milk", "yogurt"]),
    ("onion", &["shallots", "leeks"]),
    ("garlic", &["garlic powder", "asafoetida"]),
];

/// Read-only substitution mapping, shared via `Arc` by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionTable {
    entries: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SubstitutionFile {
    substitutions: BTreeMap<String, Vec<String>>,
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSTITUTIONS.iter().map(|(ingredient, subs)| {
            (
                ingredient.to_string(),
                subs.iter().map(|s| s.to_string()).collect(),
            )
        }))
    }
}

impl SubstitutionTable {
    /// Build a table, normalizing keys and substitutes the same way as
    /// recipe and user ingredients.
    ///
    /// Substitute order is kept; duplicates and blanks are dropped.
    pub fn new(entries: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        let entries = entries
            .into_iter()
            .filter_map(|(ingredient, substitutes)| {
                let ingredient = normalize(&ingredient);
                if ingredient.is_empty() {
                    return None;
                }
                let mut seen = HashSet::new();
                let substitutes: Vec<String> = substitutes
                    .iter()
                    .map(|s| normalize(s))
                    .filter(|s| !s.is_empty() && seen.insert(s.clone()))
                    .collect();
                Some((ingredient, substitutes))
            })
            .collect();

        Self { entries }
    }

    /// Parse a table from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: SubstitutionFile = toml::from_str(text)?;
        let table = Self::new(file.substitutions);
        if table.is_empty() {
            return Err(Error::SubstitutionTable {
                message: "table has no entries".into(),
            });
        }
        Ok(table)
    }

    /// Load a table from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::SubstitutionTable {
            message: format!("cannot read {}: {}", path.display(), e).into(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Substitutes listed for `ingredient`, if it has an entry
    pub fn substitutes(&self, ingredient: &str) -> Option<&[String]> {
        self.entries.get(ingredient).map(Vec::as_slice)
    }

    /// True when `ingredient` has an entry and the user holds one of its substitutes.
    pub fn is_substitutable(&self, ingredient: &str, available: &HashSet<String>) -> bool {
        self.substitutes(ingredient)
            .map(|subs| subs.iter().any(|sub| available.contains(sub)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(ingredient, subs)| (ingredient.as_str(), subs.as_slice()))
    }
}
