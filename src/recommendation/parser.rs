//! Ingredient List Parser
//!
//! Recipe rows carry their ingredients as two parallel fields in an R-style
//! vector encoding, e.g. `c("2", "1/2")` and `c("flour", "sugar")`. This module
//! extracts the quoted items and zips the two lists into `"<quantity> <part>"`
//! ingredient strings.
//!
//! Parsing never fails. The outcome types keep "absent" and "malformed" apart
//! so the loader can report them, but `into_items()` collapses both to an
//! empty list and such recipes are simply dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static QUOTED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(.*?)""#).expect("quoted item pattern is valid"));

const ENVELOPE_OPEN: &str = "c(";
const ENVELOPE_CLOSE: &str = ")";

/// A recipe whose ingredient fields have been merged.
///
/// `ingredients` holds the original merged strings; normalization happens at
/// match time and is never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
}

impl ParsedRecipe {
    pub fn new(name: impl Into<String>, ingredients: Vec<String>) -> Self {
        Self {
            name: name.into(),
            ingredients,
        }
    }
}

/// Outcome of parsing a single encoded list field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedList {
    /// Field was null/missing
    Absent,
    /// Field was present but not wrapped in `c( ... )`
    Malformed,
    /// Quoted items in source order, duplicates kept
    Items(Vec<String>),
}

impl ParsedList {
    pub fn into_items(self) -> Vec<String> {
        match self {
            ParsedList::Items(items) => items,
            ParsedList::Absent | ParsedList::Malformed => Vec::new(),
        }
    }
}

/// Outcome of merging a quantities field with a parts field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergedIngredients {
    /// At least one of the two fields was missing
    Absent,
    /// At least one of the two fields had the wrong envelope
    Malformed,
    /// Positionally paired ingredients (may be empty)
    Merged(Vec<String>),
}

impl MergedIngredients {
    pub fn into_items(self) -> Vec<String> {
        match self {
            MergedIngredients::Merged(items) => items,
            MergedIngredients::Absent | MergedIngredients::Malformed => Vec::new(),
        }
    }

    /// True when the merge produced at least one ingredient
    pub fn is_usable(&self) -> bool {
        matches!(self, MergedIngredients::Merged(items) if !items.is_empty())
    }
}

/// Parse a `c("a", "b", ...)` encoded field.
pub fn parse_list(text: Option<&str>) -> ParsedList {
    let Some(text) = text else {
        return ParsedList::Absent;
    };

    let text = text.trim();
    if !(text.starts_with(ENVELOPE_OPEN) && text.ends_with(ENVELOPE_CLOSE)) {
        return ParsedList::Malformed;
    }

    ParsedList::Items(
        QUOTED_ITEM
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect(),
    )
}

/// Merge quantities and parts into `"<quantity> <part>"` strings.
///
/// Pairs stop at the shorter list; extra entries on either side are ignored.
pub fn merge(quantities: Option<&str>, parts: Option<&str>) -> MergedIngredients {
    let quantities = parse_list(quantities);
    let parts = parse_list(parts);

    match (quantities, parts) {
        (ParsedList::Items(quantities), ParsedList::Items(parts)) => MergedIngredients::Merged(
            quantities
                .iter()
                .zip(parts.iter())
                .map(|(quantity, part)| format!("{} {}", quantity, part).trim().to_string())
                .collect(),
        ),
        (ParsedList::Absent, _) | (_, ParsedList::Absent) => MergedIngredients::Absent,
        _ => MergedIngredients::Malformed,
    }
}
