//! Recipe dataset loading
//!
//! Reads the recipe CSV once at startup, merges each row's quantity and part
//! fields, and keeps only recipes that end up with at least one ingredient.
//! The resulting `Dataset` is immutable and shared behind an `Arc`.

use polars::prelude::{
    CsvParseOptions, CsvReadOptions, DataFrame, DataType, NullValues, SerReader, StringChunked,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::{Error, Result};
use crate::recommendation::metrics::PerformanceTimer;
use crate::recommendation::parser::{merge, MergedIngredients, ParsedRecipe};

pub const NAME_COLUMN: &str = "Name";
pub const QUANTITIES_COLUMN: &str = "RecipeIngredientQuantities";
pub const PARTS_COLUMN: &str = "RecipeIngredientParts";

const REQUIRED_COLUMNS: [&str; 3] = [NAME_COLUMN, QUANTITIES_COLUMN, PARTS_COLUMN];

/// Cell text read as null, matching pandas' default
const NULL_MARKER: &str = "NA";

/// One dataset row before parsing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecipeRecord {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "RecipeIngredientQuantities", default)]
    pub quantities: Option<String>,
    #[serde(rename = "RecipeIngredientParts", default)]
    pub parts: Option<String>,
}

impl RawRecipeRecord {
    pub fn new(name: impl Into<String>, quantities: Option<&str>, parts: Option<&str>) -> Self {
        Self {
            name: Some(name.into()),
            quantities: quantities.map(str::to_string),
            parts: parts.map(str::to_string),
        }
    }
}

/// Counts from a load pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Rows read
    pub total: usize,
    /// Recipes kept
    pub usable: usize,
    /// Dropped: name was null or blank
    pub unnamed: usize,
    /// Dropped: a quantities or parts field was null
    pub absent: usize,
    /// Dropped: a field was not a `c(...)` list
    pub malformed: usize,
    /// Dropped: merge produced no ingredients
    pub empty: usize,
}

impl LoadStats {
    pub fn dropped(&self) -> usize {
        self.unnamed + self.absent + self.malformed + self.empty
    }

    pub fn log(&self) {
        info!(
            total = self.total,
            usable = self.usable,
            unnamed = self.unnamed,
            absent = self.absent,
            malformed = self.malformed,
            empty = self.empty,
            "📚 Recipe dataset loaded"
        );
        if self.total > 0 && self.usable == 0 {
            warn!("⚠️ No usable recipes in dataset");
        }
    }
}

/// In-memory recipe dataset
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    recipes: Vec<ParsedRecipe>,
}

impl Dataset {
    /// Merge raw records, dropping nameless ones and those without usable
    /// ingredients.
    ///
    /// Dataset order follows record order.
    pub fn from_records(records: Vec<RawRecipeRecord>) -> (Self, LoadStats) {
        let merged: Vec<(Option<String>, MergedIngredients)> = records
            .into_par_iter()
            .map(|record| {
                let ingredients = merge(record.quantities.as_deref(), record.parts.as_deref());
                (record.name, ingredients)
            })
            .collect();

        let mut stats = LoadStats {
            total: merged.len(),
            ..Default::default()
        };
        let mut recipes = Vec::with_capacity(merged.len());

        for (name, ingredients) in merged {
            let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
                stats.unnamed += 1;
                continue;
            };
            match ingredients {
                MergedIngredients::Absent => stats.absent += 1,
                MergedIngredients::Malformed => stats.malformed += 1,
                MergedIngredients::Merged(items) if items.is_empty() => stats.empty += 1,
                MergedIngredients::Merged(items) => recipes.push(ParsedRecipe::new(name, items)),
            }
        }
        stats.usable = recipes.len();

        (Self { recipes }, stats)
    }

    /// Load and filter the recipe CSV.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load_csv(path: &Path) -> Result<(Self, LoadStats)> {
        let _timer = PerformanceTimer::new("load_csv");

        if !path.is_file() {
            return Err(Error::DatasetNotFound {
                path: path.display().to_string(),
            });
        }

        info!("📦 Reading recipe dataset...");
        let parse_options = CsvParseOptions::default()
            .with_null_values(Some(NullValues::AllColumnsSingle(NULL_MARKER.into())));
        let columns: Vec<_> = REQUIRED_COLUMNS.iter().map(|c| (*c).into()).collect();

        let read_error = || {
            format!(
                "Failed to read columns {} from recipe CSV",
                REQUIRED_COLUMNS.join(", ")
            )
        };

        // Other columns are never parsed, so their types cannot fail the load
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_columns(Some(Arc::from(columns)))
            .with_parse_options(parse_options)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| Error::dataset_with_source(read_error(), e))?
            .finish()
            .map_err(|e| Error::dataset_with_source(read_error(), e))?;

        let records = records_from_frame(&df)?;
        let (dataset, stats) = Self::from_records(records);
        stats.log();

        Ok((dataset, stats))
    }

    pub fn recipes(&self) -> &[ParsedRecipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// First recipe with this exact name
    pub fn get(&self, name: &str) -> Option<&ParsedRecipe> {
        self.recipes.iter().find(|r| r.name == name)
    }
}

fn records_from_frame(df: &DataFrame) -> Result<Vec<RawRecipeRecord>> {
    let names = string_column(df, NAME_COLUMN)?;
    let quantities = string_column(df, QUANTITIES_COLUMN)?;
    let parts = string_column(df, PARTS_COLUMN)?;

    Ok((0..df.height())
        .map(|idx| RawRecipeRecord {
            name: names.get(idx).map(str::to_string),
            quantities: quantities.get(idx).map(str::to_string),
            parts: parts.get(idx).map(str::to_string),
        })
        .collect())
}

fn string_column(df: &DataFrame, name: &'static str) -> Result<StringChunked> {
    let column = df
        .column(name)
        .map_err(|e| Error::dataset_with_source(format!("Column '{}' not found", name), e))?
        .cast(&DataType::String)
        .map_err(|e| Error::dataset_with_source(format!("Column '{}' is not text", name), e))?;

    let values = column
        .str()
        .map_err(|e| Error::dataset_with_source(format!("Column '{}' is not string type", name), e))?
        .clone();

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_from_records_filters_unusable_rows() {
        let records = vec![
            RawRecipeRecord::new("Pancakes", Some(r#"c("2", "1")"#), Some(r#"c("flour", "egg")"#)),
            RawRecipeRecord::new("No Parts", Some(r#"c("1")"#), None),
            RawRecipeRecord::new("Broken", Some("2 cups"), Some(r#"c("flour")"#)),
            RawRecipeRecord::new("Empty", Some("c()"), Some(r#"c("egg")"#)),
            RawRecipeRecord::new("Toast", Some(r#"c("1")"#), Some(r#"c("bread", "butter")"#)),
            RawRecipeRecord {
                name: None,
                quantities: Some(r#"c("1")"#.to_string()),
                parts: Some(r#"c("rice")"#.to_string()),
            },
            RawRecipeRecord::new("  ", Some(r#"c("1")"#), Some(r#"c("rice")"#)),
        ];

        let (dataset, stats) = Dataset::from_records(records);

        assert_eq!(
            stats,
            LoadStats {
                total: 7,
                usable: 2,
                unnamed: 2,
                absent: 1,
                malformed: 1,
                empty: 1,
            }
        );
        assert_eq!(stats.dropped(), 5);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.recipes()[0].name, "Pancakes");
        assert_eq!(dataset.recipes()[0].ingredients, vec!["2 flour", "1 egg"]);
        assert_eq!(dataset.get("Toast").unwrap().ingredients, vec!["1 bread"]);
        assert!(dataset.get("Broken").is_none());
    }

    #[test]
    fn test_from_records_empty_input() {
        let (dataset, stats) = Dataset::from_records(Vec::new());
        assert!(dataset.is_empty());
        assert_eq!(stats, LoadStats::default());
    }

    #[test]
    fn test_load_csv() {
        let file = csv_file(concat!(
            "RecipeId,Name,RecipeIngredientQuantities,RecipeIngredientParts\n",
            "1,Pancakes,\"c(\"\"2\"\", \"\"1\"\")\",\"c(\"\"flour\"\", \"\"egg\"\")\"\n",
            "2,Broken,\"1, 2\",\"c(\"\"egg\"\")\"\n",
            "3,Missing,,\"c(\"\"egg\"\")\"\n",
            "4,Toast,\"c(\"\"1\"\")\",\"c(\"\"bread\"\", \"\"butter\"\")\"\n",
        ));

        let (dataset, stats) = Dataset::load_csv(file.path()).unwrap();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.usable, 2);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.absent, 1);
        assert_eq!(dataset.recipes()[0].name, "Pancakes");
        assert_eq!(dataset.recipes()[0].ingredients, vec!["2 flour", "1 egg"]);
        assert_eq!(dataset.recipes()[1].name, "Toast");
    }

    #[test]
    fn test_load_csv_na_ingredient_field_is_absent() {
        let file = csv_file(concat!(
            "Name,RecipeIngredientQuantities,RecipeIngredientParts\n",
            "Toast,\"c(\"\"1\"\")\",\"c(\"\"bread\"\")\"\n",
            "Mystery,NA,\"c(\"\"egg\"\")\"\n",
            "NA,\"c(\"\"1\"\")\",\"c(\"\"rice\"\")\"\n",
        ));

        let (dataset, stats) = Dataset::load_csv(file.path()).unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.malformed, 0);
        assert_eq!(stats.unnamed, 1);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.recipes()[0].name, "Toast");
    }

    #[test]
    fn test_load_csv_ignores_bad_values_in_other_columns() {
        let mut contents = String::from(
            "RecipeId,Name,RecipeServings,RecipeIngredientQuantities,RecipeIngredientParts\n",
        );
        for i in 0..200 {
            // Servings looks numeric for the inference window, then turns text
            let servings = match i {
                150 => "NA",
                180 => "serves a crowd",
                _ => "4",
            };
            contents.push_str(&format!(
                "{},Recipe {},{},\"c(\"\"1\"\")\",\"c(\"\"egg\"\")\"\n",
                i, i, servings
            ));
        }
        let file = csv_file(&contents);

        let (dataset, stats) = Dataset::load_csv(file.path()).unwrap();

        assert_eq!(stats.total, 200);
        assert_eq!(stats.usable, 200);
        assert_eq!(dataset.get("Recipe 150").unwrap().ingredients, vec!["1 egg"]);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = Dataset::load_csv(Path::new("/nonexistent/recipes.csv")).unwrap_err();
        assert!(matches!(err, Error::DatasetNotFound { .. }));
    }

    #[test]
    fn test_load_csv_missing_column() {
        let file = csv_file("Name,RecipeIngredientParts\nToast,\"c(\"\"bread\"\")\"\n");
        let err = Dataset::load_csv(file.path()).unwrap_err();
        assert!(matches!(err, Error::Dataset { .. }));
        assert!(err.to_string().contains(QUANTITIES_COLUMN));
    }
}
