//! Ingredient normalization for comparison.
//!
//! `"1/2 cup Flour"` and `"flour"` must compare equal, so leading quantity
//! noise and a leading measurement unit are stripped before case folding.

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading run of digits, whitespace, slashes, periods, commas and dashes
static QUANTITY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s/.,-]+").expect("quantity prefix pattern is valid"));

/// A single leading unit word; only stripped when something follows it
static UNIT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:cups?|tbsp|tsp|tablespoons?|teaspoons?|oz|ounces?|lbs?|pounds?|g|grams?|kg|ml|l|liters?|pinch(?:es)?|dash(?:es)?)\.?\s+",
    )
    .expect("unit prefix pattern is valid")
});

/// Normalize an ingredient string for set comparison.
///
/// Total and idempotent: prefixes are stripped until neither pattern matches.
pub fn normalize(ingredient: &str) -> String {
    let lowered = ingredient.to_lowercase();
    let mut rest = lowered.as_str();

    loop {
        let before = rest.len();
        if let Some(m) = QUANTITY_PREFIX.find(rest) {
            rest = &rest[m.end()..];
        }
        if let Some(m) = UNIT_PREFIX.find(rest) {
            rest = &rest[m.end()..];
        }
        if rest.len() == before {
            break;
        }
    }

    rest.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_fraction_and_decimal_quantities() {
        assert_eq!(normalize("1/2 sugar"), "sugar");
        assert_eq!(normalize("2.5 milk"), "milk");
        assert_eq!(normalize("1,5 butter"), "butter");
        assert_eq!(normalize("1-2 onion"), "onion");
    }

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize("  Brown Sugar  "), "brown sugar");
        assert_eq!(normalize("EGG"), "egg");
    }

    #[test]
    fn test_normalize_strips_leading_unit() {
        assert_eq!(normalize("2 cup flour"), "flour");
        assert_eq!(normalize("3 Tbsp. olive oil"), "olive oil");
        assert_eq!(normalize("1 pinch salt"), "salt");
    }

    #[test]
    fn test_normalize_keeps_unit_like_words_inside_names() {
        assert_eq!(normalize("1 lemon"), "lemon");
        assert_eq!(normalize("1 garlic powder"), "garlic powder");
        assert_eq!(normalize("2 cups"), "cups");
    }

    #[test]
    fn test_normalize_passes_through_unmatched_noise() {
        assert_eq!(normalize("~2 eggs"), "~2 eggs");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("1/2"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "2 cup flour",
            "1/2 Cup 2 cups milk",
            "cup cup flour",
            " 3 . , - egg ",
            "~2 eggs",
            "lb",
            "1 g",
            "chia seeds",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
