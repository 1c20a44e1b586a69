//! Templated "remix" recipe.
//!
//! Lists the user's ingredients followed by a fixed set of cooking steps.
//! There is no reasoning here; the instructions are the same for every input.

use serde::Serialize;

const HEADER: &str = "👩‍🍳 Here's a fun recipe you can try with your ingredients:";

const INSTRUCTIONS: [&str; 5] = [
    "Chop all your ingredients finely.",
    "Saute them in a pan with some oil/butter.",
    "Add basic spices like salt, pepper, and herbs.",
    "Simmer or bake depending on your preference.",
    "Serve hot with a smile! 😋",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedRecipe {
    pub ingredients: Vec<String>,
    pub instructions: Vec<&'static str>,
}

impl GeneratedRecipe {
    pub fn render(&self) -> String {
        let mut lines = vec![format!("{}\n", HEADER), "Ingredients:".to_string()];
        lines.extend(self.ingredients.iter().map(|i| format!("- {}", i)));
        lines.push("\nInstructions:".to_string());
        lines.extend(
            self.instructions
                .iter()
                .enumerate()
                .map(|(n, step)| format!("{}. {}", n + 1, step)),
        );
        lines.join("\n")
    }
}

/// Build the template for the given ingredients (trimmed, lowercased, blanks dropped).
pub fn generate_recipe<S: AsRef<str>>(ingredients: &[S]) -> GeneratedRecipe {
    GeneratedRecipe {
        ingredients: ingredients
            .iter()
            .map(|i| i.as_ref().trim().to_lowercase())
            .filter(|i| !i.is_empty())
            .collect(),
        instructions: INSTRUCTIONS.to_vec(),
    }
}
