//! Pantry CLI
//!
//! Interactive recipe bot plus one-shot `recommend` and `generate` commands
//! over the same dataset and engine the API server uses.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Input;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use pantry::config::{RecommendationConfig, DEFAULT_DATASET_PATH};
use pantry::{
    generate_recipe, Dataset, MatchMode, RecommendationEngine, Recommendations, UserIngredients,
    DEFAULT_TOP_N,
};

#[derive(Parser)]
#[command(
    name = "pantry-cli",
    about = "Find recipes you can cook with what is in your pantry"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Recipe CSV to load
    #[arg(long, global = true, env = "DATASET_PATH", default_value = DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// TOML file replacing the built-in substitution table
    #[arg(long, global = true, env = "SUBSTITUTIONS_PATH")]
    substitutions: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive menu (default)
    Chat,

    /// Recommend recipes once and exit
    Recommend {
        /// Comma-separated ingredients, e.g. "flour, egg, milk"
        #[arg(long)]
        ingredients: String,

        /// exact or partial
        #[arg(long, default_value = "exact")]
        mode: String,

        /// Maximum number of recipes
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print a templated recipe for the ingredients
    Generate {
        /// Comma-separated ingredients
        #[arg(long)]
        ingredients: String,
    },
}

struct Session {
    dataset: Dataset,
    engine: RecommendationEngine,
}

impl Session {
    fn load(cli: &Cli) -> Result<Self> {
        let recommendation = RecommendationConfig {
            substitutions_path: cli.substitutions.clone(),
            ..Default::default()
        };
        let substitutions = recommendation
            .load_substitutions()
            .context("Failed to load substitution table")?;

        let (dataset, _) = Dataset::load_csv(&cli.dataset)
            .with_context(|| format!("Failed to load dataset {}", cli.dataset.display()))?;

        Ok(Self {
            dataset,
            engine: RecommendationEngine::new(Arc::new(substitutions)),
        })
    }

    fn recommend(&self, ingredients: &str, mode: MatchMode, top_n: usize) -> Recommendations {
        let user = UserIngredients::from_comma_separated(ingredients);
        self.engine
            .recommend(&user, self.dataset.recipes(), mode, top_n)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        None | Some(Command::Chat) => chat(&cli),
        Some(Command::Recommend {
            ingredients,
            mode,
            top_n,
            json,
        }) => {
            let session = Session::load(&cli)?;
            let result = session.recommend(ingredients, MatchMode::parse_lossy(mode), *top_n);
            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_recommendations(&result);
            }
            Ok(())
        }
        Some(Command::Generate { ingredients }) => {
            println!("{}", generate_recipe(&split_ingredients(ingredients)).render());
            Ok(())
        }
    }
}

/// Logs go to stderr so they never mix with command output
fn init_tracing(verbose: bool) {
    let default = if verbose { "pantry=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::env::var("NO_COLOR").is_err())
        .init();
}

fn chat(cli: &Cli) -> Result<()> {
    println!("👋 Welcome to the Interactive Ingredient Recipe Bot!");
    let name = prompt("What's your name?")?;
    println!("Hello, {}! 👩‍🍳 Let's cook something delicious together!\n", name);

    let session = Session::load(cli)?;

    loop {
        println!("\n🍴 Choose an option:");
        println!("1. Recommend recipes");
        println!("2. Remix and create new recipe");
        println!("3. Exit");

        match prompt("Enter your choice (1/2/3)")?.as_str() {
            "1" => {
                let ingredients = prompt("Enter the ingredients you have (comma-separated)")?;
                let mode = prompt(
                    "Choose matching mode - type 'exact' for full match or 'partial' for partial match [default=exact]",
                )?;
                let result =
                    session.recommend(&ingredients, MatchMode::parse_lossy(&mode), DEFAULT_TOP_N);

                println!("\n🍽️ Top Matching Recipes You Can Make Now:\n");
                print_recommendations(&result);
            }
            "2" => {
                let ingredients = prompt("Enter the ingredients you have (comma-separated)")?;
                println!("\n{}", generate_recipe(&split_ingredients(&ingredients)).render());
            }
            "3" => {
                println!("\n👋 Goodbye! Enjoy your cooking adventure!");
                return Ok(());
            }
            _ => println!("❌ Invalid choice. Please select 1, 2, or 3."),
        }
    }
}

fn prompt(text: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(text)
        .allow_empty(true)
        .interact_text()
        .context("Failed to read input")?;
    Ok(value.trim().to_string())
}

fn split_ingredients(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

fn print_recommendations(result: &Recommendations) {
    if result.is_empty() {
        println!("No recipes found for those ingredients.");
        return;
    }

    let width = result
        .recipes
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    println!("{:<width$}  ingredients", "Name", width = width);
    for recipe in &result.recipes {
        println!(
            "{:<width$}  [{}]",
            recipe.name,
            recipe.ingredients.join(", "),
            width = width
        );
    }
    println!("\n(matched by: {})", result.source);
}
