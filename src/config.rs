//! Configuration management for Pantry Engine
//!
//! Strongly-typed configuration read from environment variables (and `.env`),
//! with validation and sensible defaults.
//!
//! # Example
//! ```no_run
//! use pantry::Config;
//! let config = Config::from_env().expect("failed to load config");
//! println!("Dataset: {}", config.dataset.path.display());
//! ```

use crate::error::{Error, Result};
use crate::recommendation::{SubstitutionTable, DEFAULT_TOP_N};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Default dataset location
pub const DEFAULT_DATASET_PATH: &str = "archive/recipes.csv";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Recipe dataset configuration
    pub dataset: DatasetConfig,
    /// API server configuration
    pub api: ApiConfig,
    /// Recommendation engine configuration
    pub recommendation: RecommendationConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Recipe dataset configuration
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Path to the recipe CSV
    pub path: PathBuf,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,
    /// Host to bind to
    pub host: String,
    /// Request timeout
    pub request_timeout: Duration,
    /// Maximum request body size
    pub max_body_size: usize,
    /// Enable CORS
    pub cors_enabled: bool,
    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

/// Recommendation engine configuration
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    /// Results returned when a request does not specify `top_n`
    pub default_top_n: usize,
    /// Largest `top_n` a request may ask for
    pub max_top_n: usize,
    /// Optional TOML file replacing the built-in substitution table
    pub substitutions_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Directory for daily-rolling log files
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // A missing .env is fine; an unparsable one is not
        check_dotenv(dotenvy::dotenv())?;

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_summary();

        Ok(config)
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let config = Self {
            dataset: DatasetConfig::from_env(&env),
            api: ApiConfig::from_env(&env)?,
            recommendation: RecommendationConfig::from_env(&env)?,
            logging: LoggingConfig::from_env(&env),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api.port == 0 {
            return Err(Error::InvalidConfig {
                key: "API_PORT",
                message: "port cannot be 0".into(),
            });
        }

        if self.recommendation.default_top_n == 0 {
            return Err(Error::InvalidConfig {
                key: "REC_DEFAULT_TOP_N",
                message: "default_top_n must be at least 1".into(),
            });
        }

        if self.recommendation.default_top_n > self.recommendation.max_top_n {
            return Err(Error::InvalidConfig {
                key: "REC_DEFAULT_TOP_N",
                message: "default_top_n must be <= max_top_n".into(),
            });
        }

        if self.dataset.path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig {
                key: "DATASET_PATH",
                message: "dataset path cannot be empty".into(),
            });
        }

        Ok(())
    }

    /// Log configuration summary
    fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  Dataset: {}", self.dataset.path.display());
        info!("  API:");
        info!("    Listening on: {}:{}", self.api.host, self.api.port);
        info!("    Request timeout: {:?}", self.api.request_timeout);
        info!("    CORS enabled: {}", self.api.cors_enabled);
        info!("  Recommendation:");
        info!(
            "    top_n: default {}, max {}",
            self.recommendation.default_top_n, self.recommendation.max_top_n
        );
        match &self.recommendation.substitutions_path {
            Some(path) => info!("    Substitutions: {}", path.display()),
            None => info!("    Substitutions: built-in table"),
        }
    }
}

impl DatasetConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Self {
        Self {
            path: PathBuf::from(env.get_or("DATASET_PATH", DEFAULT_DATASET_PATH)),
        }
    }
}

impl ApiConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self> {
        Ok(Self {
            port: env.parsed_or("API_PORT", 8080)?,
            host: env.get_or("API_HOST", "0.0.0.0"),
            request_timeout: Duration::from_secs(env.parsed_or("API_REQUEST_TIMEOUT_SECS", 30)?),
            max_body_size: env.parsed_or("API_MAX_BODY_SIZE", 1024 * 1024)?,
            cors_enabled: env.parsed_or("API_CORS_ENABLED", true)?,
            cors_origins: env
                .get_or("API_CORS_ORIGINS", "*")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }

    /// Socket address string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl RecommendationConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self> {
        Ok(Self {
            default_top_n: env.parsed_or("REC_DEFAULT_TOP_N", DEFAULT_TOP_N)?,
            max_top_n: env.parsed_or("REC_MAX_TOP_N", 100)?,
            substitutions_path: env.get("SUBSTITUTIONS_PATH").map(PathBuf::from),
        })
    }

    /// Built-in table, or the configured TOML replacement
    pub fn load_substitutions(&self) -> Result<SubstitutionTable> {
        match &self.substitutions_path {
            Some(path) => {
                let table = SubstitutionTable::from_toml_file(path)?;
                info!(
                    entries = table.len(),
                    "🔁 Loaded substitution table from {}",
                    path.display()
                );
                Ok(table)
            }
            None => Ok(SubstitutionTable::default()),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            default_top_n: DEFAULT_TOP_N,
            max_top_n: 100,
            substitutions_path: None,
        }
    }
}

impl LoggingConfig {
    /// Read only the logging settings from the process environment
    pub fn from_process_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env(&Env {
            lookup: |key: &str| std::env::var(key).ok(),
        })
    }

    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Self {
        Self {
            log_dir: env.get("LOG_DIR").map(PathBuf::from),
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn check_dotenv<T>(result: std::result::Result<T, dotenvy::Error>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::config("Failed to load .env file", e)),
    }
}

struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get variable, treating blank values as unset
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Get variable with default
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Get and parse variable, falling back to `default` when unset
    fn parsed_or<T>(&self, key: &'static str, default: T) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|e: T::Err| Error::InvalidConfig {
                key,
                message: format!("Invalid value '{}': {}", value, e).into(),
            }),
        }
    }
}
