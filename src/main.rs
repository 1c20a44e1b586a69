//! Pantry Engine
//!
//! Ingredient-based recipe recommendation service.
//!
//! # Architecture
//!
//! - **Dataset**: Recipe CSV parsed once at startup and shared read-only
//! - **Recommendation Engine**: Exact, substitution and partial matching
//! - **API Server**: REST endpoints for frontend consumption
//!
//! # Graceful Shutdown
//!
//! SIGTERM and SIGINT stop accepting connections and let in-flight
//! requests complete.

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pantry::api::{self, AppState};
use pantry::config::LoggingConfig;
use pantry::{Config, Dataset, RecommendationEngine, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging settings are needed before the subscriber exists
    let _log_guard = init_tracing(&LoggingConfig::from_process_env());

    info!("═══════════════════════════════════════════════════════════════");
    info!("  🍲 Pantry Engine v{}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════════════════════════");
    info!("  Components:");
    info!("    • Recipe Dataset");
    info!("    • Recommendation Engine (exact, substitution, partial)");
    info!("    • REST API Server");
    info!("═══════════════════════════════════════════════════════════════");

    let config = Config::from_env()?;
    info!("✅ Configuration loaded and validated");

    let substitutions = config.recommendation.load_substitutions()?;
    info!("✅ Substitution table ready ({} entries)", substitutions.len());
    let engine = RecommendationEngine::new(Arc::new(substitutions));

    info!("📦 Loading recipe dataset...");
    let dataset_path = config.dataset.path.clone();
    let (dataset, stats) =
        tokio::task::spawn_blocking(move || Dataset::load_csv(&dataset_path)).await??;
    info!(
        "✅ {} recipes ready ({} rows dropped)",
        stats.usable,
        stats.dropped()
    );

    let state = Arc::new(AppState::new(
        Arc::new(dataset),
        engine,
        config.recommendation.clone(),
    ));

    info!("═══════════════════════════════════════════════════════════════");
    info!("  📡 API: http://{}", config.api.bind_addr());
    info!("  🔗 Health: http://{}/health", config.api.bind_addr());
    info!("═══════════════════════════════════════════════════════════════");

    if let Err(e) = api::start_server(state, &config.api, shutdown_signal()).await {
        error!("API server error: {:?}", e);
        return Err(e);
    }

    info!("👋 Pantry Engine stopped gracefully");
    Ok(())
}

/// Initialize structured logging with tracing
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Default log levels
        EnvFilter::new("pantry_engine=debug,pantry=debug,tower_http=debug,info")
    });

    let (file_layer, guard) = match &logging.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "pantry-engine.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(std::env::var("NO_COLOR").is_err()),
        )
        .with(file_layer)
        .init();

    guard
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("📴 Shutdown signal received");
}
