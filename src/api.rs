//! HTTP API Server for Recommendations
//!
//! REST endpoints in front of the matching engine:
//! - `GET /` and `GET /health`
//! - `POST /recommend` ranked recipes for a list of ingredients
//! - `POST /generate` templated recipe text

use axum::{
    extract::State,
    http::{HeaderValue, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{ApiConfig, RecommendationConfig};
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::recommendation::{
    generate_recipe, MatchMode, MatchSource, RecipeMatch, RecommendationEngine, UserIngredients,
};

/// Shared application state
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub engine: RecommendationEngine,
    pub recommendation: RecommendationConfig,
}

impl AppState {
    pub fn new(
        dataset: Arc<Dataset>,
        engine: RecommendationEngine,
        recommendation: RecommendationConfig,
    ) -> Self {
        Self {
            dataset,
            engine,
            recommendation,
        }
    }
}

/// Request body for `/recommend`
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// `exact` or `partial`; anything else means exact
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Response for `/recommend`
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recipes: Vec<RecipeMatch>,
    pub matched_by: MatchSource,
}

/// Request body for `/generate`
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// Response for `/generate`
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub recipe: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub recipes: usize,
}

/// Build the router with its middleware stack
pub fn router(state: Arc<AppState>, config: &ApiConfig) -> Router {
    let app = Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/recommend", post(recommend))
        .route("/generate", post(generate))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(RequestBodyLimitLayer::new(config.max_body_size));

    let app = if config.cors_enabled {
        app.layer(cors_layer(&config.cors_origins))
    } else {
        app
    };

    app.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(parsed))
}

/// Start the API server and run until `shutdown` resolves
pub async fn start_server(
    state: Arc<AppState>,
    config: &ApiConfig,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = router(state, config);

    let addr = config.bind_addr();
    info!("🚀 Starting recommendation API server on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn home() -> &'static str {
    "🍲 Recipe Recommendation Backend is Running!"
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        recipes: state.dataset.len(),
    })
}

/// Recommend recipes for the posted ingredients
async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>> {
    let top_n = req.top_n.unwrap_or(state.recommendation.default_top_n);
    if top_n > state.recommendation.max_top_n {
        return Err(Error::bad_request(format!(
            "top_n must be at most {}",
            state.recommendation.max_top_n
        )));
    }

    let mode = req
        .mode
        .as_deref()
        .map(MatchMode::parse_lossy)
        .unwrap_or_default();
    let user = UserIngredients::new(&req.ingredients);

    // CPU-bound scan over the whole dataset
    let result = tokio::task::spawn_blocking(move || {
        state
            .engine
            .recommend(&user, state.dataset.recipes(), mode, top_n)
    })
    .await?;

    Ok(Json(RecommendResponse {
        recipes: result.recipes,
        matched_by: result.source,
    }))
}

/// Generate the templated recipe text
async fn generate(Json(req): Json<GenerateRequest>) -> Json<GenerateResponse> {
    Json(GenerateResponse {
        recipe: generate_recipe(&req.ingredients).render(),
    })
}
