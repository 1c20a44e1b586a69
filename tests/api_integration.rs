//! HTTP API integration tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use pantry::api::{self, AppState};
use pantry::config::{ApiConfig, RecommendationConfig};
use pantry::{Dataset, RawRecipeRecord, RecommendationEngine};

fn sample_dataset() -> Dataset {
    let (dataset, _) = Dataset::from_records(vec![
        RawRecipeRecord::new("Toast", Some(r#"c("2", "1")"#), Some(r#"c("bread", "butter")"#)),
        RawRecipeRecord::new("Omelette", Some(r#"c("3", "1")"#), Some(r#"c("egg", "salt")"#)),
        RawRecipeRecord::new(
            "Pancakes",
            Some(r#"c("2", "1", "1")"#),
            Some(r#"c("flour", "egg", "milk")"#),
        ),
        RawRecipeRecord::new("Unusable", None, Some(r#"c("water")"#)),
    ]);
    dataset
}

fn test_app() -> Router {
    let api_config = ApiConfig {
        port: 8080,
        host: "127.0.0.1".to_string(),
        request_timeout: Duration::from_secs(5),
        max_body_size: 64 * 1024,
        cors_enabled: true,
        cors_origins: vec!["*".to_string()],
    };
    let recommendation = RecommendationConfig {
        max_top_n: 10,
        ..Default::default()
    };
    let state = Arc::new(AppState::new(
        Arc::new(sample_dataset()),
        RecommendationEngine::default(),
        recommendation,
    ));

    api::router(state, &api_config)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn recipe_names(body: &Value) -> Vec<String> {
    body["recipes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["Name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_home_banner() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("Recipe Recommendation Backend is Running!"));
}

#[tokio::test]
async fn test_health_reports_recipe_count() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["recipes"], 3);
}

#[tokio::test]
async fn test_recommend_exact() {
    let (status, body) = post_json(
        test_app(),
        "/recommend",
        json!({ "ingredients": ["Bread", " butter "], "mode": "exact" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched_by"], "exact");
    assert_eq!(recipe_names(&body), vec!["Toast"]);
    assert_eq!(body["recipes"][0]["ingredients"], json!(["2 bread", "1 butter"]));
}

#[tokio::test]
async fn test_recommend_substitution_fallback() {
    let (status, body) = post_json(
        test_app(),
        "/recommend",
        json!({ "ingredients": ["bread", "ghee"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched_by"], "substitution");
    assert_eq!(recipe_names(&body), vec!["Toast"]);
}

#[tokio::test]
async fn test_recommend_partial_ranks_by_overlap() {
    let (status, body) = post_json(
        test_app(),
        "/recommend",
        json!({ "ingredients": ["egg", "milk"], "mode": "partial" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched_by"], "partial");
    assert_eq!(recipe_names(&body), vec!["Pancakes", "Omelette"]);
}

#[tokio::test]
async fn test_recommend_respects_top_n() {
    let (status, body) = post_json(
        test_app(),
        "/recommend",
        json!({ "ingredients": ["egg"], "mode": "partial", "top_n": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(recipe_names(&body), vec!["Omelette"]);
}

#[tokio::test]
async fn test_recommend_unknown_mode_is_exact() {
    let (status, body) = post_json(
        test_app(),
        "/recommend",
        json!({ "ingredients": ["egg"], "mode": "fuzzy" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched_by"], "none");
    assert!(recipe_names(&body).is_empty());
}

#[tokio::test]
async fn test_recommend_empty_ingredients() {
    let (status, body) = post_json(test_app(), "/recommend", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert!(recipe_names(&body).is_empty());
}

#[tokio::test]
async fn test_recommend_top_n_over_limit() {
    let (status, body) = post_json(
        test_app(),
        "/recommend",
        json!({ "ingredients": ["egg"], "top_n": 1000 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_generate() {
    let (status, body) = post_json(
        test_app(),
        "/generate",
        json!({ "ingredients": ["Tomato", "basil"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let recipe = body["recipe"].as_str().unwrap();
    assert!(recipe.contains("Ingredients:\n- tomato\n- basil"));
    assert!(recipe.contains("1. Chop all your ingredients finely."));
}
