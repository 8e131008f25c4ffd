// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET / health check tests

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
};
use embedding_server::{
    api::{create_app, AppState, HealthResponse},
    embeddings::HashedEmbedder,
};
use std::sync::Arc;
use tower::util::ServiceExt;

#[tokio::test]
async fn test_health_returns_fixed_descriptor() {
    let app = create_app(AppState::new(Arc::new(HashedEmbedder::default())));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        health,
        HealthResponse {
            status: "ok".to_string(),
            model: "all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
        }
    );
}

#[tokio::test]
async fn test_health_ignores_request_body() {
    let app = create_app(AppState::new(Arc::new(HashedEmbedder::default())));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::from("garbage"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_app(AppState::new(Arc::new(HashedEmbedder::default())));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/embed")
        .body(Body::from(r#"{"inputs": "x"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
