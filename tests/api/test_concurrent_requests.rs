// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Concurrent requests against one shared model handle must each get back
//! only the vectors for their own inputs.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
};
use embedding_server::{
    api::{create_app, AppState},
    embeddings::HashedEmbedder,
};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use tower::util::ServiceExt;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_do_not_cross_mix() {
    let embedder = Arc::new(HashedEmbedder::default());
    let app = create_app(AppState::new(embedder.clone()));

    let requests = (0..32).map(|i| {
        let app = app.clone();
        let texts: Vec<String> = (0..(i % 5 + 1))
            .map(|j| format!("request {} text {}", i, j))
            .collect();

        tokio::spawn(async move {
            let request = Request::builder()
                .method(Method::POST)
                .uri("/embeddings")
                .body(Body::from(json!({ "inputs": texts }).to_string()))
                .unwrap();

            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let vectors: Vec<Vec<f32>> = serde_json::from_slice(&bytes).unwrap();
            (texts, vectors)
        })
    });

    for result in join_all(requests).await {
        let (texts, vectors) = result.unwrap();
        assert_eq!(vectors.len(), texts.len());

        for (text, vector) in texts.iter().zip(&vectors) {
            let expected = embedder.embed_one(text);
            assert_eq!(vector.len(), expected.len());
            assert!(
                vector
                    .iter()
                    .zip(&expected)
                    .all(|(got, want)| (got - want).abs() < 1e-6),
                "wrong vector for {}",
                text
            );
        }
    }
}
