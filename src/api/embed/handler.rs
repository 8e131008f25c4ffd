// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embeddings HTTP handler

use crate::api::embed::{EmbedRequest, EmbedResponse};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use axum::{body::Bytes, extract::State, Json};
use tracing::{error, info};

/// POST /embeddings handler
///
/// # Request Body
/// ```json
/// { "inputs": "text" }
/// { "inputs": ["text1", "text2"] }
/// ```
///
/// # Response Body
/// A JSON array with one 384-float vector per input, in input order.
///
/// # Errors
/// - 400 `No JSON data provided` / `No texts provided` for unusable bodies
/// - 500 with the underlying message when inference fails
pub async fn embed_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EmbedResponse>, ApiError> {
    let texts = EmbedRequest::from_body(&body)?.into_texts()?;

    info!("Processing {} texts...", texts.len());

    let embeddings = state.embedder.embed_batch(&texts).await.map_err(|e| {
        error!("Error: {}", e);
        ApiError::from(e)
    })?;

    let response = EmbedResponse::from_embeddings(texts.len(), embeddings).map_err(|e| {
        error!("Error: {}", e);
        e
    })?;

    info!("Generated {} embeddings", response.embedding_count());

    Ok(Json(response))
}
