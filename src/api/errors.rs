// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::embeddings::EmbeddingError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error body returned by every failing endpoint: `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Body absent, not JSON, or an empty JSON value
    NoJsonData,
    /// `inputs` missing or empty
    NoTexts,
    /// `inputs` is neither a string nor a list of strings
    InvalidInputs,
    /// Model invocation or response assembly failed
    Inference(String),
}

impl ApiError {
    pub fn message(&self) -> String {
        match self {
            ApiError::NoJsonData => "No JSON data provided".to_string(),
            ApiError::NoTexts => "No texts provided".to_string(),
            ApiError::InvalidInputs => "inputs must be a string or a list of strings".to_string(),
            ApiError::Inference(msg) => msg.clone(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.message(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoJsonData | ApiError::NoTexts | ApiError::InvalidInputs => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<EmbeddingError> for ApiError {
    fn from(err: EmbeddingError) -> Self {
        ApiError::Inference(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
