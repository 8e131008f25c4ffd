// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response body for POST /embeddings
//!
//! Serializes as a bare JSON array of vectors, one per input text:
//! ```json
//! [[0.01, -0.04, ...], [0.12, 0.08, ...]]
//! ```

use crate::api::ApiError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbedResponse(pub Vec<Vec<f32>>);

impl EmbedResponse {
    /// Wraps model output, checking it holds one vector per input
    pub fn from_embeddings(input_count: usize, embeddings: Vec<Vec<f32>>) -> Result<Self, ApiError> {
        if embeddings.len() != input_count {
            return Err(ApiError::Inference(format!(
                "Model returned {} embeddings for {} inputs",
                embeddings.len(),
                input_count
            )));
        }

        Ok(Self(embeddings))
    }

    pub fn embedding_count(&self) -> usize {
        self.0.len()
    }

    /// Dimension of the first vector, `None` when empty
    pub fn dimensions(&self) -> Option<usize> {
        self.0.first().map(Vec::len)
    }
}
