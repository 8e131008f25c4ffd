// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Deterministic hash-based embedder
//!
//! Produces pseudo-random unit vectors seeded from the text hash, so the
//! same text always maps to the same vector. Carries no semantics; it lets
//! the HTTP layer be exercised without the ONNX model files.

use super::{l2_normalize, Embedder, EmbeddingError, EMBEDDING_DIMENSION, MODEL_NAME};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    model_name: String,
    dimension: usize,
}

impl HashedEmbedder {
    pub fn new(model_name: impl Into<String>, dimension: usize) -> Self {
        Self {
            model_name: model_name.into(),
            dimension,
        }
    }

    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut current_seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimension);
        for i in 0..self.dimension {
            // LCG step, mixed with the component index
            current_seed =
                (current_seed.wrapping_mul(1664525).wrapping_add(1013904223)) ^ (i as u64);
            let value = (current_seed as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);
        }

        l2_normalize(&mut embedding);
        embedding
    }
}

impl Default for HashedEmbedder {
    /// Same name and dimension as the production model
    fn default() -> Self {
        Self::new(MODEL_NAME, EMBEDDING_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashedEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
