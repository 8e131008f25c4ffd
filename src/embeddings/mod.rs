// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence embedding models
//!
//! The HTTP layer only sees the [`Embedder`] trait. The production
//! implementation is [`OnnxEmbeddingModel`] (all-MiniLM-L6-v2 on ONNX
//! Runtime); [`HashedEmbedder`] is a deterministic stand-in used by tests
//! and benchmarks.

pub mod hashed;
pub mod model_loader;
pub mod onnx_model;

use async_trait::async_trait;
use thiserror::Error;

pub use hashed::HashedEmbedder;
pub use model_loader::{resolve_model_files, ModelFiles};
pub use onnx_model::OnnxEmbeddingModel;

/// Model name reported by the health endpoint
pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Hugging Face repository the model is fetched from
pub const MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Output dimension of all-MiniLM-L6-v2
pub const EMBEDDING_DIMENSION: usize = 384;

/// Longer inputs are truncated to this many tokens
pub const MAX_SEQUENCE_LENGTH: usize = 256;

/// Errors raised while computing embeddings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    #[error("Tokenization failed: {0}")]
    Tokenization(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Unexpected embedding dimension at index {index}: {actual} (expected {expected})")]
    DimensionMismatch {
        index: usize,
        actual: usize,
        expected: usize,
    },

    #[error("Inference task aborted: {0}")]
    TaskAborted(String),
}

/// Converts text into fixed-length f32 vectors.
///
/// Implementations are shared read-only between concurrent requests, so they
/// must be `Send + Sync`. `embed_batch` returns exactly one vector per input,
/// in input order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn model_name(&self) -> &str;

    fn dimension(&self) -> usize;
}

/// Scales `vector` to unit L2 norm in place. Zero vectors are left untouched.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
