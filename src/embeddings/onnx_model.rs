// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! Runs the all-MiniLM-L6-v2 sentence transformer on ONNX Runtime and
//! reproduces the sentence-transformers encode pipeline:
//! - BERT tokenization, truncated to 256 tokens
//! - batch padding to the longest input
//! - transformer forward pass (token embeddings)
//! - attention-masked mean pooling
//! - L2 normalization
//!
//! Output vectors have 384 dimensions.

use super::{
    l2_normalize, Embedder, EmbeddingError, EMBEDDING_DIMENSION, MAX_SEQUENCE_LENGTH,
};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, ArrayView2, Axis, Ix2};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

/// ONNX-based embedding model (all-MiniLM-L6-v2)
///
/// # Thread Safety
/// `Session::run` needs exclusive access, so the session sits behind a
/// `Mutex` and concurrent inference calls are serialized. Cloning is cheap
/// (all heavy state is behind `Arc`).
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    session: Arc<Mutex<Session>>,

    tokenizer: Arc<Tokenizer>,

    /// Model name (e.g., "all-MiniLM-L6-v2")
    model_name: String,

    /// Output dimension (384 for all-MiniLM-L6-v2)
    dimension: usize,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads the model on the blocking pool.
    ///
    /// See [`OnnxEmbeddingModel::load`] for the error conditions.
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::new(
    ///     "all-MiniLM-L6-v2",
    ///     "./models/all-MiniLM-L6-v2-onnx/model.onnx",
    ///     "./models/all-MiniLM-L6-v2-onnx/tokenizer.json",
    /// ).await?;
    /// ```
    pub async fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref().to_path_buf();
        let tokenizer_path = tokenizer_path.as_ref().to_path_buf();

        tokio::task::spawn_blocking(move || Self::load(model_name, &model_path, &tokenizer_path))
            .await
            .context("Model loading task panicked")?
    }

    /// Loads the model synchronously.
    ///
    /// # Errors
    /// Returns error if:
    /// - Model or tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - The validation inference fails or doesn't produce 384 dimensions
    pub fn load(model_name: String, model_path: &Path, tokenizer_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        info!("Initializing ONNX embedding model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| anyhow!("Failed to configure tokenizer truncation: {}", e))?;
        // Padding is applied per batch in `encode`
        tokenizer.with_padding(None);

        let model = Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension: EMBEDDING_DIMENSION,
        };

        model
            .encode(&["validation test".to_string()])
            .context("Model validation inference failed")?;

        info!(
            "ONNX embedding model loaded: {} ({} dimensions)",
            model.model_name, model.dimension
        );

        Ok(model)
    }

    /// Embeds a batch of texts on the calling thread.
    ///
    /// Returns one L2-normalized vector per input, in input order.
    pub fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(text.as_str(), true)
                    .map_err(|e| EmbeddingError::Tokenization(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let batch_size = encodings.len();
        let max_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(batch_size * max_len);
        let mut attention_mask = Vec::with_capacity(batch_size * max_len);
        let mut token_type_ids = Vec::with_capacity(batch_size * max_len);

        for encoding in &encodings {
            input_ids.extend(padded(encoding.get_ids(), max_len));
            attention_mask.extend(padded(encoding.get_attention_mask(), max_len));
            token_type_ids.extend(padded(encoding.get_type_ids(), max_len));
        }

        // Kept for pooling; the tensor takes ownership of the original
        let pooling_mask = attention_mask.clone();

        let input_ids = Array2::from_shape_vec((batch_size, max_len), input_ids)
            .map_err(inference_error)?;
        let attention_mask = Array2::from_shape_vec((batch_size, max_len), attention_mask)
            .map_err(inference_error)?;
        let token_type_ids = Array2::from_shape_vec((batch_size, max_len), token_type_ids)
            .map_err(inference_error)?;

        let input_ids = Value::from_array(input_ids).map_err(inference_error)?;
        let attention_mask = Value::from_array(attention_mask).map_err(inference_error)?;
        let token_type_ids = Value::from_array(token_type_ids).map_err(inference_error)?;

        let mut session = lock_recovering(&self.session);
        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
                "token_type_ids" => token_type_ids
            ])
            .map_err(inference_error)?;

        // Index [0]: output names differ between exports
        let hidden_states = outputs[0]
            .try_extract_array::<f32>()
            .map_err(inference_error)?;

        if hidden_states.ndim() != 3 {
            return Err(EmbeddingError::Inference(format!(
                "Model outputs unexpected dimensions: {:?} (expected [batch, seq_len, {}])",
                hidden_states.shape(),
                self.dimension
            )));
        }

        let mut embeddings = Vec::with_capacity(batch_size);
        for (index, item_mask) in pooling_mask.chunks(max_len).enumerate() {
            let token_embeddings = hidden_states
                .index_axis(Axis(0), index)
                .into_dimensionality::<Ix2>()
                .map_err(inference_error)?;

            let mut pooled = mean_pool(token_embeddings, item_mask);
            if pooled.len() != self.dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    index,
                    actual: pooled.len(),
                    expected: self.dimension,
                });
            }

            l2_normalize(&mut pooled);
            embeddings.push(pooled);
        }

        debug!("Encoded batch of {} (padded to {} tokens)", batch_size, max_len);

        Ok(embeddings)
    }
}

#[async_trait]
impl Embedder for OnnxEmbeddingModel {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let model = self.clone();
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || model.encode(&texts))
            .await
            .map_err(|e| EmbeddingError::TaskAborted(e.to_string()))?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// The session keeps no state between runs, so a lock poisoned by a
/// panicking inference call is still usable.
fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn inference_error(e: impl std::fmt::Display) -> EmbeddingError {
    EmbeddingError::Inference(e.to_string())
}

/// Widens `values` to i64 and right-pads with zeros up to `len`
fn padded(values: &[u32], len: usize) -> impl Iterator<Item = i64> + '_ {
    values
        .iter()
        .map(|&v| v as i64)
        .chain(std::iter::repeat(0i64).take(len.saturating_sub(values.len())))
}

/// Averages token embeddings `[seq_len, hidden]`, weighted by the attention
/// mask so padding tokens don't contribute.
pub(crate) fn mean_pool(token_embeddings: ArrayView2<'_, f32>, attention_mask: &[i64]) -> Vec<f32> {
    let mut pooled = vec![0.0f32; token_embeddings.ncols()];
    let mut sum_mask = 0.0f32;

    for (row, &mask) in token_embeddings.outer_iter().zip(attention_mask) {
        let weight = mask as f32;
        sum_mask += weight;
        for (acc, value) in pooled.iter_mut().zip(row.iter()) {
            *acc += value * weight;
        }
    }

    let denominator = sum_mask.max(1e-9);
    for value in &mut pooled {
        *value /= denominator;
    }

    pooled
}
