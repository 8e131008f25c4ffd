// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Model tests for embedding generation
//!
//! Need the real all-MiniLM-L6-v2 files, so they are ignored by default.
//! Run with `cargo test -- --ignored` after placing `model.onnx` and
//! `tokenizer.json` in EMBEDDING_MODEL_DIR (default ./models/all-MiniLM-L6-v2-onnx).

use embedding_server::{
    config::DEFAULT_MODEL_DIR,
    embeddings::{Embedder, ModelFiles, OnnxEmbeddingModel},
};
use std::path::PathBuf;

async fn load_model() -> OnnxEmbeddingModel {
    let dir = std::env::var("EMBEDDING_MODEL_DIR").unwrap_or_else(|_| DEFAULT_MODEL_DIR.to_string());
    let files = ModelFiles::in_dir(&PathBuf::from(&dir))
        .unwrap_or_else(|| panic!("model files missing in {}", dir));

    OnnxEmbeddingModel::new("all-MiniLM-L6-v2", &files.model_path, &files.tokenizer_path)
        .await
        .expect("Failed to load model")
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod onnx_model_tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Only run if model files are downloaded
    async fn test_model_loads_with_384_dimensions() {
        let model = load_model().await;

        assert_eq!(model.model_name(), "all-MiniLM-L6-v2");
        assert_eq!(model.dimension(), 384);
    }

    #[tokio::test]
    #[ignore]
    async fn test_batch_shape_and_normalization() {
        let model = load_model().await;
        let texts = vec![
            "The cat sits on the mat".to_string(),
            "A much longer sentence that will need padding relative to the first one in the batch"
                .to_string(),
        ];

        let embeddings = model.embed_batch(&texts).await.unwrap();
        assert_eq!(embeddings.len(), 2);

        for embedding in &embeddings {
            assert_eq!(embedding.len(), 384);
            let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-4, "norm was {}", norm);
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_padding_does_not_change_vectors() {
        let model = load_model().await;
        let short = "short".to_string();
        let long = "a considerably longer input sentence with many more tokens".to_string();

        let alone = model.embed_batch(&[short.clone()]).await.unwrap();
        let batched = model.embed_batch(&[short, long]).await.unwrap();

        assert!(cosine(&alone[0], &batched[0]) > 0.9999);
    }

    #[tokio::test]
    #[ignore]
    async fn test_deterministic_output() {
        let model = load_model().await;
        let texts = vec!["repeatable".to_string()];

        let first = model.embed_batch(&texts).await.unwrap();
        let second = model.embed_batch(&texts).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    #[ignore]
    async fn test_semantic_similarity() {
        let model = load_model().await;
        let texts = vec![
            "The weather is lovely today".to_string(),
            "It's so sunny outside".to_string(),
            "He drove to the stadium".to_string(),
        ];

        let e = model.embed_batch(&texts).await.unwrap();
        assert!(cosine(&e[0], &e[1]) > cosine(&e[0], &e[2]));
    }

    #[tokio::test]
    #[ignore]
    async fn test_long_input_is_truncated() {
        let model = load_model().await;
        let long_text = "word ".repeat(2000);

        let embeddings = model.embed_batch(&[long_text]).await.unwrap();
        assert_eq!(embeddings[0].len(), 384);
    }
}
