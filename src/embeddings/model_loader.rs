// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Locates the ONNX model and tokenizer files.
//!
//! Files already present in the configured model directory win. Otherwise
//! they are fetched from the Hugging Face Hub (and cached by `hf-hub`), so a
//! fresh host can start without a separate download step.

use anyhow::{Context, Result};
use hf_hub::api::tokio::Api;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the ONNX graph inside a local model directory
pub const MODEL_FILE: &str = "model.onnx";

/// File name of the tokenizer inside a local model directory
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Path of the ONNX export inside the Hugging Face repository
const HUB_MODEL_FILE: &str = "onnx/model.onnx";

/// Resolved on-disk locations of a model's files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

impl ModelFiles {
    /// Returns the files under `dir` if both exist
    pub fn in_dir(dir: &Path) -> Option<Self> {
        let files = Self {
            model_path: dir.join(MODEL_FILE),
            tokenizer_path: dir.join(TOKENIZER_FILE),
        };

        (files.model_path.is_file() && files.tokenizer_path.is_file()).then_some(files)
    }
}

/// Resolves model files from `model_dir`, falling back to downloading them
/// from `repo_id` on the Hugging Face Hub.
pub async fn resolve_model_files(model_dir: &Path, repo_id: &str) -> Result<ModelFiles> {
    if let Some(files) = ModelFiles::in_dir(model_dir) {
        info!("Using local model files from {}", model_dir.display());
        return Ok(files);
    }

    info!(
        "Model files not found in {}, downloading {} from Hugging Face Hub",
        model_dir.display(),
        repo_id
    );

    let api = Api::new().context("Failed to initialize Hugging Face Hub client")?;
    let repo = api.model(repo_id.to_string());

    let model_path = repo
        .get(HUB_MODEL_FILE)
        .await
        .with_context(|| format!("Failed to download {} from {}", HUB_MODEL_FILE, repo_id))?;
    let tokenizer_path = repo
        .get(TOKENIZER_FILE)
        .await
        .with_context(|| format!("Failed to download {} from {}", TOKENIZER_FILE, repo_id))?;

    Ok(ModelFiles {
        model_path,
        tokenizer_path,
    })
}
