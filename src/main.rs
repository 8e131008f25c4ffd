// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use embedding_server::{
    api::{start_server, AppState},
    config::ServerConfig,
    embeddings::{resolve_model_files, OnnxEmbeddingModel, MODEL_NAME},
    version,
};
use std::{env, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!(
        "Starting embedding server {} (built {})",
        version::VERSION,
        version::BUILD_DATE
    );

    let config = ServerConfig::from_env()?;

    // Model load is fatal on failure; the server never starts without it
    info!("Loading embedding model...");
    let files = resolve_model_files(&config.model_dir, &config.model_repo)
        .await
        .context("Failed to locate embedding model files")?;
    let model = OnnxEmbeddingModel::new(MODEL_NAME, &files.model_path, &files.tokenizer_path)
        .await
        .context("Failed to load embedding model")?;
    info!("Model loaded successfully!");

    let state = AppState::new(Arc::new(model));
    start_server(config.listen_addr(), state).await
}
