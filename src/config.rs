// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Server configuration resolved from the process environment
//!
//! | Variable               | Default                                  |
//! |------------------------|------------------------------------------|
//! | `PORT`                 | `5001`                                   |
//! | `EMBEDDING_MODEL_DIR`  | `./models/all-MiniLM-L6-v2-onnx`         |
//! | `EMBEDDING_MODEL_REPO` | `sentence-transformers/all-MiniLM-L6-v2` |

use crate::embeddings::MODEL_REPO;
use anyhow::{Context, Result};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_MODEL_DIR: &str = "./models/all-MiniLM-L6-v2-onnx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listening port; the server binds all interfaces
    pub port: u16,

    /// Directory searched for `model.onnx` and `tokenizer.json`
    pub model_dir: PathBuf,

    /// Hugging Face repository used when the model directory is incomplete
    pub model_repo: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            model_repo: MODEL_REPO.to_string(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// An unparseable `PORT` is an error rather than a silent fallback.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {:?}", value))?,
            None => defaults.port,
        };

        let model_dir = lookup("EMBEDDING_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_dir);

        let model_repo = lookup("EMBEDDING_MODEL_REPO").unwrap_or(defaults.model_repo);

        Ok(Self {
            port,
            model_dir,
            model_repo,
        })
    }

    /// `0.0.0.0:<port>`
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
