// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API Module
//!
//! POST /embeddings: turns one or more texts into 384-dimensional vectors.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::embed_handler;
pub use request::{EmbedInputs, EmbedRequest};
pub use response::EmbedResponse;
