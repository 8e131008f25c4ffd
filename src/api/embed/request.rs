// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request body for POST /embeddings
//!
//! The body is read as raw bytes and classified here, so malformed input
//! maps onto the fixed client errors instead of axum's JSON rejections.

use crate::api::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `inputs` accepts either a bare string or a list of strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbedInputs {
    Single(String),
    Batch(Vec<String>),
}

/// Request body for POST /embeddings
///
/// # Example
/// ```json
/// { "inputs": ["Hello world", "Another text"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<EmbedInputs>,
}

impl EmbedRequest {
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            inputs: Some(EmbedInputs::Single(text.into())),
        }
    }

    pub fn batch<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: Some(EmbedInputs::Batch(
                texts.into_iter().map(Into::into).collect(),
            )),
        }
    }

    /// Parses a raw request body.
    ///
    /// # Classification
    /// - empty body, invalid JSON, or an empty JSON value
    ///   (`null`, `false`, `0`, `""`, `[]`, `{}`) → [`ApiError::NoJsonData`]
    /// - a non-object value, or `inputs` missing/empty → no inputs
    /// - `inputs` of any other shape → [`ApiError::InvalidInputs`]
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::NoJsonData)?;
        if is_empty_value(&value) {
            return Err(ApiError::NoJsonData);
        }

        let inputs = match value.get("inputs") {
            Some(inputs) if !is_empty_value(inputs) => inputs,
            _ => return Ok(Self { inputs: None }),
        };

        let inputs = EmbedInputs::deserialize(inputs).map_err(|_| ApiError::InvalidInputs)?;

        Ok(Self {
            inputs: Some(inputs),
        })
    }

    /// Normalizes the inputs to a non-empty list of texts
    pub fn into_texts(self) -> Result<Vec<String>, ApiError> {
        match self.inputs {
            Some(EmbedInputs::Single(text)) if !text.is_empty() => Ok(vec![text]),
            Some(EmbedInputs::Batch(texts)) if !texts.is_empty() => Ok(texts),
            _ => Err(ApiError::NoTexts),
        }
    }
}

/// JSON values that count as "nothing was sent"
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
