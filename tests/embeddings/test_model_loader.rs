// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model file resolution tests

use embedding_server::embeddings::{resolve_model_files, ModelFiles};
use std::fs;
use tempfile::TempDir;

fn model_dir(with_model: bool, with_tokenizer: bool) -> TempDir {
    let dir = TempDir::new().unwrap();
    if with_model {
        fs::write(dir.path().join("model.onnx"), b"onnx").unwrap();
    }
    if with_tokenizer {
        fs::write(dir.path().join("tokenizer.json"), b"{}").unwrap();
    }
    dir
}

#[test]
fn test_in_dir_finds_both_files() {
    let dir = model_dir(true, true);

    let files = ModelFiles::in_dir(dir.path()).expect("both files present");
    assert_eq!(files.model_path, dir.path().join("model.onnx"));
    assert_eq!(files.tokenizer_path, dir.path().join("tokenizer.json"));
}

#[test]
fn test_in_dir_requires_both_files() {
    assert!(ModelFiles::in_dir(model_dir(true, false).path()).is_none());
    assert!(ModelFiles::in_dir(model_dir(false, true).path()).is_none());
    assert!(ModelFiles::in_dir(model_dir(false, false).path()).is_none());
}

#[tokio::test]
async fn test_resolve_prefers_local_files() {
    let dir = model_dir(true, true);

    // A bogus repo id proves the hub is never contacted
    let files = resolve_model_files(dir.path(), "invalid/does-not-exist")
        .await
        .unwrap();

    assert_eq!(files, ModelFiles::in_dir(dir.path()).unwrap());
}
