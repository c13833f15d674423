// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model manager tests that do not need a real ONNX model

use fabstir_vision_node::vision::{DetectionModelConfig, DetectionModelManager};

#[tokio::test]
async fn test_disabled_model() {
    let config = DetectionModelConfig {
        model_path: None,
        ..Default::default()
    };
    let manager = DetectionModelManager::new(config).await.unwrap();

    assert!(!manager.has_engine());
    assert!(manager.get_engine().is_none());
    assert_eq!(manager.model_info().name, "none");
}

#[tokio::test]
async fn test_corrupt_model_file_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("broken.onnx");
    std::fs::write(&model, b"not an onnx graph").unwrap();

    let config = DetectionModelConfig {
        model_path: Some(model),
        ..Default::default()
    };
    let manager = DetectionModelManager::new(config).await.unwrap();
    assert!(!manager.model_info().available);
}
