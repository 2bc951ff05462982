//! Configuration loading, validation, and probe reply tests

use hat_tryon::config::{Config, HatModelPreset};
use hat_tryon::protocol::{HealthReply, StatusReply};

#[test]
fn test_default_config_matches_documented_values() {
    let config = Config::default();
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.max_message_size, 5 * 1024 * 1024);
    assert_eq!(config.detection.detection_confidence, 0.5);
    assert_eq!(config.detection.tracking_confidence, 0.5);
    assert_eq!(config.detection.max_faces, 1);
    assert_eq!(config.detection.detection_width, 320);
    assert_eq!(config.performance.target_fps, 20);
    assert_eq!(config.performance.frame_width, 640);
    assert_eq!(config.performance.frame_height, 480);
    assert_eq!(config.hat.scale_factor, 1.3);
    assert_eq!(config.hat.offset_z, 0.05);
    assert_eq!(config.smoothing.factor, 0.3);
    assert_eq!(config.smoothing.miss_reset_threshold, 10);
}

#[test]
fn test_yaml_round_trip() {
    let mut config = Config::default();
    config.server.port = 9100;
    config.smoothing.factor = 0.6;
    config
        .hat
        .model_presets
        .insert("top_hat".to_string(), HatModelPreset { scale_multiplier: 0.5, y_offset: -1.2 });

    let path = std::env::temp_dir().join(format!("hat_tryon_config_{}.yaml", std::process::id()));
    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.server.port, 9100);
    assert_eq!(loaded.smoothing.factor, 0.6);
    assert_eq!(
        loaded.hat.model_presets.get("top_hat"),
        Some(&HatModelPreset { scale_multiplier: 0.5, y_offset: -1.2 })
    );
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(Config::from_file("/nonexistent/hat_tryon.yaml").is_err());
}

#[test]
fn test_validation_rejects_bad_values() {
    let cases: Vec<Box<dyn Fn(&mut Config)>> = vec![
        Box::new(|c| c.detection.detection_confidence = 1.5),
        Box::new(|c| c.detection.tracking_confidence = -0.1),
        Box::new(|c| c.detection.max_faces = 0),
        Box::new(|c| c.detection.detection_width = 0),
        Box::new(|c| c.smoothing.factor = 2.0),
        Box::new(|c| c.smoothing.miss_reset_threshold = 0),
        Box::new(|c| c.hat.scale_factor = 0.0),
        Box::new(|c| c.server.max_message_size = 0),
        Box::new(|c| c.performance.target_fps = 0),
    ];
    for (i, mutate) in cases.iter().enumerate() {
        let mut config = Config::default();
        mutate(&mut config);
        assert!(config.validate().is_err(), "case {i} should fail validation");
    }
}

#[test]
fn test_health_reply_is_stable_json() {
    let json = serde_json::to_value(HealthReply::healthy()).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["message"].as_str().unwrap().contains("running"));
}

#[test]
fn test_status_reply_tracks_config_changes() {
    let mut config = Config::default();
    config.smoothing.factor = 0.45;
    config.detection.extractor = "none".to_string();
    let status = StatusReply::from_config(&config);
    assert_eq!(status.smoothing_factor, 0.45);
    assert_eq!(status.extractor, "none");
    assert_eq!(status.max_faces, 1);
}
