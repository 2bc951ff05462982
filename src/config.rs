//! Configuration management for the hat try-on backend

use crate::constants::{DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_MISS_RESET_THRESHOLD, DEFAULT_SMOOTHING_FACTOR};
use crate::landmarks::LandmarkName;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Landmark extraction configuration
    pub detection: DetectionConfig,

    /// Performance / frame-rate configuration
    pub performance: PerformanceConfig,

    /// Hat placement configuration
    pub hat: HatConfig,

    /// Temporal smoothing configuration
    pub smoothing: SmoothingConfig,
}

/// Server parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Maximum inbound websocket message size in bytes
    pub max_message_size: usize,
}

/// Landmark extraction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Extractor backend name
    pub extractor: String,

    /// Detection confidence threshold (0.0-1.0)
    pub detection_confidence: f64,

    /// Tracking confidence threshold (0.0-1.0)
    pub tracking_confidence: f64,

    /// Maximum number of faces to track (fixed at 1 for this design)
    pub max_faces: usize,

    /// Frames wider than this get downscaled before detection
    pub detection_width: u32,

    /// Overrides for the extractor-specific mesh index of each named
    /// landmark. Unlisted names keep the built-in defaults.
    pub landmark_indices: HashMap<LandmarkName, usize>,
}

/// Performance parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Target framerate clients are expected to send at
    pub target_fps: u32,

    /// Expected capture width
    pub frame_width: u32,

    /// Expected capture height
    pub frame_height: u32,
}

/// Hat placement parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HatConfig {
    /// Scale multiplier applied on top of the head-width-derived scale
    pub scale_factor: f64,

    /// Vertical offset applied by the client renderer
    pub offset_y: f64,

    /// Fixed forward depth offset for the hat anchor
    pub offset_z: f64,

    /// Per-hat-model placement presets, keyed by model name
    pub model_presets: HashMap<String, HatModelPreset>,
}

/// Placement preset for one hat model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HatModelPreset {
    /// Scale multiplier relative to the computed pose scale
    pub scale_multiplier: f64,

    /// Vertical offset for this model
    pub y_offset: f64,
}

/// Temporal smoothing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// EMA weight on the previous pose (0 = no smoothing, 1 = frozen)
    pub factor: f64,

    /// Consecutive no-face frames before the session's prior pose is reset
    pub miss_reset_threshold: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            detection: DetectionConfig::default(),
            performance: PerformanceConfig::default(),
            hat: HatConfig::default(),
            smoothing: SmoothingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            extractor: "synthetic".to_string(),
            detection_confidence: 0.5,
            tracking_confidence: 0.5,
            max_faces: 1,
            detection_width: 320,
            landmark_indices: HashMap::new(),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            target_fps: 20,
            frame_width: 640,
            frame_height: 480,
        }
    }
}

impl Default for HatConfig {
    fn default() -> Self {
        let mut model_presets = HashMap::new();
        model_presets.insert("default".to_string(), HatModelPreset { scale_multiplier: 1.0, y_offset: -0.8 });
        model_presets.insert("large_hat".to_string(), HatModelPreset { scale_multiplier: 0.35, y_offset: -1.0 });
        model_presets.insert("small_hat".to_string(), HatModelPreset { scale_multiplier: 0.008, y_offset: -0.2 });
        model_presets.insert("cowboy_hat".to_string(), HatModelPreset { scale_multiplier: 0.8, y_offset: -0.9 });
        model_presets.insert("baseball_cap".to_string(), HatModelPreset { scale_multiplier: 0.6, y_offset: -0.6 });

        Self {
            scale_factor: 1.3,
            offset_y: -0.6,
            offset_z: 0.05,
            model_presets,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            factor: DEFAULT_SMOOTHING_FACTOR,
            miss_reset_threshold: DEFAULT_MISS_RESET_THRESHOLD,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Address to bind the listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.detection.detection_confidence) {
            return Err(Error::Config(
                "Detection confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detection.tracking_confidence) {
            return Err(Error::Config(
                "Tracking confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.detection.max_faces != 1 {
            return Err(Error::Config(
                "Only single-face tracking is supported (max_faces must be 1)".to_string(),
            ));
        }
        if self.detection.detection_width == 0 {
            return Err(Error::Config("Detection width must be greater than 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.smoothing.factor) {
            return Err(Error::Config(
                "Smoothing factor must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.smoothing.miss_reset_threshold == 0 {
            return Err(Error::Config(
                "Miss reset threshold must be greater than 0".to_string(),
            ));
        }
        if self.hat.scale_factor <= 0.0 {
            return Err(Error::Config("Hat scale factor must be positive".to_string()));
        }
        if self.server.max_message_size == 0 {
            return Err(Error::Config("Max message size must be greater than 0".to_string()));
        }
        if self.performance.target_fps == 0 {
            return Err(Error::Config("Target FPS must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_presets_present() {
        let config = Config::default();
        let preset = config.hat.model_presets.get("large_hat").unwrap();
        assert_eq!(preset.scale_multiplier, 0.35);
        assert_eq!(preset.y_offset, -1.0);
        assert_eq!(config.hat.model_presets.len(), 5);
    }

    #[test]
    fn test_invalid_smoothing_factor() {
        let mut config = Config::default();
        config.smoothing.factor = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_multi_face_rejected() {
        let mut config = Config::default();
        config.detection.max_faces = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "smoothing:\n  factor: 0.5\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.smoothing.factor, 0.5);
        assert_eq!(config.smoothing.miss_reset_threshold, DEFAULT_MISS_RESET_THRESHOLD);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_landmark_index_override_parses() {
        let yaml = "detection:\n  landmark_indices:\n    nose_tip: 4\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.detection.landmark_indices[&LandmarkName::NoseTip], 4);
    }

    #[test]
    fn test_bind_addr() {
        assert_eq!(Config::default().bind_addr(), "127.0.0.1:8000");
    }
}
