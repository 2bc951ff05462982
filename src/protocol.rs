//! Wire protocol: per-frame JSON replies and the health/status probe bodies.

use crate::config::{Config, HatModelPreset};
use crate::pose_calculation::HatPose;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dimensions of the processed frame, echoed back with each detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// One reply per processed frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReply {
    pub face_detected: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hat: Option<HatPose>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_size: Option<FrameSize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FrameReply {
    /// Successful detection with a smoothed hat pose
    pub fn detected(hat: HatPose, frame_size: FrameSize) -> Self {
        Self {
            face_detected: true,
            hat: Some(hat),
            frame_size: Some(frame_size),
            error: None,
        }
    }

    /// No face in the frame; not an error
    pub fn no_face() -> Self {
        Self {
            face_detected: false,
            hat: None,
            frame_size: None,
            error: None,
        }
    }

    /// Per-frame failure (decode or internal); the session continues
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            face_detected: false,
            hat: None,
            frame_size: None,
            error: Some(message.into()),
        }
    }
}

/// Liveness probe body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReply {
    pub status: String,
    pub message: String,
}

impl HealthReply {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            message: "Virtual hat try-on backend is running".to_string(),
        }
    }
}

/// Status probe body: a read-only view over the active configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: String,
    pub extractor: String,
    pub detection_confidence: f64,
    pub tracking_confidence: f64,
    pub max_faces: usize,
    pub target_fps: u32,
    pub smoothing_factor: f64,

    /// Renderer-side vertical offset clients apply when placing the hat
    pub hat_offset_y: f64,

    /// Per-model placement presets for the client renderer, sorted by name
    pub hat_models: BTreeMap<String, HatModelPreset>,
}

impl StatusReply {
    pub fn from_config(config: &Config) -> Self {
        Self {
            status: "healthy".to_string(),
            extractor: config.detection.extractor.clone(),
            detection_confidence: config.detection.detection_confidence,
            tracking_confidence: config.detection.tracking_confidence,
            max_faces: config.detection.max_faces,
            target_fps: config.performance.target_fps,
            smoothing_factor: config.smoothing.factor,
            hat_offset_y: config.hat.offset_y,
            hat_models: config
                .hat
                .model_presets
                .iter()
                .map(|(name, preset)| (name.clone(), *preset))
                .collect(),
        }
    }
}
