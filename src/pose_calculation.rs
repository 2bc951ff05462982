//! Hat pose calculation: raw 3D placement from one frame's landmarks.

use crate::config::HatConfig;
use crate::constants::{
    CROWN_OFFSET_RATIO, MAX_HAT_SCALE, MIN_HAT_SCALE, PITCH_DAMPING, REFERENCE_HEAD_WIDTH,
    ROLL_DAMPING, YAW_DAMPING,
};
use crate::landmarks::{LandmarkName, LandmarkSet};
use serde::{Deserialize, Serialize};

/// A 3-component vector, used for both position and rotation axes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// The unit of pipeline output and of smoothing state. Position axes are
/// normalized frame coordinates (z is a depth offset), rotation axes are
/// radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HatPose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f64,
}

impl HatPose {
    /// Fallback pose when placement cannot be computed from the landmarks
    pub fn fallback() -> Self {
        Self {
            position: Vec3::new(0.5, 0.3, 0.0),
            rotation: Vec3::default(),
            scale: 1.0,
        }
    }
}

/// Computes raw hat poses from landmark sets. Holds the configured placement
/// tunables; pure given its inputs.
#[derive(Debug, Clone)]
pub struct PoseCalculator {
    scale_factor: f64,
    offset_z: f64,
}

impl PoseCalculator {
    pub fn new(hat: &HatConfig) -> Self {
        Self {
            scale_factor: hat.scale_factor,
            offset_z: hat.offset_z,
        }
    }

    /// Calculate the hat pose for one frame.
    ///
    /// Never fails: degenerate frame dimensions fall back to
    /// [`HatPose::fallback`], degenerate head geometry falls back per
    /// component (centered position, unit scale).
    pub fn calculate_pose(&self, landmarks: &LandmarkSet, frame_width: u32, frame_height: u32) -> HatPose {
        if frame_width == 0 || frame_height == 0 {
            return HatPose::fallback();
        }

        HatPose {
            position: self.position(landmarks, frame_width, frame_height),
            rotation: self.rotation(landmarks),
            scale: self.scale(landmarks),
        }
    }

    /// Normalized position: forehead x, crown-adjusted y, configured depth
    fn position(&self, landmarks: &LandmarkSet, frame_width: u32, frame_height: u32) -> Vec3 {
        let forehead = landmarks.point(LandmarkName::ForeheadCenter);

        let x = forehead.x / f64::from(frame_width);
        // Move the anchor from the forehead up to the crown of the head
        let crown_offset = landmarks.head_height * CROWN_OFFSET_RATIO;
        let y = (forehead.y - crown_offset) / f64::from(frame_height);

        Vec3::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0), self.offset_z)
    }

    /// Hat rotation follows the head with per-axis damping for stability
    fn rotation(&self, landmarks: &LandmarkSet) -> Vec3 {
        let head = landmarks.rotation;
        Vec3::new(
            head.pitch * PITCH_DAMPING,
            head.yaw * YAW_DAMPING,
            head.roll * ROLL_DAMPING,
        )
    }

    /// Scale from head width against the reference calibration width
    fn scale(&self, landmarks: &LandmarkSet) -> f64 {
        if landmarks.head_width <= 0.0 {
            return 1.0;
        }
        let scale = (landmarks.head_width / REFERENCE_HEAD_WIDTH) * self.scale_factor;
        scale.clamp(MIN_HAT_SCALE, MAX_HAT_SCALE)
    }
}
