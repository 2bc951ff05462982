//! Landmark data model: named facial points and per-frame derived geometry.

use crate::constants::NUM_KEY_LANDMARKS;
use serde::{Deserialize, Serialize};

/// A single 3D landmark point. `x`/`y` are pixel coordinates in the processed
/// frame; `z` is depth relative to face width, as the extractor reports it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// The fixed set of named landmarks the pose pipeline consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkName {
    ForeheadCenter,
    ForeheadLeft,
    ForeheadRight,
    NoseTip,
    Chin,
    LeftTemple,
    RightTemple,
    TopHead,
}

impl LandmarkName {
    /// All landmark names, in storage order
    pub const ALL: [LandmarkName; NUM_KEY_LANDMARKS] = [
        LandmarkName::ForeheadCenter,
        LandmarkName::ForeheadLeft,
        LandmarkName::ForeheadRight,
        LandmarkName::NoseTip,
        LandmarkName::Chin,
        LandmarkName::LeftTemple,
        LandmarkName::RightTemple,
        LandmarkName::TopHead,
    ];

    fn index(self) -> usize {
        match self {
            LandmarkName::ForeheadCenter => 0,
            LandmarkName::ForeheadLeft => 1,
            LandmarkName::ForeheadRight => 2,
            LandmarkName::NoseTip => 3,
            LandmarkName::Chin => 4,
            LandmarkName::LeftTemple => 5,
            LandmarkName::RightTemple => 6,
            LandmarkName::TopHead => 7,
        }
    }
}

/// Head orientation in radians, derived from landmark geometry
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadRotation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// One frame's worth of named landmarks plus derived scalars. Built once per
/// frame by the extractor and discarded after pose computation.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: [LandmarkPoint; NUM_KEY_LANDMARKS],
    /// Horizontal temple-to-temple distance in pixels
    pub head_width: f64,
    /// Forehead-to-chin distance in pixels
    pub head_height: f64,
    /// Rotation estimate for this frame
    pub rotation: HeadRotation,
}

impl LandmarkSet {
    /// Build a landmark set from points in [`LandmarkName::ALL`] order,
    /// computing the derived scalars and the rotation estimate.
    pub fn new(points: [LandmarkPoint; NUM_KEY_LANDMARKS]) -> Self {
        let mut set = Self {
            points,
            head_width: 0.0,
            head_height: 0.0,
            rotation: HeadRotation::default(),
        };
        set.head_width = (set.point(LandmarkName::LeftTemple).x
            - set.point(LandmarkName::RightTemple).x)
            .abs();
        set.head_height = (set.point(LandmarkName::ForeheadCenter).y
            - set.point(LandmarkName::Chin).y)
            .abs();
        set.rotation = crate::rotation_estimation::estimate_rotation(&set);
        set
    }

    /// Get a named landmark point
    pub fn point(&self, name: LandmarkName) -> LandmarkPoint {
        self.points[name.index()]
    }
}
