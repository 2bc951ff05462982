//! Head rotation estimation from landmark geometry.
//!
//! A deliberately simple geometric estimate: yaw from temple asymmetry, pitch
//! from the nose position within the forehead-to-chin span, roll from the
//! temple height difference. No wrap-around correction is applied; angles are
//! raw `atan2` values in radians.

use crate::constants::{NOSE_POSITION_RATIO, NOSE_SPAN_REMAINDER};
use crate::landmarks::{HeadRotation, LandmarkName, LandmarkSet};

/// Estimate yaw/pitch/roll for a landmark set.
///
/// Pure function of the geometry; never fails. Degenerate inputs (zero head
/// width or zero face height) yield zero angles on the affected axes.
pub fn estimate_rotation(landmarks: &LandmarkSet) -> HeadRotation {
    let left = landmarks.point(LandmarkName::LeftTemple);
    let right = landmarks.point(LandmarkName::RightTemple);
    let head_width = landmarks.head_width;

    // Yaw from horizontal temple asymmetry against the expected head width
    let yaw = if head_width > 0.0 {
        let temple_diff = (left.x - right.x).abs();
        (temple_diff - head_width).atan2(head_width)
    } else {
        0.0
    };

    // Pitch from where the nose sits in the forehead-to-chin span
    let forehead_y = landmarks.point(LandmarkName::ForeheadCenter).y;
    let nose_y = landmarks.point(LandmarkName::NoseTip).y;
    let chin_y = landmarks.point(LandmarkName::Chin).y;
    let face_height = (forehead_y - chin_y).abs();
    let nose_ratio = if face_height > 0.0 {
        (nose_y - forehead_y) / face_height
    } else {
        0.0
    };
    let pitch = (nose_ratio - NOSE_POSITION_RATIO).atan2(NOSE_SPAN_REMAINDER);

    // Roll from vertical temple asymmetry
    let roll = if head_width > 0.0 {
        (left.y - right.y).atan2(head_width)
    } else {
        0.0
    };

    HeadRotation { yaw, pitch, roll }
}
