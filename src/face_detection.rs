//! Landmark extraction seam.
//!
//! The actual face-landmark detector is a black box behind
//! [`LandmarkExtractor`]: it receives a decoded frame and yields the named
//! landmark set, or `None` when no face is present. A
//! [`LandmarkIndexMap`] translates our landmark names into whatever mesh
//! numbering a concrete backend uses, so the pipeline never depends on one
//! detector's indexing scheme.

use crate::config::DetectionConfig;
use crate::constants::NUM_KEY_LANDMARKS;
use crate::frame::Frame;
use crate::landmarks::{LandmarkName, LandmarkPoint, LandmarkSet};
use crate::{Error, Result};
use std::collections::HashMap;

/// Black-box landmark detector interface. One instance per session; the
/// session task owns it, so `&mut self` is fine and no cross-session locking
/// is needed.
pub trait LandmarkExtractor: Send {
    /// Extract the named landmark set from a frame, or `None` if no face was
    /// found.
    fn extract(&mut self, frame: &Frame) -> Result<Option<LandmarkSet>>;

    /// Backend name, for logs and the status probe
    fn name(&self) -> &str;
}

/// Mapping from landmark name to a backend-specific mesh index.
///
/// Defaults follow the MediaPipe face-mesh numbering; individual entries can
/// be overridden through `detection.landmark_indices` in the config.
#[derive(Debug, Clone)]
pub struct LandmarkIndexMap {
    indices: [usize; NUM_KEY_LANDMARKS],
}

impl Default for LandmarkIndexMap {
    fn default() -> Self {
        let mut map = Self { indices: [0; NUM_KEY_LANDMARKS] };
        map.set(LandmarkName::ForeheadCenter, 9);
        map.set(LandmarkName::ForeheadLeft, 151);
        map.set(LandmarkName::ForeheadRight, 377);
        map.set(LandmarkName::NoseTip, 1);
        map.set(LandmarkName::Chin, 175);
        map.set(LandmarkName::LeftTemple, 234);
        map.set(LandmarkName::RightTemple, 454);
        map.set(LandmarkName::TopHead, 10);
        map
    }
}

impl LandmarkIndexMap {
    /// Build the map from config overrides on top of the defaults
    pub fn from_config(overrides: &HashMap<LandmarkName, usize>) -> Self {
        let mut map = Self::default();
        for (&name, &index) in overrides {
            map.set(name, index);
        }
        map
    }

    /// Backend mesh index for a named landmark
    pub fn index_of(&self, name: LandmarkName) -> usize {
        self.indices[LandmarkName::ALL.iter().position(|&n| n == name).unwrap_or(0)]
    }

    fn set(&mut self, name: LandmarkName, index: usize) {
        if let Some(pos) = LandmarkName::ALL.iter().position(|&n| n == name) {
            self.indices[pos] = index;
        }
    }

    /// Pick the named landmarks out of a backend's full mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is too short for a mapped index.
    pub fn select(&self, mesh: &[LandmarkPoint]) -> Result<LandmarkSet> {
        let mut points = [LandmarkPoint::default(); NUM_KEY_LANDMARKS];
        for (slot, &name) in points.iter_mut().zip(LandmarkName::ALL.iter()) {
            let index = self.index_of(name);
            *slot = *mesh.get(index).ok_or_else(|| {
                Error::Extractor(format!(
                    "Mesh has {} points, landmark {:?} maps to index {}",
                    mesh.len(),
                    name,
                    index
                ))
            })?;
        }
        Ok(LandmarkSet::new(points))
    }
}

/// Deterministic extractor that synthesizes a centered, front-facing face
/// from the frame dimensions alone. Stands in for a real detector backend
/// during development and in tests.
pub struct SyntheticExtractor {
    map: LandmarkIndexMap,
}

impl SyntheticExtractor {
    pub fn new(map: LandmarkIndexMap) -> Self {
        Self { map }
    }
}

impl LandmarkExtractor for SyntheticExtractor {
    fn extract(&mut self, frame: &Frame) -> Result<Option<LandmarkSet>> {
        let w = f64::from(frame.width);
        let h = f64::from(frame.height);
        if frame.width == 0 || frame.height == 0 {
            return Ok(None);
        }

        let cx = w / 2.0;
        let head_width = w * 0.35;
        let forehead_y = h * 0.3;
        let chin_y = h * 0.75;
        let face_height = chin_y - forehead_y;

        // Lay the named points out on a mini-mesh at their mapped indices so
        // the selection path is exercised exactly as a real backend would.
        let mesh_len = LandmarkName::ALL
            .iter()
            .map(|&n| self.map.index_of(n))
            .max()
            .unwrap_or(0)
            + 1;
        let mut mesh = vec![LandmarkPoint::default(); mesh_len];

        let place = |mesh: &mut Vec<LandmarkPoint>, name: LandmarkName, x: f64, y: f64| {
            mesh[self.map.index_of(name)] = LandmarkPoint::new(x, y, 0.0);
        };
        place(&mut mesh, LandmarkName::ForeheadCenter, cx, forehead_y);
        place(&mut mesh, LandmarkName::ForeheadLeft, cx - head_width * 0.35, forehead_y + face_height * 0.05);
        place(&mut mesh, LandmarkName::ForeheadRight, cx + head_width * 0.35, forehead_y + face_height * 0.05);
        place(&mut mesh, LandmarkName::NoseTip, cx, forehead_y + face_height * 0.3);
        place(&mut mesh, LandmarkName::Chin, cx, chin_y);
        place(&mut mesh, LandmarkName::LeftTemple, cx - head_width / 2.0, forehead_y + face_height * 0.2);
        place(&mut mesh, LandmarkName::RightTemple, cx + head_width / 2.0, forehead_y + face_height * 0.2);
        place(&mut mesh, LandmarkName::TopHead, cx, forehead_y - face_height * 0.25);

        self.map.select(&mesh).map(Some)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// Extractor that never finds a face; useful for exercising the no-face path
pub struct NullExtractor;

impl LandmarkExtractor for NullExtractor {
    fn extract(&mut self, _frame: &Frame) -> Result<Option<LandmarkSet>> {
        Ok(None)
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Create a landmark extractor from configuration
pub fn create_extractor(detection: &DetectionConfig) -> Result<Box<dyn LandmarkExtractor>> {
    let map = LandmarkIndexMap::from_config(&detection.landmark_indices);
    match detection.extractor.to_lowercase().as_str() {
        "synthetic" => Ok(Box::new(SyntheticExtractor::new(map))),
        "none" | "null" => Ok(Box::new(NullExtractor)),
        name => Err(Error::Config(format!("Unknown extractor backend: {name}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectionConfig;

    fn frame(width: u32, height: u32) -> Frame {
        Frame::blank(width, height)
    }

    #[test]
    fn test_default_mesh_indices() {
        let map = LandmarkIndexMap::default();
        assert_eq!(map.index_of(LandmarkName::NoseTip), 1);
        assert_eq!(map.index_of(LandmarkName::RightTemple), 454);
    }

    #[test]
    fn test_config_override() {
        let mut overrides = HashMap::new();
        overrides.insert(LandmarkName::NoseTip, 4);
        let map = LandmarkIndexMap::from_config(&overrides);
        assert_eq!(map.index_of(LandmarkName::NoseTip), 4);
        // Unlisted names keep the defaults
        assert_eq!(map.index_of(LandmarkName::Chin), 175);
    }

    #[test]
    fn test_select_rejects_short_mesh() {
        let map = LandmarkIndexMap::default();
        let mesh = vec![LandmarkPoint::default(); 10];
        assert!(map.select(&mesh).is_err());
    }

    #[test]
    fn test_synthetic_extractor_geometry() {
        let mut extractor = SyntheticExtractor::new(LandmarkIndexMap::default());
        let set = extractor.extract(&frame(640, 480)).unwrap().unwrap();
        assert!(set.head_width > 0.0);
        assert!(set.head_height > 0.0);
        // Centered face: forehead at the horizontal midpoint
        assert_eq!(set.point(LandmarkName::ForeheadCenter).x, 320.0);
        // Front-facing: yaw and roll near zero
        assert!(set.rotation.yaw.abs() < 1e-9);
        assert!(set.rotation.roll.abs() < 1e-9);
    }

    #[test]
    fn test_synthetic_extractor_empty_frame() {
        let mut extractor = SyntheticExtractor::new(LandmarkIndexMap::default());
        assert!(extractor.extract(&frame(0, 0)).unwrap().is_none());
    }

    #[test]
    fn test_null_extractor_finds_nothing() {
        let mut extractor = NullExtractor;
        assert!(extractor.extract(&frame(640, 480)).unwrap().is_none());
    }

    #[test]
    fn test_create_extractor() {
        let mut detection = DetectionConfig::default();
        assert_eq!(create_extractor(&detection).unwrap().name(), "synthetic");
        detection.extractor = "none".to_string();
        assert_eq!(create_extractor(&detection).unwrap().name(), "none");
        detection.extractor = "mediapipe".to_string();
        assert!(create_extractor(&detection).is_err());
    }
}
