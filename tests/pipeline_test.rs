//! End-to-end tests for the frame processing pipeline

use hat_tryon::config::Config;
use hat_tryon::constants::NUM_KEY_LANDMARKS;
use hat_tryon::face_detection::{LandmarkExtractor, NullExtractor};
use hat_tryon::frame::Frame;
use hat_tryon::landmarks::{LandmarkPoint, LandmarkSet};
use hat_tryon::pipeline::FramePipeline;
use hat_tryon::smoothing::PoseSmoother;
use hat_tryon::Result;
use image::RgbImage;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

/// Extractor that always reports the same landmark set, so pipeline outputs
/// can be checked against hand-computed numbers
struct FixedExtractor {
    set: LandmarkSet,
}

impl FixedExtractor {
    /// Scenario geometry: temples at x=100/200, forehead (150,50), chin
    /// (150,250), nose at the expected ratio
    fn scenario() -> Self {
        let mut points = [LandmarkPoint::default(); NUM_KEY_LANDMARKS];
        points[0] = LandmarkPoint::new(150.0, 50.0, 0.0); // forehead center
        points[1] = LandmarkPoint::new(130.0, 60.0, 0.0); // forehead left
        points[2] = LandmarkPoint::new(170.0, 60.0, 0.0); // forehead right
        points[3] = LandmarkPoint::new(150.0, 110.0, 0.0); // nose tip
        points[4] = LandmarkPoint::new(150.0, 250.0, 0.0); // chin
        points[5] = LandmarkPoint::new(100.0, 120.0, 0.0); // left temple
        points[6] = LandmarkPoint::new(200.0, 120.0, 0.0); // right temple
        points[7] = LandmarkPoint::new(150.0, 20.0, 0.0); // top head
        Self {
            set: LandmarkSet::new(points),
        }
    }
}

impl LandmarkExtractor for FixedExtractor {
    fn extract(&mut self, _frame: &Frame) -> Result<Option<LandmarkSet>> {
        Ok(Some(self.set.clone()))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

fn png_frame(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::new(width, height);
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn full_size_config() -> Config {
    // Keep the 640px test frames at full size through detection
    let mut config = Config::default();
    config.detection.detection_width = 640;
    config
}

fn smoother(alpha: f64) -> Arc<Mutex<PoseSmoother>> {
    Arc::new(Mutex::new(PoseSmoother::new(alpha)))
}

/// Scenario A: known landmark geometry on a 640x480 frame
#[test]
fn test_scenario_positioning() {
    let mut pipeline = FramePipeline::new(
        1,
        Box::new(FixedExtractor::scenario()),
        &full_size_config(),
        smoother(0.3),
    );

    let reply = pipeline.process_frame(&png_frame(640, 480));
    assert!(reply.face_detected);
    let hat = reply.hat.unwrap();

    // head_width = 100, head_height = 200
    // x = 150/640
    assert!((hat.position.x - 150.0 / 640.0).abs() < 1e-9);
    // crown offset = 200 * 0.4 = 80; (50 - 80)/480 < 0, clamped to 0
    assert_eq!(hat.position.y, 0.0);
    // scale = (100/120) * 1.3
    assert!((hat.scale - (100.0 / 120.0) * 1.3).abs() < 1e-9);

    let size = reply.frame_size.unwrap();
    assert_eq!((size.width, size.height), (640, 480));
}

/// Scenario B: no face found leaves the session's smoothing state untouched
#[test]
fn test_no_face_reply_and_state() {
    let shared = smoother(0.3);

    // Seed a prior for the session
    let mut seeded = FramePipeline::new(
        2,
        Box::new(FixedExtractor::scenario()),
        &full_size_config(),
        Arc::clone(&shared),
    );
    seeded.process_frame(&png_frame(640, 480));
    let prior = shared.lock().unwrap().prior(2).unwrap();

    // Same session, extractor finds nothing
    let mut missing = FramePipeline::new(2, Box::new(NullExtractor), &full_size_config(), Arc::clone(&shared));
    let reply = missing.process_frame(&png_frame(640, 480));

    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(json, serde_json::json!({"face_detected": false}));
    assert_eq!(shared.lock().unwrap().prior(2), Some(prior));
}

/// Scenario C: constant raw pose is a fixed point of the smoother
#[test]
fn test_constant_pose_is_stable() {
    let mut pipeline = FramePipeline::new(
        3,
        Box::new(FixedExtractor::scenario()),
        &full_size_config(),
        smoother(0.3),
    );

    let frame = png_frame(640, 480);
    let first = pipeline.process_frame(&frame).hat.unwrap();
    let second = pipeline.process_frame(&frame).hat.unwrap();

    assert!((first.scale - second.scale).abs() < 1e-12);
    assert!((first.position.x - second.position.x).abs() < 1e-12);
    assert!((first.rotation.z - second.rotation.z).abs() < 1e-12);
}

/// Scenario D: malformed frame bytes produce an error reply, and the session
/// keeps accepting frames
#[test]
fn test_malformed_frame_recovery() {
    let mut pipeline = FramePipeline::new(
        4,
        Box::new(FixedExtractor::scenario()),
        &full_size_config(),
        smoother(0.3),
    );

    let reply = pipeline.process_frame(b"\xff\xfe not an image");
    assert!(!reply.face_detected);
    assert!(!reply.error.unwrap().is_empty());

    let next = pipeline.process_frame(&png_frame(640, 480));
    assert!(next.face_detected);
}

/// Smoothed outputs stay within the documented pose bounds
#[test]
fn test_pose_bounds_hold_through_pipeline() {
    let mut pipeline = FramePipeline::new(
        5,
        Box::new(FixedExtractor::scenario()),
        &full_size_config(),
        smoother(0.7),
    );

    let frame = png_frame(640, 480);
    for _ in 0..20 {
        let hat = pipeline.process_frame(&frame).hat.unwrap();
        assert!((0.0..=1.0).contains(&hat.position.x));
        assert!((0.0..=1.0).contains(&hat.position.y));
        assert!((0.5..=4.0).contains(&hat.scale));
        assert!(hat.rotation.x.is_finite());
        assert!(hat.rotation.y.is_finite());
        assert!(hat.rotation.z.is_finite());
    }
}
