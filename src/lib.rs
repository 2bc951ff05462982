//! Virtual hat try-on backend.
//!
//! Streams live video frames from a client over a websocket, finds a face in
//! each frame, and returns a stable 3D placement (position, rotation, scale)
//! for a virtual hat overlay. The pipeline per frame:
//!
//! 1. Decode the inbound frame bytes and downscale for detection
//! 2. Landmark extraction (black-box backend behind a trait)
//! 3. Head rotation estimation from landmark geometry
//! 4. Raw hat pose calculation (position, damped rotation, scale)
//! 5. Per-session exponential smoothing against the previous pose
//!
//! The server end is deliberately thin: one task per session, one reply per
//! frame, and per-frame errors never terminate a session.
//!
//! # Examples
//!
//! Running the pipeline stages directly, without a server:
//!
//! ```
//! use hat_tryon::config::Config;
//! use hat_tryon::face_detection::create_extractor;
//! use hat_tryon::frame::Frame;
//! use hat_tryon::pose_calculation::PoseCalculator;
//! use hat_tryon::smoothing::PoseSmoother;
//!
//! # fn main() -> hat_tryon::Result<()> {
//! let config = Config::default();
//! let mut extractor = create_extractor(&config.detection)?;
//! let calculator = PoseCalculator::new(&config.hat);
//! let mut smoother = PoseSmoother::new(config.smoothing.factor);
//!
//! let frame = Frame::blank(640, 480);
//! if let Some(landmarks) = extractor.extract(&frame)? {
//!     let raw = calculator.calculate_pose(&landmarks, frame.width, frame.height);
//!     let hat = smoother.smooth(1, raw);
//!     println!("hat at ({:.2}, {:.2}), scale {:.2}", hat.position.x, hat.position.y, hat.scale);
//! }
//! # Ok(())
//! # }
//! ```

/// Landmark data model and derived geometry
pub mod landmarks;

/// Landmark extraction seam and backends
pub mod face_detection;

/// Inbound frame decoding
pub mod frame;

/// Head rotation estimation from landmarks
pub mod rotation_estimation;

/// Raw hat pose calculation
pub mod pose_calculation;

/// Per-session temporal pose smoothing
pub mod smoothing;

/// Per-frame processing pipeline
pub mod pipeline;

/// Wire protocol types
pub mod protocol;

/// Per-connection session handling
pub mod session;

/// Accept loop and health probes
pub mod server;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Error types and result handling
pub mod error;

pub use error::{Error, Result};
