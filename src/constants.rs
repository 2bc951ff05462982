//! Constants used throughout the application

/// Number of named landmarks the pipeline consumes
pub const NUM_KEY_LANDMARKS: usize = 8;

/// Fraction of head height separating the forehead anchor from the crown
pub const CROWN_OFFSET_RATIO: f64 = 0.4;

/// Expected nose position as a fraction of the forehead-to-chin span
pub const NOSE_POSITION_RATIO: f64 = 0.3;

/// Remaining span below the expected nose position (1.0 - `NOSE_POSITION_RATIO`)
pub const NOSE_SPAN_REMAINDER: f64 = 0.7;

/// Per-axis rotation damping factors, tuned for visual stability rather than
/// derived from geometry. Pitch is followed a little less, yaw closely, roll
/// least of all.
pub const PITCH_DAMPING: f64 = 0.8;
pub const YAW_DAMPING: f64 = 0.9;
pub const ROLL_DAMPING: f64 = 0.7;

/// Calibration head width in pixels for a scale of 1.0 at typical webcam
/// resolutions
pub const REFERENCE_HEAD_WIDTH: f64 = 120.0;

/// Hat scale clamp range
pub const MIN_HAT_SCALE: f64 = 0.5;
pub const MAX_HAT_SCALE: f64 = 4.0;

/// Default smoothing factor (0 = no smoothing, 1 = frozen)
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;

/// Consecutive no-face frames before the session resets its smoothing prior
pub const DEFAULT_MISS_RESET_THRESHOLD: u32 = 10;

/// Default maximum inbound websocket message size (5 MiB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 5 * 1024 * 1024;
