//! Per-session frame pipeline: decode, extract, estimate, smooth, reply.
//!
//! Frames within a session must be processed strictly in arrival order (the
//! smoother is a first-order recurrence), so the owning session runs this
//! pipeline one frame at a time.

use crate::config::Config;
use crate::face_detection::LandmarkExtractor;
use crate::frame::Frame;
use crate::pose_calculation::PoseCalculator;
use crate::protocol::{FrameReply, FrameSize};
use crate::smoothing::{PoseSmoother, SessionId};
use crate::{Error, Result};
use log::{debug, warn};
use std::sync::{Arc, Mutex};

/// Shared smoothing state, keyed by session id. Sessions only ever touch
/// their own key; the lock is held for one blend at a time.
pub type SharedSmoother = Arc<Mutex<PoseSmoother>>;

/// One session's processing pipeline. Owns the extractor instance for the
/// session and tracks consecutive no-face frames for the reset policy.
pub struct FramePipeline {
    session: SessionId,
    extractor: Box<dyn LandmarkExtractor>,
    calculator: PoseCalculator,
    smoother: SharedSmoother,
    detection_width: u32,
    miss_reset_threshold: u32,
    consecutive_misses: u32,
}

impl FramePipeline {
    pub fn new(
        session: SessionId,
        extractor: Box<dyn LandmarkExtractor>,
        config: &Config,
        smoother: SharedSmoother,
    ) -> Self {
        Self {
            session,
            extractor,
            calculator: PoseCalculator::new(&config.hat),
            smoother,
            detection_width: config.detection.detection_width,
            miss_reset_threshold: config.smoothing.miss_reset_threshold,
            consecutive_misses: 0,
        }
    }

    /// Process one inbound frame. Never fails: every failure mode short of a
    /// transport error collapses into an error reply here, so the session
    /// always has exactly one reply to send.
    pub fn process_frame(&mut self, bytes: &[u8]) -> FrameReply {
        match self.try_process(bytes) {
            Ok(reply) => reply,
            Err(err) => {
                warn!("session {}: frame processing failed: {}", self.session, err);
                FrameReply::error(err.to_string())
            }
        }
    }

    fn try_process(&mut self, bytes: &[u8]) -> Result<FrameReply> {
        let frame = Frame::decode(bytes, self.detection_width)?;

        let Some(landmarks) = self.extractor.extract(&frame)? else {
            return Ok(self.handle_miss());
        };
        self.consecutive_misses = 0;

        let raw = self.calculator.calculate_pose(&landmarks, frame.width, frame.height);
        let smoothed = self.lock_smoother()?.smooth(self.session, raw);

        Ok(FrameReply::detected(
            smoothed,
            FrameSize {
                width: frame.width,
                height: frame.height,
            },
        ))
    }

    /// No face in the frame: the prior pose is left in place so tracking can
    /// resume instantly, but a sustained absence resets it so a reappearing
    /// face does not blend against a stale pose.
    fn handle_miss(&mut self) -> FrameReply {
        self.consecutive_misses = self.consecutive_misses.saturating_add(1);
        if self.consecutive_misses == self.miss_reset_threshold {
            debug!(
                "session {}: {} consecutive misses, resetting smoothing state",
                self.session, self.consecutive_misses
            );
            if let Ok(mut smoother) = self.lock_smoother() {
                smoother.reset(self.session);
            }
        }
        FrameReply::no_face()
    }

    /// Release the session's smoothing state on teardown
    pub fn teardown(&mut self) {
        if let Ok(mut smoother) = self.lock_smoother() {
            smoother.remove(self.session);
        }
    }

    fn lock_smoother(&self) -> Result<std::sync::MutexGuard<'_, PoseSmoother>> {
        self.smoother
            .lock()
            .map_err(|_| Error::Internal("smoothing state lock poisoned".to_string()))
    }
}
