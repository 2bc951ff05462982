//! Temporal pose smoothing: one exponential-moving-average prior per session.
//!
//! Keyed by session id rather than held as a single prior so that concurrent
//! sessions never blend against each other's history.

use crate::pose_calculation::{HatPose, Vec3};
use std::collections::HashMap;

/// Identifier for one live client session
pub type SessionId = u64;

/// Per-session exponential smoother over [`HatPose`] components.
///
/// `alpha` is the weight on the previous pose: 0 disables smoothing, 1
/// freezes the pose at its first value.
#[derive(Debug)]
pub struct PoseSmoother {
    alpha: f64,
    previous: HashMap<SessionId, HatPose>,
}

impl PoseSmoother {
    pub fn new(alpha: f64) -> Self {
        assert!((0.0..=1.0).contains(&alpha), "Alpha must be in [0, 1]");
        Self {
            alpha,
            previous: HashMap::new(),
        }
    }

    /// Blend `raw` against the session's prior pose and store the result as
    /// the new prior. The first pose after creation or reset passes through
    /// unchanged.
    pub fn smooth(&mut self, session: SessionId, raw: HatPose) -> HatPose {
        let smoothed = match self.previous.get(&session) {
            Some(prev) => HatPose {
                position: self.blend_vec(prev.position, raw.position),
                rotation: self.blend_vec(prev.rotation, raw.rotation),
                scale: self.blend(prev.scale, raw.scale),
            },
            None => raw,
        };
        self.previous.insert(session, smoothed);
        smoothed
    }

    /// Clear the session's prior so the next pose passes through unchanged.
    /// Called when tracking is lost, to avoid blending a reappearing face
    /// against a stale pose.
    pub fn reset(&mut self, session: SessionId) {
        self.previous.remove(&session);
    }

    /// Drop all state for a session on teardown
    pub fn remove(&mut self, session: SessionId) {
        self.previous.remove(&session);
    }

    /// Whether the session currently has a prior pose
    pub fn has_prior(&self, session: SessionId) -> bool {
        self.previous.contains_key(&session)
    }

    /// The session's current prior pose, if any
    pub fn prior(&self, session: SessionId) -> Option<HatPose> {
        self.previous.get(&session).copied()
    }

    fn blend(&self, previous: f64, current: f64) -> f64 {
        self.alpha * previous + (1.0 - self.alpha) * current
    }

    fn blend_vec(&self, previous: Vec3, current: Vec3) -> Vec3 {
        Vec3::new(
            self.blend(previous.x, current.x),
            self.blend(previous.y, current.y),
            self.blend(previous.z, current.z),
        )
    }
}
