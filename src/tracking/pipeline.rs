//! Per-frame tracking pipeline: stabilize, classify, fire.
//!
//! One synchronous pass per incoming camera frame, run to completion
//! before the next frame — the caller owns the loop and drops frames that
//! arrive while a pass is in flight.  All mutable state lives inside the
//! [`HandTracker`] instance; nothing here blocks or waits on consumers.

use serde::Serialize;
use tracing::debug;

use super::classifier::ClassifierConfig;
use super::landmark::{HandLandmark, LandmarkFrame};
use super::stabilizer::{Stabilizer, StabilizerConfig};
use super::trigger::{FireTrigger, DEFAULT_COOLDOWN_MS};

// ── Output types ───────────────────────────────────────────

/// Where the player is aiming: the stabilized index fingertip with the
/// horizontal axis mirrored to match the mirrored camera view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AimPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A discrete shot, carrying the aim position at fire time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FireEvent {
    pub position: AimPosition,
    pub timestamp_ms: f64,
}

/// Result of one pipeline pass.  `aim` is None when no hand is tracked
/// this frame; `fire` is emitted at most once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub aim: Option<AimPosition>,
    pub fire: Option<FireEvent>,
}

// ── Config ─────────────────────────────────────────────────

/// Combined pipeline configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub stabilizer: StabilizerConfig,
    pub classifier: ClassifierConfig,
    /// Minimum interval between fire events, milliseconds.
    pub cooldown_ms: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            stabilizer: StabilizerConfig::default(),
            classifier: ClassifierConfig::default(),
            cooldown_ms: DEFAULT_COOLDOWN_MS,
        }
    }
}

// ── Stats ──────────────────────────────────────────────────

/// Rolling session counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    /// Frames carrying a hand payload that entered the pipeline.
    pub frames_processed: u64,
    /// Frames rejected as malformed.
    pub frames_rejected: u64,
    /// Transitions from tracked to no-hand.
    pub tracking_gaps: u64,
    /// Fire events emitted.
    pub shots_fired: u64,
}

// ── Tracker ────────────────────────────────────────────────

/// Central per-session tracking state: stabilizer history, classifier
/// thresholds and the fire trigger.
pub struct HandTracker {
    classifier: ClassifierConfig,
    stabilizer: Stabilizer,
    trigger: FireTrigger,
    stats: TrackerStats,
    tracking: bool,
}

impl Default for HandTracker {
    fn default() -> Self {
        Self::with_config(TrackerConfig::default())
    }
}

impl HandTracker {
    /// Create a tracker with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            classifier: config.classifier,
            stabilizer: Stabilizer::with_config(config.stabilizer),
            trigger: FireTrigger::with_cooldown(config.cooldown_ms),
            stats: TrackerStats::default(),
            tracking: false,
        }
    }

    /// Run one pipeline pass for an incoming frame.
    ///
    /// `raw` is None when the upstream estimator found no hand this frame;
    /// that clears all tracked state and yields a null aim update.  A
    /// malformed frame is rejected without disturbing state.  `now_ms` is
    /// caller-supplied so replays and tests are deterministic.
    pub fn process_frame(&mut self, raw: Option<&LandmarkFrame>, now_ms: f64) -> FrameOutput {
        let raw = match raw {
            Some(frame) => frame,
            None => {
                self.lose_tracking();
                return FrameOutput {
                    aim: None,
                    fire: None,
                };
            }
        };

        self.stats.frames_processed += 1;

        if let Err(err) = raw.validate() {
            self.stats.frames_rejected += 1;
            debug!("rejected landmark frame: {}", err);
            return FrameOutput {
                aim: self.current_aim(),
                fire: None,
            };
        }

        let stabilized = self.stabilizer.process(raw);
        let aiming = self.classifier.classify(&stabilized);
        let aim = aim_position(&stabilized);

        let fire = if self.trigger.update(aiming, now_ms) {
            self.stats.shots_fired += 1;
            Some(FireEvent {
                position: aim,
                timestamp_ms: now_ms,
            })
        } else {
            None
        };

        self.tracking = true;
        FrameOutput {
            aim: Some(aim),
            fire,
        }
    }

    /// Aim position derived from the retained stabilized frame, if any.
    pub fn current_aim(&self) -> Option<AimPosition> {
        self.stabilizer.previous().map(aim_position)
    }

    /// Whether the last processed frame classified as aiming.
    pub fn is_aiming(&self) -> bool {
        self.trigger.is_aiming()
    }

    /// Whether a hand is currently tracked.
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Session counters.
    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    /// Clear all tracked state, keeping counters (session restart).
    pub fn reset(&mut self) {
        self.lose_tracking();
    }

    fn lose_tracking(&mut self) {
        if self.tracking {
            self.stats.tracking_gaps += 1;
            debug!("hand lost, clearing tracked state");
        }
        self.tracking = false;
        self.stabilizer.reset();
        self.trigger.reset();
    }
}

fn aim_position(frame: &LandmarkFrame) -> AimPosition {
    let tip = frame.point(HandLandmark::IndexTip);
    AimPosition {
        x: 1.0 - tip.x,
        y: tip.y,
        z: tip.z,
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Frame showing a clean finger-gun pose: index pointing up, middle
/// curled below it.
#[cfg(test)]
fn finger_gun_frame() -> LandmarkFrame {
    use super::landmark::{set_point, uniform_frame};

    let mut frame = uniform_frame(0.5, 0.5, 0.0);
    set_point(&mut frame, HandLandmark::IndexMcp, 0.50, 0.55, 0.0);
    set_point(&mut frame, HandLandmark::IndexPip, 0.50, 0.45, 0.0);
    set_point(&mut frame, HandLandmark::IndexTip, 0.40, 0.30, 0.0);
    set_point(&mut frame, HandLandmark::MiddlePip, 0.55, 0.50, 0.0);
    set_point(&mut frame, HandLandmark::MiddleTip, 0.55, 0.55, 0.0);
    frame
}

/// Frame with every finger loosely curled, clearly not aiming.
#[cfg(test)]
fn idle_frame() -> LandmarkFrame {
    use super::landmark::{set_point, uniform_frame};

    let mut frame = uniform_frame(0.5, 0.5, 0.0);
    set_point(&mut frame, HandLandmark::IndexMcp, 0.45, 0.45, 0.0);
    set_point(&mut frame, HandLandmark::IndexPip, 0.55, 0.50, 0.0);
    set_point(&mut frame, HandLandmark::IndexTip, 0.50, 0.50, 0.0);
    set_point(&mut frame, HandLandmark::MiddlePip, 0.55, 0.50, 0.0);
    set_point(&mut frame, HandLandmark::MiddleTip, 0.50, 0.50, 0.0);
    frame
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::landmark::{set_point, uniform_frame};

    #[test]
    fn test_aim_is_mirrored_index_tip() {
        let mut tracker = HandTracker::new();
        let frame = finger_gun_frame();

        // First frame passes through the stabilizer unchanged, so the aim
        // must be exactly the mirrored raw tip.
        let out = tracker.process_frame(Some(&frame), 0.0);
        let aim = out.aim.expect("hand present, aim expected");
        assert!((aim.x - 0.6).abs() < 1e-6, "Expected mirrored x 0.6, got {}", aim.x);
        assert!((aim.y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_fire_on_pose_acquired() {
        let mut tracker = HandTracker::new();

        let out = tracker.process_frame(Some(&idle_frame()), 0.0);
        assert!(out.fire.is_none());
        assert!(!tracker.is_aiming());

        let out = tracker.process_frame(Some(&finger_gun_frame()), 16.0);
        let fire = out.fire.expect("idle-to-aiming edge must fire");
        assert_eq!(fire.timestamp_ms, 16.0);
        assert_eq!(Some(fire.position), out.aim);
        assert!(tracker.is_aiming());
    }

    #[test]
    fn test_held_pose_fires_once() {
        let mut tracker = HandTracker::new();
        let frame = finger_gun_frame();

        let mut fires = 0;
        for i in 0..60 {
            if tracker.process_frame(Some(&frame), i as f64 * 16.0).fire.is_some() {
                fires += 1;
            }
        }
        assert_eq!(fires, 1, "A held pose must fire exactly once");
        assert_eq!(tracker.stats().shots_fired, 1);
    }

    #[test]
    fn test_no_hand_resets_state() {
        let mut tracker = HandTracker::new();
        tracker.process_frame(Some(&finger_gun_frame()), 0.0);
        assert!(tracker.is_tracking());

        let out = tracker.process_frame(None, 16.0);
        assert_eq!(out.aim, None);
        assert!(!tracker.is_tracking());
        assert!(!tracker.is_aiming());
        assert_eq!(tracker.stats().tracking_gaps, 1);

        // Filter re-seeds: next frame's aim equals the mirrored raw tip.
        let mut frame = uniform_frame(0.5, 0.5, 0.0);
        set_point(&mut frame, HandLandmark::IndexTip, 0.10, 0.80, 0.05);
        let out = tracker.process_frame(Some(&frame), 32.0);
        let aim = out.aim.unwrap();
        assert!((aim.x - 0.9).abs() < 1e-6);
        assert!((aim.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_frame_rejected_state_retained() {
        let mut tracker = HandTracker::new();
        let out = tracker.process_frame(Some(&finger_gun_frame()), 0.0);
        let aim_before = out.aim;

        let mut bad = finger_gun_frame();
        set_point(&mut bad, HandLandmark::Wrist, 7.0, 0.5, 0.0);
        let out = tracker.process_frame(Some(&bad), 16.0);

        assert!(out.fire.is_none());
        assert_eq!(out.aim, aim_before, "Rejected frame must not move the aim");
        assert!(tracker.is_tracking());
        assert_eq!(tracker.stats().frames_rejected, 1);

        // A valid follow-up frame smooths against the retained state, not
        // against the rejected one.
        let out = tracker.process_frame(Some(&finger_gun_frame()), 32.0);
        assert_eq!(out.aim, aim_before);
    }

    #[test]
    fn test_invalid_frame_before_any_tracking() {
        let mut tracker = HandTracker::new();
        let mut bad = finger_gun_frame();
        set_point(&mut bad, HandLandmark::Wrist, f32::INFINITY, 0.5, 0.0);

        let out = tracker.process_frame(Some(&bad), 0.0);
        assert_eq!(out.aim, None);
        assert!(out.fire.is_none());
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_gap_rearms_trigger_with_cooldown() {
        let mut tracker = HandTracker::new();
        let frame = finger_gun_frame();

        assert!(tracker.process_frame(Some(&frame), 0.0).fire.is_some());

        // Hand drops out and comes back aiming within the cooldown: the
        // edge re-arms but the shot is suppressed.
        tracker.process_frame(None, 100.0);
        assert!(tracker.process_frame(Some(&frame), 200.0).fire.is_none());

        // Same pattern past the cooldown fires.
        tracker.process_frame(None, 600.0);
        assert!(tracker.process_frame(Some(&frame), 700.0).fire.is_some());
    }

    #[test]
    fn test_stats_accumulate() {
        let mut tracker = HandTracker::new();
        tracker.process_frame(Some(&idle_frame()), 0.0);
        tracker.process_frame(Some(&finger_gun_frame()), 16.0);
        tracker.process_frame(None, 32.0);
        tracker.process_frame(None, 48.0);

        let stats = tracker.stats();
        assert_eq!(stats.frames_processed, 2);
        assert_eq!(stats.frames_rejected, 0);
        assert_eq!(stats.tracking_gaps, 1);
        assert_eq!(stats.shots_fired, 1);
    }

    #[test]
    fn test_reset_keeps_counters() {
        let mut tracker = HandTracker::new();
        tracker.process_frame(Some(&finger_gun_frame()), 0.0);
        tracker.reset();

        assert!(!tracker.is_tracking());
        assert_eq!(tracker.current_aim(), None);
        assert_eq!(tracker.stats().frames_processed, 1);
        assert_eq!(tracker.stats().shots_fired, 1);
    }
}
