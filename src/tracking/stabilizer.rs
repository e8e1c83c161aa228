//! Landmark stabilization — exponential smoothing with a velocity-adaptive
//! deadzone over the full 21-point frame.
//!
//! Raw per-frame landmark estimates jitter at sub-pixel scale even when the
//! hand is held still, while a fixed smoothing factor either lags fast
//! motion or fails to suppress the jitter at rest.  One motion regime,
//! selected per frame from the index-fingertip speed, picks both the
//! smoothing weight and the deadzone applied uniformly to all 21 landmarks.

use super::landmark::{HandLandmark, Landmark, LandmarkFrame};

// ── Config ─────────────────────────────────────────────────

/// Adaptive smoothing thresholds.  The values are hand-tuned for game feel;
/// the three bands are shared by every landmark within a frame.
#[derive(Debug, Clone)]
pub struct StabilizerConfig {
    /// Index-tip speed (normalized units/frame) above which the hand
    /// counts as moving fast.
    pub fast_velocity: f32,
    /// Index-tip speed above which the hand counts as moving moderately.
    pub medium_velocity: f32,
    /// Weight on the previous value while moving fast.
    pub fast_smoothing: f32,
    /// Weight on the previous value while moving moderately.
    pub medium_smoothing: f32,
    /// Weight on the previous value while near-still.
    pub slow_smoothing: f32,
    /// Per-axis deadzone while moving fast.
    pub fast_deadzone: f32,
    /// Per-axis deadzone while moving moderately.
    pub medium_deadzone: f32,
    /// Per-axis deadzone while near-still.
    pub slow_deadzone: f32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            fast_velocity: 0.02,
            medium_velocity: 0.01,
            fast_smoothing: 0.5,
            medium_smoothing: 0.7,
            slow_smoothing: 0.9,
            fast_deadzone: 0.001,
            medium_deadzone: 0.003,
            slow_deadzone: 0.005,
        }
    }
}

impl StabilizerConfig {
    /// Select the (smoothing weight, deadzone) pair for an index-tip speed.
    pub fn regime(&self, velocity: f32) -> (f32, f32) {
        if velocity > self.fast_velocity {
            (self.fast_smoothing, self.fast_deadzone)
        } else if velocity > self.medium_velocity {
            (self.medium_smoothing, self.medium_deadzone)
        } else {
            (self.slow_smoothing, self.slow_deadzone)
        }
    }
}

// ── Stabilizer ─────────────────────────────────────────────

/// Per-session smoothing state: the previous stabilized frame, or None
/// when no hand is currently tracked.
#[derive(Debug, Default)]
pub struct Stabilizer {
    /// Configuration.
    pub config: StabilizerConfig,
    /// Previous stabilized frame.
    previous: Option<LandmarkFrame>,
}

impl Stabilizer {
    /// Create a stabilizer with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StabilizerConfig) -> Self {
        Self {
            config,
            previous: None,
        }
    }

    /// The previous stabilized frame, if a hand is tracked.
    pub fn previous(&self) -> Option<&LandmarkFrame> {
        self.previous.as_ref()
    }

    /// Stabilize one raw frame and advance the filter state.
    pub fn process(&mut self, raw: &LandmarkFrame) -> LandmarkFrame {
        let stabilized = stabilize(&self.config, self.previous.as_ref(), raw);
        self.previous = Some(stabilized.clone());
        stabilized
    }

    /// Drop the filter state (hand left the frame).  The next raw frame
    /// passes through unsmoothed, re-seeding the filter.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

/// Stabilize a raw frame against the previous stabilized frame.
///
/// With no previous frame the raw frame passes through exactly — smoothing
/// toward a stale or default position would drag the cursor in from the
/// wrong place after every tracking gap.
pub fn stabilize(
    config: &StabilizerConfig,
    previous: Option<&LandmarkFrame>,
    raw: &LandmarkFrame,
) -> LandmarkFrame {
    let previous = match previous {
        Some(p) => p,
        None => return raw.clone(),
    };

    // The whole hand shares one motion regime per frame, judged from how
    // fast the index fingertip moved in the image plane (z excluded).
    let tip = raw.point(HandLandmark::IndexTip);
    let prev_tip = previous.point(HandLandmark::IndexTip);
    let dx = tip.x - prev_tip.x;
    let dy = tip.y - prev_tip.y;
    let velocity = (dx * dx + dy * dy).sqrt();

    let (alpha, deadzone) = config.regime(velocity);

    let mut points = *raw.points();
    for (point, prev) in points.iter_mut().zip(previous.points()) {
        *point = Landmark::new(
            smooth_axis(alpha, deadzone, prev.x, point.x),
            smooth_axis(alpha, deadzone, prev.y, point.y),
            smooth_axis(alpha, deadzone, prev.z, point.z),
        );
    }
    LandmarkFrame::new(points)
}

/// One axis: gate sub-deadzone jitter to the previous value, then blend.
fn smooth_axis(alpha: f32, deadzone: f32, prev: f32, raw: f32) -> f32 {
    if (raw - prev).abs() <= deadzone {
        // Blending prev with itself is an identity; skip the arithmetic so
        // a held value stays bit-stable across frames.
        return prev;
    }
    alpha * prev + (1.0 - alpha) * raw
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::landmark::{set_point, uniform_frame};

    #[test]
    fn test_first_frame_passes_through() {
        let mut stab = Stabilizer::new();
        let mut raw = uniform_frame(0.4, 0.6, 0.05);
        set_point(&mut raw, HandLandmark::IndexTip, 0.3, 0.2, 0.0);

        let out = stab.process(&raw);
        assert_eq!(out, raw, "First frame after a gap must seed the filter unchanged");
    }

    #[test]
    fn test_reset_reseeds_filter() {
        let mut stab = Stabilizer::new();
        stab.process(&uniform_frame(0.2, 0.2, 0.0));
        assert!(stab.previous().is_some());

        stab.reset();
        assert!(stab.previous().is_none());

        let raw = uniform_frame(0.8, 0.8, 0.1);
        let out = stab.process(&raw);
        assert_eq!(out, raw);
    }

    #[test]
    fn test_regime_selection() {
        let config = StabilizerConfig::default();
        assert_eq!(config.regime(0.05), (0.5, 0.001));
        assert_eq!(config.regime(0.015), (0.7, 0.003));
        assert_eq!(config.regime(0.005), (0.9, 0.005));
        // Band edges: > is strict on both thresholds.
        assert_eq!(config.regime(0.02), (0.7, 0.003));
        assert_eq!(config.regime(0.01), (0.9, 0.005));
        assert_eq!(config.regime(0.0), (0.9, 0.005));
    }

    #[test]
    fn test_output_is_convex_combination() {
        let config = StabilizerConfig::default();
        let previous = uniform_frame(0.30, 0.40, 0.00);
        let raw = uniform_frame(0.50, 0.20, 0.10);

        let out = stabilize(&config, Some(&previous), &raw);
        for (o, (p, r)) in out
            .points()
            .iter()
            .zip(previous.points().iter().zip(raw.points()))
        {
            for (ov, pv, rv) in [(o.x, p.x, r.x), (o.y, p.y, r.y), (o.z, p.z, r.z)] {
                let (lo, hi) = if pv <= rv { (pv, rv) } else { (rv, pv) };
                assert!(
                    (lo..=hi).contains(&ov),
                    "Axis value {} outside [{}, {}]",
                    ov,
                    lo,
                    hi,
                );
            }
        }
    }

    #[test]
    fn test_deadzone_holds_previous() {
        let config = StabilizerConfig::default();
        // Tip barely moves: slow regime, deadzone 0.005, and every axis
        // delta is below it — output must equal previous exactly.
        let previous = uniform_frame(0.500, 0.500, 0.100);
        let raw = uniform_frame(0.503, 0.498, 0.102);

        let out = stabilize(&config, Some(&previous), &raw);
        assert_eq!(out, previous, "Sub-deadzone jitter must be rejected");
    }

    #[test]
    fn test_fast_motion_tracks_closer_to_raw() {
        let config = StabilizerConfig::default();
        let previous = uniform_frame(0.20, 0.20, 0.00);
        // 0.1 tip displacement -> fast regime, alpha 0.5.
        let raw = uniform_frame(0.30, 0.20, 0.00);

        let out = stabilize(&config, Some(&previous), &raw);
        let x = out.point(HandLandmark::IndexTip).x;
        assert!((x - 0.25).abs() < 1e-6, "Expected midpoint 0.25, got {}", x);
    }

    #[test]
    fn test_repeated_frame_converges_toward_raw() {
        let mut stab = Stabilizer::new();
        let seed = uniform_frame(0.50, 0.50, 0.00);
        let target = uniform_frame(0.55, 0.50, 0.00);

        stab.process(&seed);

        let mut distances = Vec::new();
        for _ in 0..30 {
            let out = stab.process(&target);
            let d = (out.point(HandLandmark::IndexTip).x - 0.55).abs();
            distances.push(d);
        }

        for pair in distances.windows(2) {
            assert!(
                pair[1] <= pair[0] + 1e-7,
                "Distance to raw must not increase: {} -> {}",
                pair[0],
                pair[1],
            );
        }
        assert!(distances[5] < distances[0], "Filter is not converging");
        assert!(
            *distances.last().unwrap() <= stab.config.slow_deadzone,
            "Expected convergence within the slow deadzone, got {}",
            distances.last().unwrap(),
        );
    }

    #[test]
    fn test_velocity_ignores_z() {
        let config = StabilizerConfig::default();
        let previous = uniform_frame(0.50, 0.50, 0.00);
        // Large z jump on the tip, x/y unchanged: still the slow regime,
        // so a sub-deadzone x wiggle elsewhere is rejected.
        let mut raw = uniform_frame(0.50, 0.50, 0.00);
        set_point(&mut raw, HandLandmark::IndexTip, 0.50, 0.50, 0.40);
        set_point(&mut raw, HandLandmark::Wrist, 0.503, 0.50, 0.00);

        let out = stabilize(&config, Some(&previous), &raw);
        assert_eq!(out.point(HandLandmark::Wrist).x, 0.50);
    }
}
