//! Finger-gun pose classification from a stabilized landmark frame.
//!
//! A single depth-less camera gives no one geometric signal that survives
//! every hand rotation, so three cheap, partially-redundant index-extension
//! checks are OR-combined: a missed gesture is far more disruptive to
//! gameplay than an occasional false positive.  An open-palm guard then
//! vetoes the result when the whole hand is extended.

use super::landmark::{HandLandmark, Landmark, LandmarkFrame};

// ── Config ─────────────────────────────────────────────────

/// Classification thresholds.  Hand-tuned; y comparisons follow image
/// convention (y grows downward, so "higher" means smaller y).
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Minimum angle (radians) at the index PIP joint for the finger to
    /// count as straight.
    pub index_angle_rad: f32,
    /// Minimum height of the index tip above its own PIP joint.
    pub extension_threshold: f32,
    /// Minimum height of the index tip above the middle fingertip.
    pub relative_height_threshold: f32,
    /// Per-finger extension margin for the open-palm veto.
    pub open_palm_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            index_angle_rad: 2.4,
            extension_threshold: 0.02,
            relative_height_threshold: 0.02,
            open_palm_threshold: 0.05,
        }
    }
}

impl ClassifierConfig {
    /// Whether the frame shows the finger-gun ("aiming") pose.
    pub fn classify(&self, frame: &LandmarkFrame) -> bool {
        let index_tip = frame.point(HandLandmark::IndexTip);
        let index_pip = frame.point(HandLandmark::IndexPip);
        let index_mcp = frame.point(HandLandmark::IndexMcp);
        let middle_tip = frame.point(HandLandmark::MiddleTip);
        let middle_pip = frame.point(HandLandmark::MiddlePip);
        let ring_tip = frame.point(HandLandmark::RingTip);
        let pinky_tip = frame.point(HandLandmark::PinkyTip);

        // Signal 1: the index finger is nearly straight at the PIP joint.
        let index_angle = angle_at(index_tip, index_pip, index_mcp);
        let extended_by_angle = index_angle > self.index_angle_rad;

        // Signal 2: the tip sits meaningfully above its own PIP joint.
        let extended_by_height = (index_pip.y - index_tip.y) > self.extension_threshold;

        // Signal 3: the index tip is clearly higher than the middle tip,
        // i.e. the middle finger is curled while the index points.
        let higher_than_middle =
            index_tip.y < middle_tip.y - self.relative_height_threshold;

        let index_extended = extended_by_angle || extended_by_height || higher_than_middle;

        // Thumb orientation is not evaluated.
        let thumb_okay = true;

        // Veto: an open hand with middle and ring/pinky all extended must
        // never read as aiming, whatever the index signals say.
        let open_palm = middle_tip.y < middle_pip.y - self.open_palm_threshold
            && ring_tip.y < pinky_tip.y - self.open_palm_threshold;

        index_extended && thumb_okay && !open_palm
    }
}

/// Angle at vertex `b` between rays `b -> a` and `b -> c`, in the image
/// plane (z is too noisy to help here).  Zero-magnitude rays yield 0; the
/// cosine is clamped against floating-point overshoot before acos.
fn angle_at(a: Landmark, b: Landmark, c: Landmark) -> f32 {
    let (abx, aby) = (a.x - b.x, a.y - b.y);
    let (cbx, cby) = (c.x - b.x, c.y - b.y);

    let dot = abx * cbx + aby * cby;
    let mag = (abx * abx + aby * aby).sqrt() * (cbx * cbx + cby * cby).sqrt();
    if mag == 0.0 {
        return 0.0;
    }
    (dot / mag).clamp(-1.0, 1.0).acos()
}

// ── Test helpers ───────────────────────────────────────────

/// Frame with a neutral, loosely-curled hand: no index signal fires and
/// the open-palm veto stays off.
#[cfg(test)]
fn neutral_frame() -> LandmarkFrame {
    use crate::tracking::landmark::{set_point, uniform_frame};

    let mut frame = uniform_frame(0.5, 0.5, 0.0);
    // Index curled back on itself: small PIP angle, tip level with PIP.
    set_point(&mut frame, HandLandmark::IndexMcp, 0.45, 0.45, 0.0);
    set_point(&mut frame, HandLandmark::IndexPip, 0.55, 0.50, 0.0);
    set_point(&mut frame, HandLandmark::IndexTip, 0.50, 0.50, 0.0);
    // Middle tip level with index tip; middle PIP level with its tip.
    set_point(&mut frame, HandLandmark::MiddlePip, 0.55, 0.50, 0.0);
    set_point(&mut frame, HandLandmark::MiddleTip, 0.50, 0.50, 0.0);
    set_point(&mut frame, HandLandmark::RingTip, 0.50, 0.50, 0.0);
    set_point(&mut frame, HandLandmark::PinkyTip, 0.50, 0.50, 0.0);
    frame
}

// ── Tests ──────────────────────────────────────────────────
