//! Hand landmark data structures and frame validation.
//!
//! Models the 21 landmarks per hand produced by camera-based hand pose
//! estimators: the wrist plus four joints per finger, in a fixed anatomical
//! order.  Landmark order is a contract — all downstream geometry indexes
//! into it by position.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Landmark definitions ───────────────────────────────────

/// The 21 hand landmarks, in estimator output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// String representation for logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::PinkyMcp => "pinky-mcp",
            Self::PinkyPip => "pinky-pip",
            Self::PinkyDip => "pinky-dip",
            Self::PinkyTip => "pinky-tip",
        }
    }
}

/// All landmark names in order, matching HandLandmark enum indices.
const LANDMARK_NAMES: [&str; LANDMARK_COUNT] = [
    "wrist",
    "thumb-cmc", "thumb-mcp", "thumb-ip", "thumb-tip",
    "index-mcp", "index-pip", "index-dip", "index-tip",
    "middle-mcp", "middle-pip", "middle-dip", "middle-tip",
    "ring-mcp", "ring-pip", "ring-dip", "ring-tip",
    "pinky-mcp", "pinky-pip", "pinky-dip", "pinky-tip",
];

// ── Landmark point ─────────────────────────────────────────

/// One tracked point in normalized camera space.  `x` and `y` are roughly
/// in [0, 1] (y grows downward, image convention); `z` is relative depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

// ── Frame errors ───────────────────────────────────────────

/// Accepted coordinate range per axis.  Nominal space is [0, 1] but
/// estimators report slightly outside it when the hand leaves the image,
/// and z is centered near zero.
pub const COORD_MIN: f32 = -0.5;
pub const COORD_MAX: f32 = 1.5;

/// Malformed landmark input.  Frames failing validation are rejected by the
/// pipeline without disturbing tracked state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
    WrongCount(usize),
    #[error("landmark {0} has a non-finite coordinate")]
    NonFinite(&'static str),
    #[error("landmark {name} out of range: ({x}, {y}, {z})")]
    OutOfRange {
        name: &'static str,
        x: f32,
        y: f32,
        z: f32,
    },
}

// ── Landmark frame ─────────────────────────────────────────

/// The complete set of 21 landmarks captured at one sampling instant.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Build a frame from a full landmark array.  The fixed array length
    /// guarantees cardinality; coordinate sanity is checked by [`validate`].
    ///
    /// [`validate`]: LandmarkFrame::validate
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build a frame from a variable-length point list, rejecting wrong
    /// cardinality.
    pub fn from_points(points: Vec<Landmark>) -> Result<Self, FrameError> {
        let len = points.len();
        let points: [Landmark; LANDMARK_COUNT] =
            points.try_into().map_err(|_| FrameError::WrongCount(len))?;
        Ok(Self { points })
    }

    /// Get the point for a named landmark.
    pub fn point(&self, landmark: HandLandmark) -> Landmark {
        self.points[landmark.index()]
    }

    /// All points in landmark order.
    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// Check every coordinate is finite and within the accepted range.
    pub fn validate(&self) -> Result<(), FrameError> {
        for (i, p) in self.points.iter().enumerate() {
            if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                return Err(FrameError::NonFinite(LANDMARK_NAMES[i]));
            }
            let in_range = |v: f32| (COORD_MIN..=COORD_MAX).contains(&v);
            if !(in_range(p.x) && in_range(p.y) && in_range(p.z)) {
                return Err(FrameError::OutOfRange {
                    name: LANDMARK_NAMES[i],
                    x: p.x,
                    y: p.y,
                    z: p.z,
                });
            }
        }
        Ok(())
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Frame with every landmark at the same point.
#[cfg(test)]
pub(crate) fn uniform_frame(x: f32, y: f32, z: f32) -> LandmarkFrame {
    LandmarkFrame {
        points: [Landmark::new(x, y, z); LANDMARK_COUNT],
    }
}

/// Move a single landmark of a frame.
#[cfg(test)]
pub(crate) fn set_point(frame: &mut LandmarkFrame, landmark: HandLandmark, x: f32, y: f32, z: f32) {
    frame.points[landmark.index()] = Landmark::new(x, y, z);
}

// ── Tests ──────────────────────────────────────────────────
