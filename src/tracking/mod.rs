//! Hand tracking subsystem — the camera-frame signal path.
//!
//! Provides:
//! - `landmark`: 21-point hand frames and input validation
//! - `stabilizer`: adaptive smoothing and deadzone filtering
//! - `classifier`: finger-gun pose detection
//! - `trigger`: edge-triggered fire events with cooldown
//! - `pipeline`: the per-frame stabilize -> classify -> fire pass

pub mod classifier;
pub mod landmark;
pub mod pipeline;
pub mod stabilizer;
pub mod trigger;

pub use classifier::ClassifierConfig;
pub use landmark::{FrameError, HandLandmark, Landmark, LandmarkFrame, LANDMARK_COUNT};
pub use pipeline::{AimPosition, FireEvent, FrameOutput, HandTracker, TrackerConfig, TrackerStats};
pub use stabilizer::{stabilize, Stabilizer, StabilizerConfig};
pub use trigger::{FireTrigger, DEFAULT_COOLDOWN_MS};
