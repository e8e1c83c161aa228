//! fingergun — hand-gesture aim and fire pipeline for a motion-controlled
//! shooting gallery.
//!
//! Turns noisy per-frame hand-landmark estimates into a stable aim cursor
//! and debounced discrete fire events, and accumulates finished rounds
//! into session and leaderboard statistics.  Rendering, audio and any
//! remote transport are external collaborators; this crate exposes plain
//! types at those boundaries.

pub mod score;
pub mod tracking;
