//! Fire-event trigger — edge detection over the aiming pose with a
//! cooldown gate.
//!
//! At camera frame rates a held pose would emit a continuous stream of
//! fire events; only the idle-to-aiming transition fires, and the cooldown
//! absorbs classifier flicker at the pose boundary.

use tracing::debug;

/// Minimum interval between two fire events, milliseconds.
pub const DEFAULT_COOLDOWN_MS: f64 = 300.0;

/// Edge-triggered fire state for one tracking session.
#[derive(Debug)]
pub struct FireTrigger {
    /// Cooldown window in milliseconds.
    pub cooldown_ms: f64,
    /// Aiming state observed on the previous frame.
    was_aiming: bool,
    /// Timestamp of the last emitted fire event, or None if none yet.
    last_fire_ms: Option<f64>,
}

impl Default for FireTrigger {
    fn default() -> Self {
        Self::with_cooldown(DEFAULT_COOLDOWN_MS)
    }
}

impl FireTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cooldown(cooldown_ms: f64) -> Self {
        Self {
            cooldown_ms,
            was_aiming: false,
            last_fire_ms: None,
        }
    }

    /// Advance one frame.  Returns true when a fire event should be
    /// emitted: the pose just transitioned into aiming and the cooldown
    /// window since the last shot has elapsed.
    pub fn update(&mut self, is_aiming: bool, now_ms: f64) -> bool {
        let rising_edge = is_aiming && !self.was_aiming;
        self.was_aiming = is_aiming;

        if rising_edge && self.cooled_down(now_ms) {
            self.last_fire_ms = Some(now_ms);
            debug!("fire at {:.0}ms", now_ms);
            return true;
        }
        false
    }

    fn cooled_down(&self, now_ms: f64) -> bool {
        match self.last_fire_ms {
            Some(last) => now_ms - last > self.cooldown_ms,
            None => true,
        }
    }

    /// Whether the pose was aiming on the last processed frame.
    pub fn is_aiming(&self) -> bool {
        self.was_aiming
    }

    /// Reset the edge detector (tracking loss).  The cooldown clock keeps
    /// running so a flickering detection cannot re-fire through a gap.
    pub fn reset(&mut self) {
        self.was_aiming = false;
    }
}

// ── Tests ──────────────────────────────────────────────────
