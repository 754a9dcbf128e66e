//! Jump buffering and coyote time
//!
//! A tap is remembered for `buffer_max` seconds, and the body may still jump
//! for `coyote_max` seconds after leaving its surface. Both windows are plain
//! countdowns: a second tap overwrites the first rather than stacking.

use serde::{Deserialize, Serialize};

/// Timed-input state, reset at the start of every attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputBuffer {
    /// Time left on the most recent tap (seconds)
    pub buffered: f32,
    /// Time left to jump after leaving the surface (seconds)
    pub coyote: f32,
}

impl InputBuffer {
    /// Fresh buffer for a body that starts on its surface
    pub fn new(coyote_max: f32) -> Self {
        Self {
            buffered: 0.0,
            coyote: coyote_max,
        }
    }

    /// Remember a tap. Callers gate this on the run being live.
    #[inline]
    pub fn register_tap(&mut self, buffer_max: f32) {
        self.buffered = buffer_max;
    }

    /// Count both windows down by `dt`, refreshing coyote while grounded
    pub fn advance(&mut self, dt: f32, grounded: bool, coyote_max: f32) {
        self.buffered = (self.buffered - dt).max(0.0);
        self.coyote = if grounded {
            coyote_max
        } else {
            (self.coyote - dt).max(0.0)
        };
    }

    /// Whether a tap is still pending
    #[inline]
    pub fn has_tap(&self) -> bool {
        self.buffered > 0.0
    }

    /// Authorize a jump if a tap is pending and the body is on (or just left)
    /// its surface. Clears both windows on success.
    pub fn consume_if_actionable(&mut self, grounded: bool) -> bool {
        if self.buffered > 0.0 && (grounded || self.coyote > 0.0) {
            self.clear();
            true
        } else {
            false
        }
    }

    /// Spend the pending tap on something other than a jump (orbs, pads)
    #[inline]
    pub fn clear(&mut self) {
        self.buffered = 0.0;
        self.coyote = 0.0;
    }
}
