//! Rift Pulse - An auto-scrolling one-button runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (body physics, collisions, run state machine)
//! - `tuning`: Data-driven physics and forgiveness constants
//! - `levels`: Built-in level catalog
//! - `best`: Per-level best progress persistence

pub mod best;
pub mod levels;
pub mod sim;
pub mod tuning;

pub use best::BestProgress;
pub use tuning::Tuning;

/// Host loop constants
pub mod consts {
    /// Nominal frame step used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Hard cap on a single simulation step; longer frames are truncated
    pub const MAX_DT: f32 = 0.033;
    /// Attempts the headless runner allows before giving up on a level
    pub const MAX_ATTEMPTS: u32 = 50;
}

/// Clamp a ratio to [0, 1], mapping NaN to 0
#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
