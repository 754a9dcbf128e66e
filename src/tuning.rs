//! Data-driven physics and forgiveness constants
//!
//! Different level families disagree on jump height, gravity and boost
//! strength, so nothing here is treated as universal. A level may carry its
//! own `Tuning`; otherwise `Tuning::default()` applies.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_DT;

/// Tunable constants for one level family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    /// Gravity magnitude toward the active surface (units/s²)
    pub gravity: f32,
    /// Velocity away from the surface on a jump (units/s)
    pub jump_velocity: f32,
    /// Velocity applied by a pad (units/s)
    pub pad_velocity: f32,
    /// Velocity applied by an orb air-jump (units/s)
    pub orb_velocity: f32,
    /// Maximum fall speed toward the active surface (units/s, positive)
    pub terminal_velocity: f32,

    // === Input forgiveness ===
    /// Jump buffer window (seconds)
    pub buffer_max: f32,
    /// Coyote window after leaving the surface (seconds)
    pub coyote_max: f32,

    // === Run timing ===
    /// Pre-roll before the world scrolls (seconds, 0 = start running at once)
    pub ready_delay: f32,
    /// Delay between a crash and the automatic retry (seconds)
    pub restart_delay: f32,
    /// Delay between completion and returning to idle (seconds)
    pub complete_delay: f32,
    /// Re-trigger cooldown for gravity portals (seconds)
    pub flip_cooldown: f32,
    /// Re-trigger cooldown for orbs (seconds)
    pub orb_cooldown: f32,
    /// Largest step a single tick may simulate (seconds)
    pub max_dt: f32,

    // === Body & hitboxes ===
    /// Drawn body radius
    pub body_radius: f32,
    /// Horizontal offset of the body from the scroll origin
    pub body_anchor_x: f32,
    /// Hit radius scale against blocks and spikes
    pub block_hit_scale: f32,
    /// Hit radius scale against pads
    pub pad_hit_scale: f32,
    /// Pads only fire while the body is this close to its surface
    pub pad_trigger_height: f32,
    /// Fraction of a spike's height covered by its base rectangle
    pub spike_base_fraction: f32,
    /// Distance of the spike apex hit point below the tip
    pub spike_tip_inset: f32,
    /// Extra reach added to orb circle tests
    pub orb_margin: f32,

    // === Playfield ===
    /// Distance from floor to ceiling
    pub playfield_height: f32,
    /// Obstacles this far outside the view are still scanned
    pub window_margin: f32,
    /// Visible world width ahead of the scroll origin
    pub view_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 2850.0,
            jump_velocity: 820.0,
            pad_velocity: 1240.0,
            orb_velocity: 1000.0,
            terminal_velocity: 1750.0,

            buffer_max: 0.11,
            coyote_max: 0.08,

            ready_delay: 0.0,
            restart_delay: 0.75,
            complete_delay: 0.9,
            flip_cooldown: 0.2,
            orb_cooldown: 0.2,
            max_dt: MAX_DT,

            body_radius: 18.0,
            body_anchor_x: 250.0,
            block_hit_scale: 0.90,
            pad_hit_scale: 0.95,
            pad_trigger_height: 7.0,
            spike_base_fraction: 0.55,
            spike_tip_inset: 6.0,
            orb_margin: 6.0,

            playfield_height: 480.0,
            window_margin: 160.0,
            view_width: 1280.0,
        }
    }
}

/// Why a tuning was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// A field that must be strictly positive was not
    NotPositive(&'static str),
    /// A field that must be non-negative was negative
    Negative(&'static str),
    /// A ratio fell outside (0, 1]
    BadRatio(&'static str),
    /// The body does not fit between floor and ceiling
    BodyTooLarge,
    /// JSON could not be parsed
    Parse(String),
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPositive(field) => write!(f, "tuning field `{field}` must be > 0"),
            Self::Negative(field) => write!(f, "tuning field `{field}` must be >= 0"),
            Self::BadRatio(field) => write!(f, "tuning field `{field}` must be in (0, 1]"),
            Self::BodyTooLarge => write!(f, "body diameter exceeds playfield height"),
            Self::Parse(e) => write!(f, "tuning parse error: {e}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// Parse a tuning from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a JSON file. Falls back to defaults if the file is missing
    /// or invalid.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_json(&content) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Failed to load {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Reject values that would make the simulation degenerate
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("pad_velocity", self.pad_velocity),
            ("orb_velocity", self.orb_velocity),
            ("terminal_velocity", self.terminal_velocity),
            ("max_dt", self.max_dt),
            ("body_radius", self.body_radius),
            ("playfield_height", self.playfield_height),
            ("view_width", self.view_width),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::NotPositive(field));
            }
        }

        let non_negative = [
            ("buffer_max", self.buffer_max),
            ("coyote_max", self.coyote_max),
            ("ready_delay", self.ready_delay),
            ("restart_delay", self.restart_delay),
            ("complete_delay", self.complete_delay),
            ("flip_cooldown", self.flip_cooldown),
            ("orb_cooldown", self.orb_cooldown),
            ("body_anchor_x", self.body_anchor_x),
            ("pad_trigger_height", self.pad_trigger_height),
            ("spike_tip_inset", self.spike_tip_inset),
            ("orb_margin", self.orb_margin),
            ("window_margin", self.window_margin),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Negative(field));
            }
        }

        let ratios = [
            ("block_hit_scale", self.block_hit_scale),
            ("pad_hit_scale", self.pad_hit_scale),
            ("spike_base_fraction", self.spike_base_fraction),
        ];
        for (field, value) in ratios {
            if !(value > 0.0 && value <= 1.0) {
                return Err(TuningError::BadRatio(field));
            }
        }

        if self.body_radius * 2.0 >= self.playfield_height {
            return Err(TuningError::BodyTooLarge);
        }
        Ok(())
    }

    /// Largest surface offset the body can reach before touching the
    /// opposite surface
    #[inline]
    pub fn max_offset(&self) -> f32 {
        self.playfield_height - 2.0 * self.body_radius
    }
}
