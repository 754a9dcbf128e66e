//! Level descriptors and obstacle geometry
//!
//! A `Level` is immutable for the duration of a run. Obstacles are kept in
//! non-decreasing order of their leading edge so the resolver can stop
//! scanning once it passes the query window.

use serde::{Deserialize, Serialize};

use crate::tuning::{Tuning, TuningError};

/// An obstacle in the level timeline
///
/// Spikes, blocks and pads stand on the active surface with `height`
/// measured away from it. Orbs and portals float at a fixed depth below the
/// ceiling, regardless of gravity orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Obstacle {
    Spike { x: f32, width: f32, height: f32 },
    Block { x: f32, width: f32, height: f32 },
    Pad { x: f32, width: f32, height: f32 },
    Orb { x: f32, y_from_top: f32, radius: f32 },
    /// Zone centered horizontally on `x`
    GravityPortal { x: f32, y_from_top: f32, width: f32, height: f32 },
}

impl Obstacle {
    /// Anchor x that levels are ordered by
    pub fn x(&self) -> f32 {
        match *self {
            Obstacle::Spike { x, .. }
            | Obstacle::Block { x, .. }
            | Obstacle::Pad { x, .. }
            | Obstacle::Orb { x, .. }
            | Obstacle::GravityPortal { x, .. } => x,
        }
    }

    /// How far the obstacle reaches to the left of its anchor
    pub fn lead(&self) -> f32 {
        self.x() - self.x_start()
    }

    /// Leftmost world x covered by the obstacle
    pub fn x_start(&self) -> f32 {
        match *self {
            Obstacle::Spike { x, .. } | Obstacle::Block { x, .. } | Obstacle::Pad { x, .. } => x,
            Obstacle::Orb { x, radius, .. } => x - radius,
            Obstacle::GravityPortal { x, width, .. } => x - width / 2.0,
        }
    }

    /// Rightmost world x covered by the obstacle
    pub fn x_end(&self) -> f32 {
        match *self {
            Obstacle::Spike { x, width, .. }
            | Obstacle::Block { x, width, .. }
            | Obstacle::Pad { x, width, .. } => x + width,
            Obstacle::Orb { x, radius, .. } => x + radius,
            Obstacle::GravityPortal { x, width, .. } => x + width / 2.0,
        }
    }

    /// Whether touching this obstacle ends the attempt
    pub fn is_fatal(&self) -> bool {
        matches!(self, Obstacle::Spike { .. } | Obstacle::Block { .. })
    }

    fn check(&self) -> Result<(), &'static str> {
        let dims = match *self {
            Obstacle::Spike { width, height, .. }
            | Obstacle::Block { width, height, .. }
            | Obstacle::Pad { width, height, .. }
            | Obstacle::GravityPortal { width, height, .. } => [width, height],
            Obstacle::Orb { radius, .. } => [radius, radius],
        };
        if !self.x_start().is_finite() {
            return Err("non-finite position");
        }
        if dims.iter().any(|d| !(d.is_finite() && *d > 0.0)) {
            return Err("non-positive size");
        }
        match *self {
            Obstacle::Orb { y_from_top, .. } | Obstacle::GravityPortal { y_from_top, .. }
                if !y_from_top.is_finite() =>
            {
                Err("non-finite depth")
            }
            _ => Ok(()),
        }
    }
}

/// A playable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub difficulty: String,
    /// World units per second
    #[serde(alias = "speed")]
    pub horizontal_speed: f32,
    /// Total scroll distance to complete
    pub length: f32,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    /// Level-family constants; defaults apply when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuning: Option<Tuning>,
}

impl Level {
    pub fn new(
        id: impl Into<String>,
        horizontal_speed: f32,
        length: f32,
        obstacles: Vec<Obstacle>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            difficulty: String::new(),
            horizontal_speed,
            length,
            obstacles,
            tuning: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>, difficulty: impl Into<String>) -> Self {
        self.name = name.into();
        self.difficulty = difficulty.into();
        self
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = Some(tuning);
        self
    }

    /// Effective tuning for this level
    pub fn tuning(&self) -> Tuning {
        self.tuning.clone().unwrap_or_default()
    }

    /// Reject degenerate levels before a run can start
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.id.trim().is_empty() {
            return Err(LevelError::EmptyId);
        }
        if !(self.horizontal_speed.is_finite() && self.horizontal_speed > 0.0) {
            return Err(LevelError::NonPositiveSpeed(self.horizontal_speed));
        }
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(LevelError::NonPositiveLength(self.length));
        }
        if let Some(tuning) = &self.tuning {
            tuning.validate().map_err(LevelError::InvalidTuning)?;
        }

        let mut prev = f32::NEG_INFINITY;
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            obstacle
                .check()
                .map_err(|reason| LevelError::BadObstacle { index, reason })?;
            if obstacle.x() < prev {
                return Err(LevelError::Unsorted { index });
            }
            prev = obstacle.x();
        }
        Ok(())
    }

    /// Largest distance any obstacle extends left of its anchor
    pub fn max_lead(&self) -> f32 {
        self.obstacles.iter().map(Obstacle::lead).fold(0.0, f32::max)
    }

    /// Parse a single level from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Level =
            serde_json::from_str(json).map_err(|e| LevelError::Parse(e.to_string()))?;
        level.validate()?;
        Ok(level)
    }
}

/// Configuration errors surfaced before a run starts
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// A run was requested before any level was selected
    NoneSelected,
    EmptyId,
    NonPositiveSpeed(f32),
    NonPositiveLength(f32),
    BadObstacle { index: usize, reason: &'static str },
    Unsorted { index: usize },
    DuplicateId(String),
    InvalidTuning(TuningError),
    Parse(String),
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoneSelected => write!(f, "no level selected"),
            Self::EmptyId => write!(f, "level id is empty"),
            Self::NonPositiveSpeed(v) => write!(f, "horizontal speed must be > 0 (got {v})"),
            Self::NonPositiveLength(v) => write!(f, "level length must be > 0 (got {v})"),
            Self::BadObstacle { index, reason } => write!(f, "obstacle {index}: {reason}"),
            Self::Unsorted { index } => {
                write!(f, "obstacle {index} starts before its predecessor")
            }
            Self::DuplicateId(id) => write!(f, "duplicate level id: {id}"),
            Self::InvalidTuning(e) => write!(f, "{e}"),
            Self::Parse(e) => write!(f, "level parse error: {e}"),
        }
    }
}

impl std::error::Error for LevelError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn spike(x: f32) -> Obstacle {
        Obstacle::Spike {
            x,
            width: 46.0,
            height: 56.0,
        }
    }

    #[test]
    fn test_valid_level() {
        let level = Level::new("t", 600.0, 6000.0, vec![spike(1700.0), spike(2000.0)]);
        assert!(level.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_speed_and_length() {
        let level = Level::new("t", 0.0, 6000.0, vec![]);
        assert_eq!(level.validate(), Err(LevelError::NonPositiveSpeed(0.0)));

        let level = Level::new("t", 600.0, -1.0, vec![]);
        assert_eq!(level.validate(), Err(LevelError::NonPositiveLength(-1.0)));

        let level = Level::new("t", f32::NAN, 100.0, vec![]);
        assert!(matches!(level.validate(), Err(LevelError::NonPositiveSpeed(_))));
    }

    #[test]
    fn test_rejects_unsorted() {
        let level = Level::new("t", 600.0, 6000.0, vec![spike(2000.0), spike(1700.0)]);
        assert_eq!(level.validate(), Err(LevelError::Unsorted { index: 1 }));
    }

    #[test]
    fn test_order_uses_anchor_x() {
        // Portal's left edge (980) precedes the spike, but its anchor does not
        let level = Level::new(
            "sorted_by_x",
            600.0,
            3000.0,
            vec![
                spike(1000.0),
                Obstacle::GravityPortal {
                    x: 1010.0,
                    y_from_top: 0.0,
                    width: 60.0,
                    height: 480.0,
                },
            ],
        );
        assert!(level.validate().is_ok());
        assert_eq!(level.max_lead(), 30.0);
    }

    #[test]
    fn test_rejects_zero_sized_obstacle() {
        let level = Level::new(
            "t",
            600.0,
            6000.0,
            vec![Obstacle::Block {
                x: 10.0,
                width: 0.0,
                height: 20.0,
            }],
        );
        assert!(matches!(
            level.validate(),
            Err(LevelError::BadObstacle { index: 0, .. })
        ));
    }

    #[test]
    fn test_portal_extent_is_centered() {
        let portal = Obstacle::GravityPortal {
            x: 100.0,
            y_from_top: 0.0,
            width: 40.0,
            height: 200.0,
        };
        assert_eq!(portal.x_start(), 80.0);
        assert_eq!(portal.x_end(), 120.0);
        assert!(!portal.is_fatal());
        assert!(spike(0.0).is_fatal());
    }

    #[test]
    fn test_from_json_tagged() {
        let json = r#"{
            "id": "j1",
            "speed": 600.0,
            "length": 3000.0,
            "obstacles": [
                { "kind": "Spike", "x": 900.0, "width": 46.0, "height": 56.0 },
                { "kind": "Orb", "x": 1200.0, "y_from_top": 200.0, "radius": 16.0 }
            ]
        }"#;
        let level = Level::from_json(json).unwrap();
        assert_eq!(level.horizontal_speed, 600.0);
        assert_eq!(level.obstacles.len(), 2);
        assert!(matches!(level.obstacles[1], Obstacle::Orb { .. }));
        assert_eq!(level.tuning(), Tuning::default());
    }

    #[test]
    fn test_from_json_rejects_invalid_tuning() {
        let json = r#"{ "id": "j", "speed": 1.0, "length": 1.0, "tuning": { "gravity": -5.0 } }"#;
        assert!(matches!(
            Level::from_json(json),
            Err(LevelError::InvalidTuning(_))
        ));
    }
}
