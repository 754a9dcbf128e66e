//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable timestep, clamped to `Tuning::max_dt`
//! - No randomness
//! - Obstacles scanned in level order
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod collision;
pub mod input;
pub mod level;
pub mod state;
pub mod tick;

pub use body::{Body, Gravity};
pub use collision::{Effect, QueryWindow, TriggerCooldowns, resolve};
pub use input::InputBuffer;
pub use level::{Level, LevelError, Obstacle};
pub use state::{Game, RunContext, RunOutcome, RunSnapshot, SimEvent};
pub use tick::{TickInput, tick};
