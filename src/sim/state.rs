//! Run state and the control surface
//!
//! `Game` owns the selected level and the current attempt. Each attempt's
//! mutable state lives in a `RunContext` that is rebuilt from scratch on
//! every start and every automatic retry.

use serde::{Deserialize, Serialize};

use super::body::{Body, Gravity};
use super::collision::TriggerCooldowns;
use super::input::InputBuffer;
use super::level::{Level, LevelError};
use crate::tuning::Tuning;

/// Life-cycle of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// No level running (menu)
    Idle,
    /// Pre-roll: the world is not scrolling yet
    Ready,
    /// Active gameplay
    Running,
    /// Hit something; retrying automatically after a delay
    Crashed,
    /// Reached the end; returning to idle after a delay
    Completed,
}

/// One-shot signals for audio/visual feedback, emitted by `tick`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Jump,
    Boost,
    Flip { gravity: Gravity },
    Fatal,
    Completed { progress: f32 },
    /// A new attempt began after a crash
    Restarted { attempt: u32 },
}

/// Mutable state for a single attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunContext {
    pub body: Body,
    pub input: InputBuffer,
    pub cooldowns: TriggerCooldowns,
    /// Total horizontal distance travelled
    pub world_scroll: f32,
    /// `world_scroll / length`, clamped to [0, 1]
    pub progress: f32,
    /// Unpaused time since the attempt began (ms)
    pub elapsed_ms: f64,
    pub outcome: RunOutcome,
    /// Countdown for the current timed state (ready, crash, completion)
    pub timer: f32,
    /// 1-based attempt number since the last manual start
    pub attempt: u32,
}

impl RunContext {
    /// Idle context with a body parked at the origin
    pub fn idle(tuning: &Tuning) -> Self {
        Self {
            outcome: RunOutcome::Idle,
            timer: 0.0,
            ..Self::fresh(tuning, 0)
        }
    }

    /// Fully reset attempt, entering `Ready` when a pre-roll is configured
    pub fn fresh(tuning: &Tuning, attempt: u32) -> Self {
        let (outcome, timer) = if tuning.ready_delay > 0.0 {
            (RunOutcome::Ready, tuning.ready_delay)
        } else {
            (RunOutcome::Running, 0.0)
        };
        Self {
            body: Body::new(tuning.body_anchor_x, tuning.body_radius),
            input: InputBuffer::new(tuning.coyote_max),
            cooldowns: TriggerCooldowns::default(),
            world_scroll: 0.0,
            progress: 0.0,
            elapsed_ms: 0.0,
            outcome,
            timer,
            attempt,
        }
    }

    /// Whether taps should be accepted
    #[inline]
    pub fn accepts_input(&self) -> bool {
        self.outcome == RunOutcome::Running && self.body.alive
    }
}

/// Read-only view for the presentation layer, taken after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub outcome: RunOutcome,
    pub paused: bool,
    pub progress: f32,
    pub world_scroll: f32,
    pub alive: bool,
    pub gravity: Gravity,
    /// Gap between body and active surface
    pub offset: f32,
    /// Body center height above the floor
    pub center_height: f32,
    /// World x of the body center
    pub body_x: f32,
    pub attempt: u32,
    pub elapsed_ms: f64,
}

/// The run state machine and its control surface
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) level: Option<Level>,
    pub(crate) tuning: Tuning,
    pub(crate) run: RunContext,
    pub(crate) paused: bool,
    /// Cached `Level::max_lead` of the selected level
    pub(crate) obstacle_lead: f32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Idle game with no level selected
    pub fn new() -> Self {
        let tuning = Tuning::default();
        Self {
            level: None,
            run: RunContext::idle(&tuning),
            tuning,
            paused: false,
            obstacle_lead: 0.0,
        }
    }

    /// Convenience: select `level` on a new game
    pub fn with_level(level: Level) -> Result<Self, LevelError> {
        let mut game = Self::new();
        game.select_level(level)?;
        Ok(game)
    }

    /// Validate and select a level. Returns to idle.
    pub fn select_level(&mut self, level: Level) -> Result<(), LevelError> {
        level.validate()?;
        self.tuning = level.tuning();
        self.obstacle_lead = level.max_lead();
        log::info!(
            "Selected level {} ({}, speed {}, length {})",
            level.id,
            level.name,
            level.horizontal_speed,
            level.length
        );
        self.level = Some(level);
        self.return_to_idle();
        Ok(())
    }

    /// Start (or restart) the selected level from the beginning
    pub fn start(&mut self) -> Result<(), LevelError> {
        let level = self.level.as_ref().ok_or(LevelError::NoneSelected)?;
        log::info!("Starting level {}", level.id);
        self.run = RunContext::fresh(&self.tuning, 1);
        self.paused = false;
        Ok(())
    }

    /// Abandon any attempt and go back to the menu
    pub fn return_to_idle(&mut self) {
        if self.run.outcome != RunOutcome::Idle {
            log::info!("Returning to idle");
        }
        self.run = RunContext::idle(&self.tuning);
        self.paused = false;
    }

    /// Freeze or resume per-tick advancement. No effect while idle.
    pub fn toggle_pause(&mut self) {
        if self.run.outcome == RunOutcome::Idle {
            return;
        }
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
    }

    /// Queue a jump. Ignored unless running, unpaused and alive.
    pub fn register_tap(&mut self) {
        if self.paused || !self.run.accepts_input() {
            return;
        }
        self.run.input.register_tap(self.tuning.buffer_max);
    }

    /// Restart after a crash, keeping the attempt count
    pub(crate) fn retry(&mut self) -> u32 {
        let attempt = self.run.attempt + 1;
        self.run = RunContext::fresh(&self.tuning, attempt);
        log::info!("Attempt {attempt}");
        attempt
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn run(&self) -> &RunContext {
        &self.run
    }

    pub fn outcome(&self) -> RunOutcome {
        self.run.outcome
    }

    pub fn progress(&self) -> f32 {
        self.run.progress
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn snapshot(&self) -> RunSnapshot {
        let body = &self.run.body;
        RunSnapshot {
            outcome: self.run.outcome,
            paused: self.paused,
            progress: self.run.progress,
            world_scroll: self.run.world_scroll,
            alive: body.alive,
            gravity: body.gravity,
            offset: body.offset,
            center_height: body.center_height(self.tuning.playfield_height),
            body_x: body.horizontal_pos,
            attempt: self.run.attempt,
            elapsed_ms: self.run.elapsed_ms,
        }
    }
}
