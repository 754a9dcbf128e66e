//! The controlled body and its vertical integration
//!
//! All vertical state is measured from the *active surface*: the floor under
//! normal gravity, the ceiling when inverted. `offset` is the gap between the
//! body's edge and that surface and is never negative, so one integrator
//! handles both orientations.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::input::InputBuffer;
use crate::tuning::Tuning;

/// Which surface gravity currently pulls toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gravity {
    /// Active surface is the floor, body sits above it
    #[default]
    Floor,
    /// Active surface is the ceiling, body hangs below it
    Ceiling,
}

impl Gravity {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Gravity::Floor => Gravity::Ceiling,
            Gravity::Ceiling => Gravity::Floor,
        }
    }
}

/// The player's body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// World x of the body center
    pub horizontal_pos: f32,
    /// Gap between the body and the active surface (>= 0)
    pub offset: f32,
    /// Velocity away from the active surface (units/s)
    pub velocity: f32,
    pub radius: f32,
    pub alive: bool,
    pub grounded: bool,
    pub gravity: Gravity,
}

impl Body {
    /// A body at rest on the floor
    pub fn new(horizontal_pos: f32, radius: f32) -> Self {
        Self {
            horizontal_pos,
            offset: 0.0,
            velocity: 0.0,
            radius,
            alive: true,
            grounded: true,
            gravity: Gravity::Floor,
        }
    }

    /// Body center in surface space: x along the level, y away from the
    /// active surface
    #[inline]
    pub fn surface_center(&self) -> Vec2 {
        Vec2::new(self.horizontal_pos, self.offset + self.radius)
    }

    /// Height of the body center above the floor, for presentation
    pub fn center_height(&self, playfield_height: f32) -> f32 {
        match self.gravity {
            Gravity::Floor => self.offset + self.radius,
            Gravity::Ceiling => playfield_height - self.radius - self.offset,
        }
    }

    /// Advance vertical motion by `dt`, then jump if the input buffer allows
    ///
    /// Returns true when a jump fired this step.
    pub fn integrate(&mut self, dt: f32, tuning: &Tuning, input: &mut InputBuffer) -> bool {
        self.velocity -= tuning.gravity * dt;
        self.velocity = self.velocity.max(-tuning.terminal_velocity);
        self.offset += self.velocity * dt;

        if self.offset <= 0.0 {
            self.offset = 0.0;
            self.velocity = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
            // Opposite surface stops the body without killing it
            let max = tuning.max_offset();
            if self.offset > max {
                self.offset = max;
                self.velocity = self.velocity.min(0.0);
            }
        }

        let jumped = self.alive && input.consume_if_actionable(self.grounded);
        if jumped {
            self.velocity = tuning.jump_velocity;
            self.grounded = false;
        }

        debug_assert!(self.offset >= 0.0, "offset went negative: {}", self.offset);
        debug_assert!(
            !self.grounded || (self.offset == 0.0 && self.velocity == 0.0),
            "grounded body must rest on its surface"
        );
        jumped
    }

    /// Launch away from the surface at `velocity` (pads, orbs)
    pub fn boost(&mut self, velocity: f32) {
        self.velocity = velocity;
        self.grounded = false;
    }

    /// Swap the active surface without moving the body on screen
    ///
    /// The center height is preserved, the offset is re-measured from the new
    /// surface, and velocity is negated so screen-space motion carries over.
    pub fn flip_gravity(&mut self, playfield_height: f32) {
        let center = self.center_height(playfield_height);
        self.gravity = self.gravity.flipped();
        let offset = match self.gravity {
            Gravity::Floor => center - self.radius,
            Gravity::Ceiling => playfield_height - self.radius - center,
        };
        let max = (playfield_height - 2.0 * self.radius).max(0.0);
        self.offset = offset.clamp(0.0, max);
        self.velocity = -self.velocity;
        self.grounded = false;
    }
}
