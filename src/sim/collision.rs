//! Collision detection and resolution against level obstacles
//!
//! Tests run in *surface space*: x is world x, y is height above the active
//! surface. Ground obstacles (spikes, blocks, pads) live on whichever surface
//! is active, so they need no conversion. Orbs and portals are anchored to
//! the ceiling and get mapped into surface space per test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Gravity};
use super::input::InputBuffer;
use super::level::Obstacle;
use super::state::SimEvent;
use crate::tuning::Tuning;

/// Outcome of resolving one frame of contacts
///
/// Ordered by precedence: a frame that both boosts and kills reports `Fatal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Effect {
    None,
    Boost,
    Flip,
    Fatal,
}

/// World-x range of obstacles worth testing this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryWindow {
    pub min_x: f32,
    pub max_x: f32,
    /// Largest distance any obstacle extends left of its anchor x
    pub reach: f32,
}

impl QueryWindow {
    /// Visible range for a given scroll, padded by the tuning margin
    pub fn around(scroll: f32, tuning: &Tuning, reach: f32) -> Self {
        Self {
            min_x: scroll - tuning.window_margin,
            max_x: scroll + tuning.view_width + tuning.window_margin,
            reach,
        }
    }

    /// No obstacle anchored at `x` or later can start inside the window
    #[inline]
    fn is_past(&self, x: f32) -> bool {
        x - self.reach > self.max_x
    }
}

/// Re-trigger guards for non-fatal obstacles
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerCooldowns {
    /// Seconds until any portal may flip again
    pub flip: f32,
    /// Seconds until any orb may boost again
    pub orb: f32,
    /// Index of the portal the body is still inside after it fired
    pub portal_latch: Option<usize>,
}

impl TriggerCooldowns {
    pub fn advance(&mut self, dt: f32) {
        self.flip = (self.flip - dt).max(0.0);
        self.orb = (self.orb - dt).max(0.0);
    }
}

/// Circle vs axis-aligned rectangle, by clamping the center into the box
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, min: Vec2, max: Vec2) -> bool {
    let nearest = center.clamp(min, max);
    center.distance_squared(nearest) <= radius * radius
}

/// Circle vs circle
#[inline]
pub fn circle_circle_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// Spike hitbox: a base rectangle over the lower part of the triangle plus a
/// hit point just below the apex
pub fn spike_overlap(
    x: f32,
    width: f32,
    height: f32,
    center: Vec2,
    radius: f32,
    tuning: &Tuning,
) -> bool {
    let base_top = height * tuning.spike_base_fraction;
    if circle_rect_overlap(center, radius, Vec2::new(x, 0.0), Vec2::new(x + width, base_top)) {
        return true;
    }
    let apex = Vec2::new(x + width * 0.5, height - tuning.spike_tip_inset);
    circle_circle_overlap(center, radius, apex, 0.0)
}

/// Map a height measured from the floor into surface space
#[inline]
fn to_surface(height_from_floor: f32, gravity: Gravity, playfield_height: f32) -> f32 {
    match gravity {
        Gravity::Floor => height_from_floor,
        Gravity::Ceiling => playfield_height - height_from_floor,
    }
}

/// Whether the body's shrunk hitbox touches a spike or block
fn hits_hazard(obstacle: &Obstacle, center: Vec2, radius: f32, tuning: &Tuning) -> bool {
    match *obstacle {
        Obstacle::Block { x, width, height } => circle_rect_overlap(
            center,
            radius,
            Vec2::new(x, 0.0),
            Vec2::new(x + width, height),
        ),
        Obstacle::Spike { x, width, height } => {
            spike_overlap(x, width, height, center, radius, tuning)
        }
        _ => false,
    }
}

/// Test the body against every obstacle in the window and apply non-fatal
/// effects (boosts, flips) as they are found
///
/// The scan stops at the first fatal contact. Boosts and flips do not stop
/// it; cooldowns keep them from firing repeatedly, and a portal stays
/// latched until the body leaves its zone.
pub fn resolve(
    body: &mut Body,
    input: &mut InputBuffer,
    cooldowns: &mut TriggerCooldowns,
    obstacles: &[Obstacle],
    window: QueryWindow,
    tuning: &Tuning,
    events: &mut Vec<SimEvent>,
) -> Effect {
    let playfield = tuning.playfield_height;
    let mut effect = Effect::None;

    for (index, obstacle) in obstacles.iter().enumerate() {
        if window.is_past(obstacle.x()) {
            break; // sorted by anchor x
        }
        if obstacle.x_end() < window.min_x || obstacle.x_start() > window.max_x {
            continue;
        }

        let center = body.surface_center();
        if obstacle.is_fatal() {
            let hit_r = body.radius * tuning.block_hit_scale;
            if hits_hazard(obstacle, center, hit_r, tuning) {
                log::debug!("Hazard at x={} hit", obstacle.x());
                return Effect::Fatal;
            }
            continue;
        }

        match *obstacle {
            Obstacle::Pad { x, width, height } => {
                let hit_r = body.radius * tuning.pad_hit_scale;
                let min = Vec2::new(x, 0.0);
                let max = Vec2::new(x + width, height);
                if body.offset <= tuning.pad_trigger_height
                    && circle_rect_overlap(center, hit_r, min, max)
                {
                    body.boost(tuning.pad_velocity);
                    input.clear();
                    events.push(SimEvent::Boost);
                    effect = effect.max(Effect::Boost);
                }
            }
            Obstacle::Orb {
                x,
                y_from_top,
                radius,
            } => {
                if body.grounded || !input.has_tap() || cooldowns.orb > 0.0 {
                    continue;
                }
                let orb_y = to_surface(playfield - y_from_top, body.gravity, playfield);
                let orb = Vec2::new(x, orb_y);
                if circle_circle_overlap(center, body.radius + tuning.orb_margin, orb, radius) {
                    body.boost(tuning.orb_velocity);
                    input.clear();
                    cooldowns.orb = tuning.orb_cooldown;
                    events.push(SimEvent::Boost);
                    effect = effect.max(Effect::Boost);
                }
            }
            Obstacle::GravityPortal {
                x,
                y_from_top,
                width,
                height,
            } => {
                let top = to_surface(playfield - y_from_top, body.gravity, playfield);
                let bottom = to_surface(playfield - y_from_top - height, body.gravity, playfield);
                let min = Vec2::new(x - width / 2.0, top.min(bottom));
                let max = Vec2::new(x + width / 2.0, top.max(bottom));
                let inside = circle_rect_overlap(center, body.radius, min, max);
                let latched = cooldowns.portal_latch == Some(index);
                if !inside {
                    if latched {
                        cooldowns.portal_latch = None;
                    }
                    continue;
                }
                if latched || cooldowns.flip > 0.0 {
                    continue;
                }
                body.flip_gravity(playfield);
                cooldowns.flip = tuning.flip_cooldown;
                cooldowns.portal_latch = Some(index);
                log::debug!("Gravity flipped to {:?} at x={x}", body.gravity);
                events.push(SimEvent::Flip {
                    gravity: body.gravity,
                });
                effect = effect.max(Effect::Flip);
            }
            Obstacle::Spike { .. } | Obstacle::Block { .. } => {}
        }
    }

    effect
}
