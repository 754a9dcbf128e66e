//! Per-frame simulation tick
//!
//! One call per rendered frame. Input for the frame is applied first, then
//! the state machine advances by a clamped `dt`.

use super::collision::{Effect, QueryWindow, resolve};
use super::state::{Game, RunOutcome, SimEvent};
use crate::clamp01;

/// Input commands collected since the previous tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump tap (click/touch/space). Several taps in one frame count once.
    pub tap: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game by one frame and return the effects it produced
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();

    if input.pause {
        game.toggle_pause();
    }
    if input.tap {
        game.register_tap();
    }

    // Non-positive or NaN frames advance nothing
    if dt.is_nan() || dt <= 0.0 {
        return events;
    }
    let dt = dt.min(game.tuning.max_dt);

    if game.paused || game.run.outcome == RunOutcome::Idle {
        return events;
    }
    game.run.elapsed_ms += f64::from(dt) * 1000.0;

    match game.run.outcome {
        RunOutcome::Idle => {}

        RunOutcome::Ready => {
            game.run.timer -= dt;
            if game.run.timer <= 0.0 {
                game.run.timer = 0.0;
                game.run.outcome = RunOutcome::Running;
            }
        }

        RunOutcome::Running => step_running(game, dt, &mut events),

        RunOutcome::Crashed => {
            game.run.timer -= dt;
            if game.run.timer <= 0.0 {
                let attempt = game.retry();
                events.push(SimEvent::Restarted { attempt });
            }
        }

        RunOutcome::Completed => {
            game.run.timer -= dt;
            if game.run.timer <= 0.0 {
                game.return_to_idle();
            }
        }
    }

    debug_assert!(game.run.body.offset >= 0.0);
    debug_assert!((0.0..=1.0).contains(&game.run.progress));
    events
}

/// Scroll, integrate, collide, then settle the outcome
fn step_running(game: &mut Game, dt: f32, events: &mut Vec<SimEvent>) {
    let Some(level) = game.level.as_ref() else {
        // A running attempt always has a level; treat anything else as idle
        game.run.outcome = RunOutcome::Idle;
        return;
    };
    let tuning = &game.tuning;
    let run = &mut game.run;

    run.world_scroll = (run.world_scroll + level.horizontal_speed * dt).min(level.length);
    run.progress = clamp01(run.world_scroll / level.length);

    run.input.advance(dt, run.body.grounded, tuning.coyote_max);
    run.cooldowns.advance(dt);

    run.body.horizontal_pos = run.world_scroll + tuning.body_anchor_x;
    if run.body.integrate(dt, tuning, &mut run.input) {
        events.push(SimEvent::Jump);
    }

    let window = QueryWindow::around(run.world_scroll, tuning, game.obstacle_lead);
    let effect = resolve(
        &mut run.body,
        &mut run.input,
        &mut run.cooldowns,
        &level.obstacles,
        window,
        tuning,
        events,
    );

    if effect == Effect::Fatal {
        run.body.alive = false;
        run.outcome = RunOutcome::Crashed;
        run.timer = tuning.restart_delay;
        events.push(SimEvent::Fatal);
        log::info!(
            "Crashed at {:.0}% (attempt {})",
            run.progress * 100.0,
            run.attempt
        );
        return;
    }

    if run.progress >= 1.0 {
        run.outcome = RunOutcome::Completed;
        run.timer = tuning.complete_delay;
        events.push(SimEvent::Completed {
            progress: run.progress,
        });
        log::info!("Level {} cleared on attempt {}", level.id, run.attempt);
    }
}
