//! Per-frame simulation driver
//!
//! Sequences one frame of a run: progression, physics, spawning, collision,
//! then score and cosmetic upkeep. Owns the phase machine.

use super::random::RandomSource;
use super::state::{GameEvent, GamePhase, RunState};
use super::{collision, effects, physics, progression, spawner};
use crate::tuning::Tuning;
use crate::{clamp_frame_dt, secs_to_frames};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump button went down
    pub jump_pressed: bool,
    /// Jump button came up
    pub jump_released: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Flip between running and paused. Returns whether the phase changed.
pub fn toggle_pause(state: &mut RunState) -> bool {
    match state.phase {
        GamePhase::Running => {
            state.phase = GamePhase::Paused;
            state.events.push(GameEvent::Paused);
            log::debug!("Paused at {:.1}s", state.elapsed);
            true
        }
        GamePhase::Paused => {
            state.phase = GamePhase::Running;
            state.events.push(GameEvent::Resumed);
            log::debug!("Resumed");
            true
        }
        _ => false,
    }
}

/// Advance the run by `dt` seconds
pub fn tick(state: &mut RunState, tuning: &Tuning, rng: &mut impl RandomSource, input: &TickInput, dt: f32) {
    let dt = clamp_frame_dt(dt);

    if input.pause {
        toggle_pause(state);
    }

    match state.phase {
        GamePhase::Paused | GamePhase::Ended => return,
        GamePhase::Starting => {
            count_down(state, dt);
            return;
        }
        GamePhase::Running => {}
    }

    let frames = secs_to_frames(dt);

    if input.jump_pressed && physics::start_jump(&mut state.player, &tuning.physics) {
        log::trace!("Jump at offset {:.0}", state.world_offset);
    }
    if input.jump_released {
        physics::release_jump(&mut state.player, &tuning.physics);
    }

    progression::step(state, tuning, dt);
    effects::update_camera_shake(state, &tuning.effects, dt, rng);
    physics::step(state, &tuning.physics, &tuning.player, frames);
    spawner::step(state, tuning, rng);
    collision::step(state, tuning);

    // Last life gone: the frame stops here
    if state.lives == 0 {
        state.phase = GamePhase::Ended;
        state.events.push(GameEvent::RunEnded);
        log::info!(
            "Run ended: score {:.0}, distance {:.0}, {} coins",
            state.score,
            state.world_offset,
            state.coins_collected
        );
        return;
    }

    progression::award_passive_score(state, tuning, frames);
    effects::emit_trail(state, &tuning.effects, frames);
    effects::age_artifacts(state, dt);
}

fn count_down(state: &mut RunState, dt: f32) {
    state.countdown_remaining -= dt;
    if state.countdown_remaining <= 0.0 {
        state.countdown_remaining = 0.0;
        state.phase = GamePhase::Running;
        state.events.push(GameEvent::RunStarted);
        log::info!("Run started");
    }
}
