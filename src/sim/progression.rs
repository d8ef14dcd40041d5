//! Speed, background, combo and passive score progression

use super::state::{BackgroundPhase, GameEvent, RunState};
use crate::consts::{BASE_MULTIPLIER, COMBO_TIERS};
use crate::tuning::Tuning;

/// Score multiplier for a combo count: a step function capped at the top tier
pub fn multiplier_for_combo(combo: u32) -> f32 {
    COMBO_TIERS
        .iter()
        .rev()
        .find(|(threshold, _)| combo >= *threshold)
        .map(|&(_, multiplier)| multiplier)
        .unwrap_or(BASE_MULTIPLIER)
}

/// Score-implied speed floor
pub fn base_speed(score: f64, tuning: &Tuning) -> f32 {
    let s = &tuning.speed;
    let speed = s.initial_speed as f64 + score * s.speed_increase as f64;
    speed.min(s.max_speed as f64) as f32
}

/// Speed along the post-hit recovery ramp, or `None` once recovered
pub fn recovery_speed(peak: f32, recovery_timer: f32, tuning: &Tuning) -> Option<f32> {
    if recovery_timer <= 0.0 {
        return None;
    }
    let s = &tuning.speed;
    let progress = (1.0 - recovery_timer / s.speed_recovery_duration).clamp(0.0, 1.0);
    let penalty_speed = peak * (1.0 - s.speed_penalty_on_hit);
    Some(penalty_speed + (peak - penalty_speed) * progress)
}

/// Refresh the peak watermark and current speed
pub fn update_speed(state: &mut RunState, tuning: &Tuning, dt: f32) {
    let base = base_speed(state.score, tuning);
    state.peak_speed = state.peak_speed.max(base);

    if state.speed_recovery_timer > 0.0 {
        state.speed_recovery_timer = (state.speed_recovery_timer - dt).max(0.0);
    }

    state.speed = match recovery_speed(state.peak_speed, state.speed_recovery_timer, tuning) {
        Some(ramp) => ramp,
        None => base.max(state.peak_speed),
    };
}

/// Tick down timed effects and decay an idle combo
pub fn update_timers(state: &mut RunState, tuning: &Tuning, dt: f32) {
    let effects = &mut state.effects;
    effects.invincible_timer = (effects.invincible_timer - dt).max(0.0);
    effects.magnet_timer = (effects.magnet_timer - dt).max(0.0);
    effects.hit_flash_timer = (effects.hit_flash_timer - dt).max(0.0);

    if state.combo > 0 {
        state.combo_timer += dt;
        if state.combo_timer >= tuning.scoring.combo_timeout {
            log::debug!("Combo of {} expired", state.combo);
            state.reset_combo();
        }
    }
}

/// Advance game time and switch background art on the fixed cycle
pub fn update_background(state: &mut RunState, dt: f32) {
    state.elapsed += dt;
    let phase = BackgroundPhase::for_elapsed(state.elapsed);
    if phase != state.background {
        log::debug!("Background -> {:?} at {:.0}s", phase, state.elapsed);
        state.background = phase;
        state.events.push(GameEvent::BackgroundChanged(phase));
    }
}

/// Distance score for this frame, scaled by speed and combo multiplier
pub fn award_passive_score(state: &mut RunState, tuning: &Tuning, frames: f32) {
    let speed_ratio = (state.speed / tuning.speed.initial_speed) as f64;
    let gained = tuning.scoring.score_per_frame * speed_ratio * frames as f64 * state.multiplier as f64;
    if gained > 0.0 {
        state.score += gained;
        state.events.push(GameEvent::ScoreChanged(state.score));
    }
}

/// Progression phase that opens each frame
pub fn step(state: &mut RunState, tuning: &Tuning, dt: f32) {
    update_timers(state, tuning, dt);
    update_background(state, dt);
    update_speed(state, tuning, dt);
}
