//! Visual-only effects: camera shake, trail particles, artifact aging
//!
//! Nothing here feeds back into gameplay.

use glam::Vec2;

use super::random::RandomSource;
use super::state::{RunState, TrailParticle};
use crate::consts::FLOATING_TEXT_RISE_SPEED;
use crate::tuning::EffectsTuning;

/// Age artifacts by `dt` seconds and drop the expired ones
pub fn age_artifacts(state: &mut RunState, dt: f32) {
    let artifacts = &mut state.artifacts;

    for burst in &mut artifacts.bursts {
        burst.age += dt;
    }
    artifacts.bursts.retain(|b| b.age < b.lifetime);

    for particle in &mut artifacts.trail {
        particle.age += dt;
    }
    artifacts.trail.retain(|p| p.age < p.lifetime);

    for text in &mut artifacts.texts {
        text.age += dt;
        text.pos.y -= FLOATING_TEXT_RISE_SPEED * dt;
    }
    artifacts.texts.retain(|t| t.age < t.lifetime);
}

/// Decay the camera shake and pick this frame's jitter
pub fn update_camera_shake(state: &mut RunState, fx: &EffectsTuning, dt: f32, rng: &mut impl RandomSource) {
    let effects = &mut state.effects;
    if effects.camera_shake_timer <= 0.0 {
        return;
    }

    effects.camera_shake_timer = (effects.camera_shake_timer - dt).max(0.0);
    if effects.camera_shake_timer == 0.0 {
        effects.camera_shake_offset = Vec2::ZERO;
        return;
    }

    let intensity = fx.camera_shake_intensity * (effects.camera_shake_timer / fx.camera_shake_duration);
    effects.camera_shake_offset = Vec2::new(
        (rng.next_f32() - 0.5) * intensity * 2.0,
        (rng.next_f32() - 0.5) * intensity * 2.0,
    );
}

/// Drop a footstep particle every few frames while running on the ground
pub fn emit_trail(state: &mut RunState, fx: &EffectsTuning, frames: f32) {
    let player = &state.player;
    let artifacts = &mut state.artifacts;

    if player.is_jumping || player.y < player.rest_y() - 5.0 {
        artifacts.trail_frames = 0.0;
        return;
    }

    artifacts.trail_frames += frames;
    if artifacts.trail_frames >= fx.trail_spawn_interval {
        artifacts.trail_frames = 0.0;
        artifacts.trail.push(TrailParticle {
            pos: Vec2::new(player.x + player.width / 2.0, player.y + player.height - 10.0),
            age: 0.0,
            lifetime: fx.trail_lifetime,
            color: fx.trail_color,
        });
    }
}

/// Normalized hit flash strength (1.0 right after a hit, fading to 0)
pub fn hit_flash_intensity(state: &RunState, fx: &EffectsTuning) -> f32 {
    (state.effects.hit_flash_timer / fx.hit_flash_duration).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::SequenceRandom;
    use crate::sim::state::{BurstKind, FloatingText, PickupBurst};
    use crate::tuning::Tuning;

    #[test]
    fn test_artifacts_expire() {
        let tuning = Tuning::default();
        let mut state = RunState::running(&tuning);
        state.artifacts.bursts.push(PickupBurst {
            kind: BurstKind::Coin,
            pos: Vec2::ZERO,
            age: 0.0,
            lifetime: 0.25,
        });
        state.artifacts.texts.push(FloatingText {
            text: "Combo x1.5!".into(),
            pos: Vec2::new(0.0, 100.0),
            age: 0.0,
            lifetime: 1.0,
        });

        age_artifacts(&mut state, 0.2);
        assert_eq!(state.artifacts.bursts.len(), 1);
        assert!((state.artifacts.texts[0].pos.y - 94.0).abs() < 1e-4);

        age_artifacts(&mut state, 0.1);
        assert!(state.artifacts.bursts.is_empty());
        assert_eq!(state.artifacts.texts.len(), 1);

        age_artifacts(&mut state, 0.8);
        assert!(state.artifacts.texts.is_empty());
    }

    #[test]
    fn test_trail_every_interval_on_ground() {
        let mut tuning = Tuning::default();
        tuning.effects.trail_color = Some(0x00aaff);
        let mut state = RunState::running(&tuning);
        for _ in 0..14 {
            emit_trail(&mut state, &tuning.effects, 1.0);
        }
        assert_eq!(state.artifacts.trail.len(), 2);
        assert_eq!(state.artifacts.trail[0].color, Some(0x00aaff));

        state.player.is_jumping = true;
        for _ in 0..14 {
            emit_trail(&mut state, &tuning.effects, 1.0);
        }
        assert_eq!(state.artifacts.trail.len(), 2);
    }

    #[test]
    fn test_camera_shake_fades_out() {
        let tuning = Tuning::default();
        let mut state = RunState::running(&tuning);
        state.effects.camera_shake_timer = 0.25;
        let mut rng = SequenceRandom::constant(1.0);
        update_camera_shake(&mut state, &tuning.effects, 0.05, &mut rng);
        let offset = state.effects.camera_shake_offset;
        assert!(offset.x > 0.0 && offset.x <= 5.0);

        update_camera_shake(&mut state, &tuning.effects, 1.0, &mut rng);
        assert_eq!(state.effects.camera_shake_offset, Vec2::ZERO);
        assert_eq!(state.effects.camera_shake_timer, 0.0);
    }

    #[test]
    fn test_hit_flash_intensity() {
        let tuning = Tuning::default();
        let mut state = RunState::running(&tuning);
        assert_eq!(hit_flash_intensity(&state, &tuning.effects), 0.0);
        state.effects.hit_flash_timer = 0.1;
        assert!((hit_flash_intensity(&state, &tuning.effects) - 0.5).abs() < 1e-6);
    }
}
