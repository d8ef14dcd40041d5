//! Render snapshot
//!
//! A read-only view of one frame in screen coordinates. Renderers get
//! everything they need here and never touch [`RunState`] directly, so
//! placeholder rectangles are enough when sprites are missing.

use glam::Vec2;
use serde::Serialize;

use super::effects::hit_flash_intensity;
use super::state::{
    Aabb, BackgroundPhase, CoinColor, FloatingText, GamePhase, ObstacleKind, PickupBurst, PowerUpKind, RunState,
    TrailParticle, screen_rect,
};
use crate::consts::INVINCIBLE_BLINK_RATE;
use crate::tuning::Tuning;

/// Player pose for drawing
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    /// Hitbox including the run bob
    pub rect: Aabb,
    pub velocity_y: f32,
    pub is_jumping: bool,
    pub is_jump_held: bool,
    pub invincible: bool,
    /// False on the off-beats of the invincibility blink
    pub visible: bool,
}

/// One entity in screen space
#[derive(Debug, Clone, Serialize)]
pub struct EntityView<K> {
    pub id: u32,
    pub kind: K,
    pub rect: Aabb,
}

/// Everything drawable for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub player: PlayerView,
    pub obstacles: Vec<EntityView<ObstacleKind>>,
    pub coins: Vec<EntityView<CoinColor>>,
    pub hearts: Vec<EntityView<()>>,
    pub power_ups: Vec<EntityView<PowerUpKind>>,
    pub score: f64,
    pub lives: u8,
    pub multiplier: f32,
    pub combo: u32,
    pub speed: f32,
    pub distance: f32,
    pub background: BackgroundPhase,
    pub ground_offset: f32,
    pub shield_active: bool,
    pub magnet_active: bool,
    pub magnet_remaining: f32,
    /// 0..1, 1 right after a hit
    pub hit_flash: f32,
    pub camera_shake: Vec2,
    pub bursts: Vec<PickupBurst>,
    pub trail: Vec<TrailParticle>,
    pub texts: Vec<FloatingText>,
}

impl Snapshot {
    pub fn capture(state: &RunState, tuning: &Tuning) -> Self {
        let offset = state.world_offset;
        let effects = &state.effects;
        let invincible = effects.invincible();
        let blink_on = (effects.invincible_timer * INVINCIBLE_BLINK_RATE).floor() as i64 % 2 == 0;

        Self {
            phase: state.phase,
            player: PlayerView {
                rect: state.player.hitbox(),
                velocity_y: state.player.velocity_y,
                is_jumping: state.player.is_jumping,
                is_jump_held: state.player.is_jump_held,
                invincible,
                visible: !(invincible && blink_on),
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| EntityView {
                    id: o.id,
                    kind: o.kind,
                    rect: screen_rect(o.x, o.y, o.size, offset),
                })
                .collect(),
            coins: state
                .coins
                .iter()
                .map(|c| EntityView {
                    id: c.id,
                    kind: c.color,
                    rect: screen_rect(c.x, c.y, c.size, offset),
                })
                .collect(),
            hearts: state
                .hearts
                .iter()
                .map(|h| EntityView {
                    id: h.id,
                    kind: (),
                    rect: screen_rect(h.x, h.y, h.size, offset),
                })
                .collect(),
            power_ups: state
                .power_ups
                .iter()
                .map(|p| EntityView {
                    id: p.id,
                    kind: p.kind,
                    rect: screen_rect(p.x, p.y, p.size, offset),
                })
                .collect(),
            score: state.score,
            lives: state.lives,
            multiplier: state.multiplier,
            combo: state.combo,
            speed: state.speed,
            distance: state.world_offset,
            background: state.background,
            ground_offset: state.ground_offset,
            shield_active: effects.shield_active,
            magnet_active: effects.magnet_active(),
            magnet_remaining: effects.magnet_timer,
            hit_flash: hit_flash_intensity(state, &tuning.effects),
            camera_shake: effects.camera_shake_offset,
            bursts: state.artifacts.bursts.clone(),
            trail: state.artifacts.trail.clone(),
            texts: state.artifacts.texts.clone(),
        }
    }

    /// JSON encoding for out-of-process renderers
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;

    #[test]
    fn test_entities_in_screen_space() {
        let tuning = Tuning::default();
        let mut state = RunState::running(&tuning);
        state.world_offset = 500.0;
        state.obstacles.push(Obstacle {
            id: 7,
            kind: ObstacleKind::Terminal,
            x: 1200.0,
            y: 822.0,
            size: ObstacleKind::Terminal.size(),
        });
        let snap = Snapshot::capture(&state, &tuning);
        assert_eq!(snap.obstacles[0].id, 7);
        assert_eq!(snap.obstacles[0].rect.pos.x, 700.0);
        // World coordinates are untouched
        assert_eq!(state.obstacles[0].x, 1200.0);
    }

    #[test]
    fn test_invincible_blink() {
        let tuning = Tuning::default();
        let mut state = RunState::running(&tuning);
        let snap = Snapshot::capture(&state, &tuning);
        assert!(snap.player.visible && !snap.player.invincible);

        state.effects.invincible_timer = 0.9;
        let snap = Snapshot::capture(&state, &tuning);
        assert!(snap.player.invincible);
        // 0.9 * 15 = 13.5 -> odd beat, visible
        assert!(snap.player.visible);
        state.effects.invincible_timer = 0.7;
        assert!(!Snapshot::capture(&state, &tuning).player.visible);
    }

    #[test]
    fn test_snapshot_serializes() {
        let tuning = Tuning::default();
        let state = RunState::running(&tuning);
        let json = Snapshot::capture(&state, &tuning).to_json().unwrap();
        assert!(json.contains("\"lives\":2"));
        assert!(json.contains("\"background\":\"Sunset\""));
    }
}
