//! Collision detection and resolution
//!
//! Every live entity is tested against the player's hitbox (bob included)
//! in screen space. Kinds are resolved in a fixed order: obstacles, coins,
//! hearts, power-ups. Consumed entities and anything scrolled off the left
//! edge are removed in the same pass.

use glam::Vec2;

use super::progression::{multiplier_for_combo, recovery_speed};
use super::state::{
    Aabb, BurstKind, CoinColor, FloatingText, GameEvent, PickupBurst, PowerUpKind, RunState, screen_rect,
};
use crate::consts::*;
use crate::tuning::Tuning;

/// Result of the player touching an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Shield took the hit; no life lost
    Absorbed,
    /// A life was lost; `lives_left` may be zero
    LifeLost { lives_left: u8 },
}

/// Whether a screen rectangle has scrolled out past the left edge
#[inline]
pub fn is_offscreen(rect: &Aabb) -> bool {
    rect.right() < -OFFSCREEN_CULL_BUFFER
}

/// Apply an obstacle hit to the run (caller checks invincibility)
pub fn apply_obstacle_hit(state: &mut RunState, tuning: &Tuning) -> HitOutcome {
    let fx = &tuning.effects;

    if state.effects.shield_active {
        state.effects.shield_active = false;
        state.effects.hit_flash_timer = fx.hit_flash_duration * 0.5;
        state.effects.camera_shake_timer = fx.camera_shake_duration * 0.5;
        state.events.push(GameEvent::ShieldAbsorbedHit);
        log::debug!("Shield absorbed a hit");
        return HitOutcome::Absorbed;
    }

    state.lives = state.lives.saturating_sub(1);
    state.reset_combo();
    state.events.push(GameEvent::LivesChanged(state.lives));
    state.events.push(GameEvent::PlayerHit {
        lives_left: state.lives,
    });
    log::debug!("Player hit, {} lives left", state.lives);

    if state.lives > 0 {
        state.effects.invincible_timer = tuning.scoring.invincibility_duration;
        state.speed_recovery_timer = tuning.speed.speed_recovery_duration;
        if let Some(slowed) = recovery_speed(state.peak_speed, state.speed_recovery_timer, tuning) {
            state.speed = slowed;
        }
        state.effects.hit_flash_timer = fx.hit_flash_duration;
        state.effects.camera_shake_timer = fx.camera_shake_duration;
    }

    HitOutcome::LifeLost {
        lives_left: state.lives,
    }
}

/// Resolve obstacles against the player and cull passed ones
pub fn resolve_obstacles(state: &mut RunState, tuning: &Tuning) -> Vec<HitOutcome> {
    let hitbox = state.player.hitbox();
    let offset = state.world_offset;

    let touching: Vec<u32> = state
        .obstacles
        .iter()
        .filter(|obs| screen_rect(obs.x, obs.y, obs.size, offset).overlaps(&hitbox))
        .map(|obs| obs.id)
        .collect();

    let mut outcomes = Vec::new();
    let mut consumed = Vec::new();
    for id in touching {
        // Invincibility is re-checked per obstacle: a hit grants it mid-pass
        if state.effects.invincible() || state.lives == 0 {
            continue;
        }
        outcomes.push(apply_obstacle_hit(state, tuning));
        consumed.push(id);
    }

    state.obstacles.retain(|obs| {
        !consumed.contains(&obs.id) && !is_offscreen(&screen_rect(obs.x, obs.y, obs.size, offset))
    });
    outcomes
}

/// Credit a collected coin: combo, multiplier tier, points, feedback
pub fn collect_coin(state: &mut RunState, tuning: &Tuning, color: CoinColor, at: Vec2) -> u32 {
    state.combo += 1;
    state.combo_timer = 0.0;
    state.max_combo = state.max_combo.max(state.combo);

    let previous = state.multiplier;
    let multiplier = multiplier_for_combo(state.combo);
    if multiplier > previous {
        let hitbox = state.player.hitbox();
        state.artifacts.texts.push(FloatingText {
            text: format!("Combo x{multiplier:.1}!"),
            pos: Vec2::new(hitbox.center().x, hitbox.pos.y),
            age: 0.0,
            lifetime: FLOATING_TEXT_LIFETIME,
        });
    }
    if multiplier != previous {
        state.events.push(GameEvent::MultiplierChanged(multiplier));
    }
    state.multiplier = multiplier;

    let points = (color.base_points(tuning) as f32 * multiplier).floor() as u32;
    state.score += points as f64;
    state.coins_collected += 1;
    state.artifacts.bursts.push(PickupBurst {
        kind: BurstKind::Coin,
        pos: at,
        age: 0.0,
        lifetime: PICKUP_BURST_LIFETIME,
    });
    state.events.push(GameEvent::CoinCollected { color, points });
    state.events.push(GameEvent::ScoreChanged(state.score));
    points
}

/// Magnet pull, then pickup test, for every coin
pub fn resolve_coins(state: &mut RunState, tuning: &Tuning) -> u32 {
    let hitbox = state.player.hitbox();
    let player_center = hitbox.center();
    let offset = state.world_offset;
    let magnet = state.effects.magnet_active();
    let radius = tuning.magnet.radius;
    let pull = tuning.magnet.pull_speed;

    let mut collected: Vec<(u32, CoinColor, Vec2)> = Vec::new();
    for coin in &mut state.coins {
        if magnet {
            let center = screen_rect(coin.x, coin.y, coin.size, offset).center();
            let delta = player_center - center;
            if delta.length() < radius {
                // Exponential approach; translation is the same in world and screen space
                coin.x += delta.x * pull;
                coin.y += delta.y * pull;
            }
        }
        let rect = screen_rect(coin.x, coin.y, coin.size, offset);
        if rect.overlaps(&hitbox) {
            collected.push((coin.id, coin.color, rect.center()));
        }
    }

    for &(_, color, at) in &collected {
        collect_coin(state, tuning, color, at);
    }

    state.coins.retain(|coin| {
        !collected.iter().any(|(id, _, _)| *id == coin.id)
            && !is_offscreen(&screen_rect(coin.x, coin.y, coin.size, offset))
    });
    collected.len() as u32
}

/// Hearts restore lives to max; at full health the pickup is a no-op but still consumed
pub fn resolve_hearts(state: &mut RunState) -> u32 {
    let hitbox = state.player.hitbox();
    let offset = state.world_offset;

    let touched: Vec<(u32, Vec2)> = state
        .hearts
        .iter()
        .map(|h| (h.id, screen_rect(h.x, h.y, h.size, offset)))
        .filter(|(_, rect)| rect.overlaps(&hitbox))
        .map(|(id, rect)| (id, rect.center()))
        .collect();

    for &(_, at) in &touched {
        let restored = state.lives < state.max_lives;
        if restored {
            state.lives = state.max_lives;
            state.events.push(GameEvent::LivesChanged(state.lives));
        }
        state.artifacts.bursts.push(PickupBurst {
            kind: BurstKind::Heart,
            pos: at,
            age: 0.0,
            lifetime: PICKUP_BURST_LIFETIME,
        });
        state.events.push(GameEvent::HeartCollected { restored });
    }

    state.hearts.retain(|h| {
        !touched.iter().any(|(id, _)| *id == h.id) && !is_offscreen(&screen_rect(h.x, h.y, h.size, offset))
    });
    touched.len() as u32
}

/// Activate shield or magnet on pickup
pub fn resolve_power_ups(state: &mut RunState, tuning: &Tuning) -> u32 {
    let hitbox = state.player.hitbox();
    let offset = state.world_offset;

    let touched: Vec<(u32, PowerUpKind)> = state
        .power_ups
        .iter()
        .filter(|p| screen_rect(p.x, p.y, p.size, offset).overlaps(&hitbox))
        .map(|p| (p.id, p.kind))
        .collect();

    for &(_, kind) in &touched {
        match kind {
            PowerUpKind::Shield => state.effects.shield_active = true,
            PowerUpKind::Magnet => state.effects.magnet_timer = tuning.power_ups.magnet_duration,
        }
        state.events.push(GameEvent::PowerUpCollected(kind));
    }

    state.power_ups.retain(|p| {
        !touched.iter().any(|(id, _)| *id == p.id) && !is_offscreen(&screen_rect(p.x, p.y, p.size, offset))
    });
    touched.len() as u32
}

/// Collision phase of a frame. Stops early once the last life is gone.
pub fn step(state: &mut RunState, tuning: &Tuning) {
    resolve_obstacles(state, tuning);
    if state.lives == 0 {
        return;
    }
    resolve_coins(state, tuning);
    resolve_hearts(state);
    resolve_power_ups(state, tuning);
}
