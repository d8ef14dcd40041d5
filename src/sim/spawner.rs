//! Distance-gated, probabilistic spawning
//!
//! Each kind keeps a bookmark of the world offset at its last spawn. Once
//! the scrolled distance since that bookmark clears the kind's gap, a
//! probability roll decides whether something appears just past the right
//! edge of the viewport. The bookmark only moves on a successful spawn.

use super::random::RandomSource;
use super::state::{Coin, CoinColor, Heart, Obstacle, ObstacleKind, PowerUp, PowerUpKind, RunState};
use crate::consts::{COIN_HEIGHT_JITTER, SAFE_COIN_OBSTACLE_DISTANCE};
use crate::tuning::Tuning;
use glam::Vec2;

/// Normalized progress from initial to max speed, in [0, 1]
pub fn speed_factor(speed: f32, tuning: &Tuning) -> f32 {
    let range = tuning.speed.max_speed - tuning.speed.initial_speed;
    if range <= 0.0 {
        return 0.0;
    }
    ((speed - tuning.speed.initial_speed) / range).clamp(0.0, 1.0)
}

/// Required distance between obstacles; shrinks as speed rises
pub fn obstacle_gap(speed: f32, tuning: &Tuning) -> f32 {
    let o = &tuning.obstacles;
    o.min_gap + (o.max_gap - o.min_gap) * (1.0 - speed_factor(speed, tuning))
}

/// Probability of an obstacle once its gap is satisfied
pub fn obstacle_spawn_chance(speed: f32, tuning: &Tuning) -> f32 {
    let o = &tuning.obstacles;
    (o.base_spawn_chance + o.speed_spawn_factor * speed_factor(speed, tuning)).min(1.0)
}

/// World x where new entities appear (just off the right edge)
#[inline]
fn spawn_x(state: &RunState, tuning: &Tuning) -> f32 {
    tuning.viewport.width + state.world_offset
}

/// Roll for an obstacle. Returns the new obstacle's id on success.
pub fn try_spawn_obstacle(state: &mut RunState, tuning: &Tuning, rng: &mut impl RandomSource) -> Option<u32> {
    let distance = state.world_offset - state.bookmarks.obstacle;
    if distance < obstacle_gap(state.speed, tuning) {
        return None;
    }
    if !rng.chance(obstacle_spawn_chance(state.speed, tuning)) {
        return None;
    }

    let kind = ObstacleKind::from_roll(rng.next_f32());
    let size = kind.size();
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        kind,
        x: spawn_x(state, tuning),
        y: tuning.viewport.ground_y() - size.y,
        size,
    });
    state.bookmarks.obstacle = state.world_offset;
    Some(id)
}

/// Whether a coin at `x` would sit too close to a live obstacle
pub fn near_obstacle(state: &RunState, x: f32) -> bool {
    state
        .obstacles
        .iter()
        .any(|obs| (obs.x - x).abs() < SAFE_COIN_OBSTACLE_DISTANCE)
}

/// Roll for a coin. Returns the new coin's id on success.
pub fn try_spawn_coin(state: &mut RunState, tuning: &Tuning, rng: &mut impl RandomSource) -> Option<u32> {
    let c = &tuning.coins;
    let gap = rng.range(c.min_gap, c.max_gap);
    if state.world_offset - state.bookmarks.coin < gap {
        return None;
    }
    if !rng.chance(c.spawn_rate) {
        return None;
    }

    let x = spawn_x(state, tuning);
    if near_obstacle(state, x) {
        log::trace!("Coin rejected at x={x:.0}: too close to an obstacle");
        return None;
    }

    let color = if rng.chance(0.5) {
        CoinColor::Blue
    } else {
        CoinColor::Purple
    };
    let jitter = (rng.next_f32() - 0.5) * COIN_HEIGHT_JITTER;
    let id = state.next_entity_id();
    state.coins.push(Coin {
        id,
        color,
        x,
        y: tuning.viewport.ground_y() - c.float_height + jitter,
        size: Vec2::new(c.width, c.height),
    });
    state.bookmarks.coin = state.world_offset;
    Some(id)
}

/// Roll for a heart; never spawns at full health
pub fn try_spawn_heart(state: &mut RunState, tuning: &Tuning, rng: &mut impl RandomSource) -> Option<u32> {
    if state.lives >= state.max_lives {
        return None;
    }
    let h = &tuning.hearts;
    let gap = rng.range(h.min_gap, h.max_gap);
    if state.world_offset - state.bookmarks.heart < gap {
        return None;
    }
    if !rng.chance(h.spawn_rate) {
        return None;
    }

    let id = state.next_entity_id();
    state.hearts.push(Heart {
        id,
        x: spawn_x(state, tuning),
        y: tuning.viewport.ground_y() - h.float_height,
        size: Vec2::new(h.width, h.height),
    });
    state.bookmarks.heart = state.world_offset;
    Some(id)
}

/// Roll for a shield or magnet power-up
pub fn try_spawn_power_up(state: &mut RunState, tuning: &Tuning, rng: &mut impl RandomSource) -> Option<u32> {
    let p = &tuning.power_ups.spawn;
    let gap = rng.range(p.min_gap, p.max_gap);
    if state.world_offset - state.bookmarks.power_up < gap {
        return None;
    }
    if !rng.chance(p.spawn_rate) {
        return None;
    }

    let kind = if rng.chance(tuning.power_ups.shield_chance) {
        PowerUpKind::Shield
    } else {
        PowerUpKind::Magnet
    };
    let id = state.next_entity_id();
    state.power_ups.push(PowerUp {
        id,
        kind,
        x: spawn_x(state, tuning),
        y: tuning.viewport.ground_y() - p.float_height,
        size: Vec2::new(p.width, p.height),
    });
    state.bookmarks.power_up = state.world_offset;
    Some(id)
}

/// Spawn phase of a frame: at most one new entity per kind
pub fn step(state: &mut RunState, tuning: &Tuning, rng: &mut impl RandomSource) {
    try_spawn_obstacle(state, tuning, rng);
    try_spawn_coin(state, tuning, rng);
    try_spawn_heart(state, tuning, rng);
    try_spawn_power_up(state, tuning, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::SequenceRandom;

    fn state_at(offset: f32) -> (RunState, Tuning) {
        let tuning = Tuning::default();
        let mut state = RunState::running(&tuning);
        state.world_offset = offset;
        (state, tuning)
    }

    #[test]
    fn test_gap_shrinks_with_speed() {
        let tuning = Tuning::default();
        assert_eq!(obstacle_gap(12.0, &tuning), 650.0);
        assert_eq!(obstacle_gap(18.0, &tuning), 500.0);
        assert_eq!(obstacle_gap(24.0, &tuning), 350.0);
        assert_eq!(obstacle_gap(99.0, &tuning), 350.0);
        assert_eq!(obstacle_spawn_chance(24.0, &tuning), 1.0);
        assert!((obstacle_spawn_chance(12.0, &tuning) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_no_obstacle_before_gap() {
        let (mut state, tuning) = state_at(649.0);
        let mut rng = SequenceRandom::constant(0.0);
        assert!(try_spawn_obstacle(&mut state, &tuning, &mut rng).is_none());
        assert_eq!(rng.draws(), 0);
        assert_eq!(state.bookmarks.obstacle, 0.0);
    }

    #[test]
    fn test_obstacle_spawns_past_right_edge() {
        let (mut state, tuning) = state_at(700.0);
        // Pass the roll, then pick a terminal
        let mut rng = SequenceRandom::new(vec![0.1, 0.5]);
        let id = try_spawn_obstacle(&mut state, &tuning, &mut rng).unwrap();
        let obs = &state.obstacles[0];
        assert_eq!(obs.id, id);
        assert_eq!(obs.kind, ObstacleKind::Terminal);
        assert_eq!(obs.x, 1920.0 + 700.0);
        assert!((obs.y + obs.size.y - tuning.viewport.ground_y()).abs() < 1e-3);
        assert_eq!(state.bookmarks.obstacle, 700.0);
    }

    #[test]
    fn test_failed_roll_keeps_bookmark() {
        let (mut state, tuning) = state_at(700.0);
        let mut rng = SequenceRandom::constant(0.95);
        assert!(try_spawn_obstacle(&mut state, &tuning, &mut rng).is_none());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.bookmarks.obstacle, 0.0);
    }

    #[test]
    fn test_coin_rejected_near_obstacle() {
        let (mut state, tuning) = state_at(1000.0);
        state.obstacles.push(Obstacle {
            id: 99,
            kind: ObstacleKind::Barrier,
            x: 1920.0 + 1000.0 - 100.0,
            y: 874.0,
            size: ObstacleKind::Barrier.size(),
        });
        // gap roll 0 (220), spawn roll passes
        let mut rng = SequenceRandom::constant(0.0);
        assert!(try_spawn_coin(&mut state, &tuning, &mut rng).is_none());
        assert!(state.coins.is_empty());
        assert_eq!(state.bookmarks.coin, 0.0);
    }

    #[test]
    fn test_coin_spawns_clear_of_obstacles() {
        let (mut state, tuning) = state_at(1000.0);
        state.obstacles.push(Obstacle {
            id: 99,
            kind: ObstacleKind::Barrier,
            x: 1920.0 + 1000.0 - 400.0,
            y: 874.0,
            size: ObstacleKind::Barrier.size(),
        });
        // gap, spawn roll, color (<0.5 blue), jitter (0.75 -> +12.5)
        let mut rng = SequenceRandom::new(vec![0.0, 0.0, 0.2, 0.75]);
        try_spawn_coin(&mut state, &tuning, &mut rng).unwrap();
        let coin = &state.coins[0];
        assert_eq!(coin.color, CoinColor::Blue);
        assert!((coin.y - (tuning.viewport.ground_y() - 100.0 + 12.5)).abs() < 1e-3);
        assert_eq!(state.bookmarks.coin, 1000.0);
    }

    #[test]
    fn test_heart_never_spawns_at_full_lives() {
        let (mut state, tuning) = state_at(50_000.0);
        let mut rng = SequenceRandom::constant(0.0);
        for _ in 0..100 {
            assert!(try_spawn_heart(&mut state, &tuning, &mut rng).is_none());
        }
        assert!(state.hearts.is_empty());

        state.lives = 1;
        assert!(try_spawn_heart(&mut state, &tuning, &mut rng).is_some());
        assert_eq!(state.hearts.len(), 1);
    }

    #[test]
    fn test_power_up_kind_split() {
        let (mut state, tuning) = state_at(5000.0);
        // gap, spawn roll, kind roll < 0.5 => shield
        let mut rng = SequenceRandom::new(vec![0.0, 0.0, 0.3]);
        try_spawn_power_up(&mut state, &tuning, &mut rng).unwrap();
        assert_eq!(state.power_ups[0].kind, PowerUpKind::Shield);

        state.world_offset += 5000.0;
        let mut rng = SequenceRandom::new(vec![0.0, 0.0, 0.7]);
        try_spawn_power_up(&mut state, &tuning, &mut rng).unwrap();
        assert_eq!(state.power_ups[1].kind, PowerUpKind::Magnet);
    }

    #[test]
    fn test_step_spawns_at_most_one_per_kind() {
        let (mut state, tuning) = state_at(100_000.0);
        state.lives = 1;
        let mut rng = SequenceRandom::constant(0.0);
        step(&mut state, &tuning, &mut rng);
        assert_eq!(state.obstacles.len(), 1);
        // Coin lands on top of the fresh obstacle and is rejected
        assert_eq!(state.coins.len(), 0);
        assert_eq!(state.hearts.len(), 1);
        assert_eq!(state.power_ups.len(), 1);
    }
}
