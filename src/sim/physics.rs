//! Vertical player motion and world scrolling
//!
//! Velocities are in pixels per reference frame (1/60 s); `frames` is the
//! elapsed time expressed in those units.

use super::state::{Player, RunState};
use crate::consts::GROUND_PATTERN_WIDTH;
use crate::tuning::{PhysicsTuning, PlayerTuning};

/// Start a jump if standing on the ground. Returns whether the jump began.
pub fn start_jump(player: &mut Player, physics: &PhysicsTuning) -> bool {
    if !player.is_grounded() {
        return false;
    }
    player.velocity_y = physics.jump_force;
    player.is_jumping = true;
    player.is_jump_held = true;
    true
}

/// Jump button released: cut a rising jump short for a quick tap
pub fn release_jump(player: &mut Player, physics: &PhysicsTuning) {
    player.is_jump_held = false;
    if physics.jump_cut_enabled && player.velocity_y < physics.min_jump_height_cut_velocity {
        player.velocity_y = physics.min_jump_height_cut_velocity;
    }
}

/// Integrate the player for `frames` reference frames
pub fn integrate_player(player: &mut Player, physics: &PhysicsTuning, frames: f32) {
    player.y += player.velocity_y * frames;

    // Snappy takeoff, floaty fall
    let gravity = if player.velocity_y < 0.0 {
        physics.gravity_up
    } else {
        physics.gravity_down
    };
    player.velocity_y = (player.velocity_y + gravity * frames).min(physics.max_fall_speed);

    if player.y >= player.rest_y() {
        player.y = player.rest_y();
        player.velocity_y = 0.0;
        player.is_jumping = false;
        player.is_jump_held = false;
    }
}

/// Run-cycle bob for the current scroll position (zero while airborne)
pub fn run_bob(player: &Player, world_offset: f32, tuning: &PlayerTuning) -> f32 {
    if player.is_jumping {
        0.0
    } else {
        (world_offset * tuning.run_bob_speed).sin() * tuning.run_bob_amount
    }
}

/// Advance the camera by the current speed
pub fn scroll_world(state: &mut RunState, frames: f32) {
    let distance = state.speed * frames;
    state.world_offset += distance;
    state.ground_offset = (state.ground_offset + distance).rem_euclid(GROUND_PATTERN_WIDTH);
}

/// Player motion phase of a frame: integrate, scroll, then refresh the bob
pub fn step(state: &mut RunState, physics: &PhysicsTuning, player_tuning: &PlayerTuning, frames: f32) {
    integrate_player(&mut state.player, physics, frames);
    scroll_world(state, frames);
    state.player.run_bob_offset = run_bob(&state.player, state.world_offset, player_tuning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn grounded_player() -> (Player, Tuning) {
        let tuning = Tuning::default();
        (Player::new(&tuning), tuning)
    }

    #[test]
    fn test_jump_only_from_ground() {
        let (mut player, tuning) = grounded_player();
        assert!(start_jump(&mut player, &tuning.physics));
        assert_eq!(player.velocity_y, -29.0);
        assert!(player.is_jumping && player.is_jump_held);

        integrate_player(&mut player, &tuning.physics, 1.0);
        let vy = player.velocity_y;
        assert!(!start_jump(&mut player, &tuning.physics));
        assert_eq!(player.velocity_y, vy);
    }

    #[test]
    fn test_jump_cut_shortens_rising_jump() {
        let (mut player, tuning) = grounded_player();
        start_jump(&mut player, &tuning.physics);
        integrate_player(&mut player, &tuning.physics, 1.0);
        assert!(player.velocity_y < -7.0);

        release_jump(&mut player, &tuning.physics);
        assert_eq!(player.velocity_y, -7.0);
        assert!(!player.is_jump_held);
    }

    #[test]
    fn test_late_release_is_noop() {
        let (mut player, tuning) = grounded_player();
        start_jump(&mut player, &tuning.physics);
        // Rise until past the cut threshold
        while player.velocity_y < -7.0 {
            integrate_player(&mut player, &tuning.physics, 1.0);
        }
        let vy = player.velocity_y;
        release_jump(&mut player, &tuning.physics);
        assert_eq!(player.velocity_y, vy);
    }

    #[test]
    fn test_jump_cut_disabled() {
        let (mut player, mut tuning) = grounded_player();
        tuning.physics.jump_cut_enabled = false;
        start_jump(&mut player, &tuning.physics);
        release_jump(&mut player, &tuning.physics);
        assert_eq!(player.velocity_y, -29.0);
    }

    #[test]
    fn test_jump_lands_and_clears_flags() {
        let (mut player, tuning) = grounded_player();
        let rest = player.rest_y();
        start_jump(&mut player, &tuning.physics);
        let mut apex = rest;
        for _ in 0..600 {
            integrate_player(&mut player, &tuning.physics, 1.0);
            apex = apex.min(player.y);
            if !player.is_jumping {
                break;
            }
        }
        assert!(apex < rest - 100.0);
        assert_eq!(player.y, rest);
        assert_eq!(player.velocity_y, 0.0);
        assert!(!player.is_jumping && !player.is_jump_held);
    }

    #[test]
    fn test_fall_speed_clamped() {
        let (mut player, tuning) = grounded_player();
        player.is_jumping = true;
        player.y = -10_000.0;
        for _ in 0..200 {
            integrate_player(&mut player, &tuning.physics, 1.0);
        }
        assert_eq!(player.velocity_y, tuning.physics.max_fall_speed);
    }

    #[test]
    fn test_bob_only_on_ground() {
        let (mut player, tuning) = grounded_player();
        let bob = run_bob(&player, 10.0, &tuning.player);
        assert!((bob - (1.2f32).sin() * 4.0).abs() < 1e-5);
        player.is_jumping = true;
        assert_eq!(run_bob(&player, 10.0, &tuning.player), 0.0);
    }

    #[test]
    fn test_ground_offset_wraps() {
        let tuning = Tuning::default();
        let mut state = RunState::running(&tuning);
        state.speed = 150.0;
        scroll_world(&mut state, 1.0);
        scroll_world(&mut state, 1.0);
        assert_eq!(state.world_offset, 300.0);
        assert_eq!(state.ground_offset, 100.0);
    }

    proptest! {
        #[test]
        fn ascent_decelerates_faster_than_descent_accelerates(
            frames in 0.01f32..6.0,
            up in 0.5f32..2.0,
            ratio in 0.1f32..0.9,
        ) {
            let tuning = Tuning::default();
            let mut physics = tuning.physics.clone();
            physics.gravity_up = up;
            physics.gravity_down = up * ratio;
            physics.max_fall_speed = 1000.0;

            let mut rising = Player::new(&tuning);
            rising.is_jumping = true;
            rising.y = 0.0;
            rising.velocity_y = -20.0;
            integrate_player(&mut rising, &physics, frames);
            let ascent_change = rising.velocity_y - (-20.0);

            let mut falling = Player::new(&tuning);
            falling.is_jumping = true;
            falling.y = 0.0;
            falling.velocity_y = 1.0;
            integrate_player(&mut falling, &physics, frames);
            let descent_change = falling.velocity_y - 1.0;

            prop_assert!(ascent_change > descent_change);
        }

        #[test]
        fn world_offset_never_decreases(speed in 0.0f32..50.0, frames in 0.0f32..6.0) {
            let tuning = Tuning::default();
            let mut state = RunState::running(&tuning);
            state.world_offset = 1234.0;
            state.speed = speed;
            let before = state.world_offset;
            scroll_world(&mut state, frames);
            prop_assert!(state.world_offset >= before);
            prop_assert!((0.0..GROUND_PATTERN_WIDTH).contains(&state.ground_offset));
        }
    }
}
