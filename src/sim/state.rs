//! Run state and entity model
//!
//! Everything a run mutates lives in one owned [`RunState`]; the frame
//! phases borrow it exclusively in turn.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Countdown before play; nothing simulates
    Starting,
    /// Active gameplay
    Running,
    /// Suspended; no time elapses
    Paused,
    /// Lives exhausted (terminal)
    Ended,
}

/// Background art cycle, advanced on a fixed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundPhase {
    Sunset,
    Daytime,
    Night,
}

impl BackgroundPhase {
    /// Round-robin phase for the given elapsed game time
    pub fn for_elapsed(elapsed_secs: f32) -> Self {
        let index = (elapsed_secs.max(0.0) / PHASE_DURATION_SECS).floor() as u64 % 3;
        match index {
            0 => BackgroundPhase::Sunset,
            1 => BackgroundPhase::Daytime,
            _ => BackgroundPhase::Night,
        }
    }
}

/// Axis-aligned rectangle in screen space (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}

/// The runner. X never changes; the world scrolls past.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity (pixels per reference frame, negative = up)
    pub velocity_y: f32,
    pub is_jumping: bool,
    pub is_jump_held: bool,
    /// Line the player's feet rest on
    pub ground_y: f32,
    /// Run-cycle bob, part of the collision box
    pub run_bob_offset: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let ground_y = tuning.viewport.ground_y() + tuning.player.ground_offset_y;
        Self {
            x: tuning.player.x,
            y: ground_y - tuning.player.height,
            width: tuning.player.width,
            height: tuning.player.height,
            velocity_y: 0.0,
            is_jumping: false,
            is_jump_held: false,
            ground_y,
            run_bob_offset: 0.0,
        }
    }

    /// Top edge when standing on the ground
    #[inline]
    pub fn rest_y(&self) -> f32 {
        self.ground_y - self.height
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        !self.is_jumping && self.y >= self.rest_y()
    }

    /// Collision box, including the run bob
    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.x, self.y + self.run_bob_offset, self.width, self.height)
    }
}

/// Obstacle art variants; each has a fixed footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Barrier,
    TrySign,
    AlienSign,
    Terminal,
    WarningSign,
}

impl ObstacleKind {
    /// Sprite footprint (width, height), tuned so the bottom sits on the ground line
    pub fn size(self) -> Vec2 {
        match self {
            ObstacleKind::Barrier => Vec2::new(66.0, 44.0),
            ObstacleKind::TrySign => Vec2::new(44.0, 131.0),
            ObstacleKind::AlienSign => Vec2::new(53.0, 131.0),
            ObstacleKind::Terminal => Vec2::new(57.0, 96.0),
            ObstacleKind::WarningSign => Vec2::new(70.0, 131.0),
        }
    }

    /// Weighted pick from a uniform roll in [0, 1)
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.40 {
            ObstacleKind::Barrier
        } else if roll < 0.65 {
            ObstacleKind::Terminal
        } else if roll < 0.80 {
            ObstacleKind::WarningSign
        } else if roll < 0.90 {
            ObstacleKind::AlienSign
        } else {
            ObstacleKind::TrySign
        }
    }
}

/// An obstacle, positioned in world space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// World-space left edge
    pub x: f32,
    pub y: f32,
    pub size: Vec2,
}

/// Coin variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinColor {
    Blue,
    Purple,
}

impl CoinColor {
    /// Base points before the combo multiplier
    pub fn base_points(self, tuning: &Tuning) -> u32 {
        match self {
            CoinColor::Blue => tuning.scoring.coin_score_blue,
            CoinColor::Purple => tuning.scoring.coin_score_purple,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub color: CoinColor,
    /// World-space left edge (moves while magnetized)
    pub x: f32,
    pub y: f32,
    pub size: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heart {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub size: Vec2,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Absorbs the next obstacle hit
    Shield,
    /// Pulls nearby coins toward the player for a while
    Magnet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub x: f32,
    pub y: f32,
    pub size: Vec2,
}

/// World-space rectangle to screen space: the camera is the scroll offset
#[inline]
pub fn screen_rect(world_x: f32, y: f32, size: Vec2, world_offset: f32) -> Aabb {
    Aabb::new(world_x - world_offset, y, size.x, size.y)
}

/// What a pickup burst celebrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstKind {
    Coin,
    Heart,
}

/// Short-lived sparkle where something was collected (screen space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupBurst {
    pub kind: BurstKind,
    pub pos: Vec2,
    pub age: f32,
    pub lifetime: f32,
}

/// Footstep particle left behind while running (screen space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailParticle {
    pub pos: Vec2,
    pub age: f32,
    pub lifetime: f32,
    /// Cosmetic tint (0xRRGGBB); renderer default when absent
    pub color: Option<u32>,
}

/// Rising label such as "Combo x1.5!" (screen space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub text: String,
    pub pos: Vec2,
    pub age: f32,
    pub lifetime: f32,
}

/// Visual-only artifacts; never collide
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artifacts {
    pub bursts: Vec<PickupBurst>,
    pub trail: Vec<TrailParticle>,
    pub texts: Vec<FloatingText>,
    /// Reference frames since the last trail particle
    pub trail_frames: f32,
}

/// Active power-up effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shield_active: bool,
    /// Seconds of magnet remaining (0 = inactive)
    pub magnet_timer: f32,
    /// Seconds of obstacle immunity remaining
    pub invincible_timer: f32,
    pub hit_flash_timer: f32,
    pub camera_shake_timer: f32,
    pub camera_shake_offset: Vec2,
}

impl ActiveEffects {
    #[inline]
    pub fn magnet_active(&self) -> bool {
        self.magnet_timer > 0.0
    }

    #[inline]
    pub fn invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }
}

/// World offset at the last successful spawn of each kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnBookmarks {
    pub obstacle: f32,
    pub coin: f32,
    pub heart: f32,
    pub power_up: f32,
}

/// Notifications for collaborators outside the core (HUD, sound, persistence)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    ScoreChanged(f64),
    LivesChanged(u8),
    MultiplierChanged(f32),
    BackgroundChanged(BackgroundPhase),
    CoinCollected { color: CoinColor, points: u32 },
    HeartCollected { restored: bool },
    PowerUpCollected(PowerUpKind),
    ShieldAbsorbedHit,
    PlayerHit { lives_left: u8 },
    Paused,
    Resumed,
    RunEnded,
}

/// Summary of a finished run, emitted once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub score: f64,
    pub coins_collected: u32,
    /// Final world offset
    pub distance: f32,
    pub max_combo: u32,
    /// Wall-clock seconds since the countdown finished
    pub time: f32,
}

/// Complete state of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: GamePhase,
    /// Seconds of countdown left while `Starting`
    pub countdown_remaining: f32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub hearts: Vec<Heart>,
    pub power_ups: Vec<PowerUp>,
    pub score: f64,
    pub lives: u8,
    pub max_lives: u8,
    pub combo: u32,
    pub max_combo: u32,
    /// Seconds since the last coin while a combo is running
    pub combo_timer: f32,
    pub multiplier: f32,
    pub coins_collected: u32,
    /// Cumulative scroll distance; camera origin and distance metric
    pub world_offset: f32,
    /// Ground tile scroll, wraps at the pattern width
    pub ground_offset: f32,
    /// Game seconds while running (pauses excluded)
    pub elapsed: f32,
    pub speed: f32,
    /// Peak score-derived speed; never decreases
    pub peak_speed: f32,
    /// Seconds left in the post-hit speed recovery ramp
    pub speed_recovery_timer: f32,
    pub background: BackgroundPhase,
    pub effects: ActiveEffects,
    pub bookmarks: SpawnBookmarks,
    #[serde(skip)]
    pub artifacts: Artifacts,
    /// Pending notifications. Hosts calling `tick` directly must drain
    /// them with [`RunState::drain_events`] each frame.
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl RunState {
    /// Fresh run, waiting on the countdown
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Starting,
            countdown_remaining: tuning.countdown.total_secs(),
            player: Player::new(tuning),
            obstacles: Vec::new(),
            coins: Vec::new(),
            hearts: Vec::new(),
            power_ups: Vec::new(),
            score: 0.0,
            lives: tuning.scoring.max_lives,
            max_lives: tuning.scoring.max_lives,
            combo: 0,
            max_combo: 0,
            combo_timer: 0.0,
            multiplier: BASE_MULTIPLIER,
            coins_collected: 0,
            world_offset: 0.0,
            ground_offset: 0.0,
            elapsed: 0.0,
            speed: tuning.speed.initial_speed,
            peak_speed: tuning.speed.initial_speed,
            speed_recovery_timer: 0.0,
            background: BackgroundPhase::Sunset,
            effects: ActiveEffects::default(),
            bookmarks: SpawnBookmarks::default(),
            artifacts: Artifacts::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Fresh run that skips the countdown
    pub fn running(tuning: &Tuning) -> Self {
        let mut state = Self::new(tuning);
        state.countdown_remaining = 0.0;
        state.phase = GamePhase::Running;
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Clear the combo streak and its multiplier together
    pub fn reset_combo(&mut self) {
        let had_multiplier = self.multiplier != BASE_MULTIPLIER;
        self.combo = 0;
        self.combo_timer = 0.0;
        self.multiplier = BASE_MULTIPLIER;
        if had_multiplier {
            self.events.push(GameEvent::MultiplierChanged(BASE_MULTIPLIER));
        }
    }

    /// Countdown number to display: 3, 2, 1, then 0 for "GO"
    pub fn countdown_display(&self, tuning: &Tuning) -> Option<u32> {
        if self.phase != GamePhase::Starting {
            return None;
        }
        let numbered = self.countdown_remaining - tuning.countdown.go_hold;
        if numbered > 0.0 {
            Some(numbered.ceil() as u32)
        } else {
            Some(0)
        }
    }

    /// Build the run summary; `wall_secs` is measured by the host driver
    pub fn stats(&self, wall_secs: f32) -> RunStats {
        RunStats {
            score: self.score,
            coins_collected: self.coins_collected,
            distance: self.world_offset,
            max_combo: self.max_combo,
            time: wall_secs,
        }
    }

    /// Take every pending notification, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn entity_count(&self) -> usize {
        self.obstacles.len() + self.coins.len() + self.hearts.len() + self.power_ups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_starts_on_ground() {
        let tuning = Tuning::default();
        let state = RunState::new(&tuning);
        assert_eq!(state.phase, GamePhase::Starting);
        assert_eq!(state.lives, 2);
        assert!(state.player.is_grounded());
        assert!((state.player.ground_y - 924.0).abs() < 1e-3);
        assert!((state.player.y + state.player.height - state.player.ground_y).abs() < 1e-3);
    }

    #[test]
    fn test_obstacle_weights() {
        assert_eq!(ObstacleKind::from_roll(0.0), ObstacleKind::Barrier);
        assert_eq!(ObstacleKind::from_roll(0.39), ObstacleKind::Barrier);
        assert_eq!(ObstacleKind::from_roll(0.40), ObstacleKind::Terminal);
        assert_eq!(ObstacleKind::from_roll(0.70), ObstacleKind::WarningSign);
        assert_eq!(ObstacleKind::from_roll(0.85), ObstacleKind::AlienSign);
        assert_eq!(ObstacleKind::from_roll(0.95), ObstacleKind::TrySign);
    }

    #[test]
    fn test_aabb_overlap_is_strict() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Aabb::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_background_cycle() {
        assert_eq!(BackgroundPhase::for_elapsed(0.0), BackgroundPhase::Sunset);
        assert_eq!(BackgroundPhase::for_elapsed(119.9), BackgroundPhase::Sunset);
        assert_eq!(BackgroundPhase::for_elapsed(120.0), BackgroundPhase::Daytime);
        assert_eq!(BackgroundPhase::for_elapsed(250.0), BackgroundPhase::Night);
        assert_eq!(BackgroundPhase::for_elapsed(360.0), BackgroundPhase::Sunset);
    }

    #[test]
    fn test_countdown_display() {
        let tuning = Tuning::default();
        let mut state = RunState::new(&tuning);
        assert_eq!(state.countdown_display(&tuning), Some(3));
        state.countdown_remaining = 2.5;
        assert_eq!(state.countdown_display(&tuning), Some(2));
        state.countdown_remaining = 0.5;
        assert_eq!(state.countdown_display(&tuning), Some(0));
    }

    #[test]
    fn test_reset_combo_clears_multiplier_together() {
        let tuning = Tuning::default();
        let mut state = RunState::running(&tuning);
        state.combo = 7;
        state.multiplier = 1.5;
        state.reset_combo();
        assert_eq!(state.combo, 0);
        assert_eq!(state.multiplier, 1.0);
        assert_eq!(state.events, vec![GameEvent::MultiplierChanged(1.0)]);
    }
}
