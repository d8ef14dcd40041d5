//! Data-driven game balance
//!
//! All tuning is supplied once when a run is constructed and never mutated
//! by the simulation. Defaults match the shipped game; a JSON file may
//! override any subset of values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl TuningError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TuningError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Player sprite geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Fixed screen x of the player's left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical bobbing amplitude while running (pixels)
    pub run_bob_amount: f32,
    /// Bob phase advance per pixel of world scroll
    pub run_bob_speed: f32,
    /// Player ground line sits this far below the obstacle ground line
    pub ground_offset_y: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            x: 200.0,
            width: 120.0,
            height: 220.0,
            run_bob_amount: 4.0,
            run_bob_speed: 0.12,
            ground_offset_y: 6.0,
        }
    }
}

/// Vertical motion, in pixels and reference frames
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Gravity while rising (velocity < 0)
    pub gravity_up: f32,
    /// Gravity while falling
    pub gravity_down: f32,
    pub max_fall_speed: f32,
    /// Initial jump velocity (negative = upward)
    pub jump_force: f32,
    /// Velocity a rising jump is clamped to when the button is released
    pub min_jump_height_cut_velocity: f32,
    pub jump_cut_enabled: bool,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity_up: 0.9,
            gravity_down: 0.35,
            max_fall_speed: 14.0,
            jump_force: -29.0,
            min_jump_height_cut_velocity: -7.0,
            jump_cut_enabled: true,
        }
    }
}

/// Scroll speed progression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTuning {
    /// Pixels per reference frame at run start
    pub initial_speed: f32,
    pub max_speed: f32,
    /// Speed gained per point of score
    pub speed_increase: f32,
    /// Fraction of peak speed lost when a life is lost
    pub speed_penalty_on_hit: f32,
    /// Seconds to ramp back to peak speed after a hit
    pub speed_recovery_duration: f32,
}

impl Default for SpeedTuning {
    fn default() -> Self {
        Self {
            initial_speed: 12.0,
            max_speed: 24.0,
            speed_increase: 0.002,
            speed_penalty_on_hit: 0.3,
            speed_recovery_duration: 3.0,
        }
    }
}

/// Score, lives and combo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    /// Passive score per reference frame at initial speed
    pub score_per_frame: f64,
    pub coin_score_blue: u32,
    pub coin_score_purple: u32,
    pub max_lives: u8,
    /// Seconds without a coin before the combo resets
    pub combo_timeout: f32,
    /// Seconds of obstacle immunity after losing a life
    pub invincibility_duration: f32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            score_per_frame: 0.1,
            coin_score_blue: 10,
            coin_score_purple: 20,
            max_lives: 2,
            combo_timeout: 3.0,
            invincibility_duration: 1.0,
        }
    }
}

/// Obstacle spacing and spawn odds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    /// Minimum world distance between obstacles (reached at max speed)
    pub min_gap: f32,
    /// Maximum world distance between obstacles (at initial speed)
    pub max_gap: f32,
    /// Spawn probability once the gap is satisfied
    pub base_spawn_chance: f32,
    /// Extra spawn probability at max speed
    pub speed_spawn_factor: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            min_gap: 350.0,
            max_gap: 650.0,
            base_spawn_chance: 0.7,
            speed_spawn_factor: 0.3,
        }
    }
}

/// Declares a pickup spawn table with its own shipped defaults, so a
/// tuning file can override any single field of one kind.
macro_rules! pickup_tuning {
    (
        $(#[$meta:meta])*
        $name:ident {
            spawn_rate: $rate:expr,
            min_gap: $min:expr,
            max_gap: $max:expr,
            width: $w:expr,
            height: $h:expr,
            float_height: $float:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            /// Probability of spawning per frame once the gap is satisfied
            pub spawn_rate: f32,
            pub min_gap: f32,
            pub max_gap: f32,
            pub width: f32,
            pub height: f32,
            /// Height above the ground line
            pub float_height: f32,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    spawn_rate: $rate,
                    min_gap: $min,
                    max_gap: $max,
                    width: $w,
                    height: $h,
                    float_height: $float,
                }
            }
        }

        impl $name {
            fn validate(&self, field: &'static str) -> Result<(), TuningError> {
                check_probability(field, self.spawn_rate)?;
                check_gap(field, self.min_gap, self.max_gap)?;
                if self.width <= 0.0 || self.height <= 0.0 {
                    return Err(TuningError::invalid(field, "size must be positive"));
                }
                Ok(())
            }
        }
    };
}

pickup_tuning! {
    /// Coin spawn table
    CoinTuning {
        spawn_rate: 0.002,
        min_gap: 220.0,
        max_gap: 380.0,
        width: 30.0,
        height: 30.0,
        float_height: 100.0,
    }
}

pickup_tuning! {
    /// Heart spawn table
    HeartTuning {
        spawn_rate: 0.001,
        min_gap: 600.0,
        max_gap: 1000.0,
        width: 30.0,
        height: 30.0,
        float_height: 80.0,
    }
}

pickup_tuning! {
    /// Power-up spawn table
    PowerUpSpawnTuning {
        spawn_rate: 0.0008,
        min_gap: 800.0,
        max_gap: 1200.0,
        width: 40.0,
        height: 40.0,
        float_height: 150.0,
    }
}

/// Power-up effects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    #[serde(flatten)]
    pub spawn: PowerUpSpawnTuning,
    /// Seconds a magnet stays active
    pub magnet_duration: f32,
    /// Probability that a spawned power-up is a shield (otherwise magnet)
    pub shield_chance: f32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            spawn: PowerUpSpawnTuning::default(),
            magnet_duration: 8.0,
            shield_chance: 0.5,
        }
    }
}

/// Magnet pull
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnetTuning {
    /// Center-to-center distance within which coins are pulled
    pub radius: f32,
    /// Fraction of the remaining distance covered each frame (0-1)
    pub pull_speed: f32,
}

impl Default for MagnetTuning {
    fn default() -> Self {
        Self {
            radius: 200.0,
            pull_speed: 0.15,
        }
    }
}

/// Hit feedback and cosmetic trail
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsTuning {
    pub hit_flash_duration: f32,
    pub camera_shake_duration: f32,
    /// Peak shake offset (pixels)
    pub camera_shake_intensity: f32,
    /// Reference frames between trail particles
    pub trail_spawn_interval: f32,
    pub trail_lifetime: f32,
    /// Optional trail tint (0xRRGGBB), chosen by the cosmetics shop
    pub trail_color: Option<u32>,
}

impl Default for EffectsTuning {
    fn default() -> Self {
        Self {
            hit_flash_duration: 0.2,
            camera_shake_duration: 0.25,
            camera_shake_intensity: 5.0,
            trail_spawn_interval: 7.0,
            trail_lifetime: 0.25,
            trail_color: None,
        }
    }
}

/// Logical viewport
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportTuning {
    pub width: f32,
    pub height: f32,
    /// Obstacle ground line as a fraction of viewport height
    pub ground_ratio: f32,
}

impl Default for ViewportTuning {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            ground_ratio: 0.85,
        }
    }
}

impl ViewportTuning {
    /// Y of the line obstacles and pickups are placed relative to
    pub fn ground_y(&self) -> f32 {
        self.height * self.ground_ratio
    }
}

/// Pre-run countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownTuning {
    /// Numbered seconds shown before the run (3, 2, 1)
    pub count: u32,
    /// Seconds the "GO" banner is held before play starts
    pub go_hold: f32,
}

impl Default for CountdownTuning {
    fn default() -> Self {
        Self {
            count: 3,
            go_hold: 1.0,
        }
    }
}

impl CountdownTuning {
    pub fn total_secs(&self) -> f32 {
        self.count as f32 + self.go_hold
    }
}

/// Complete tuning set for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub physics: PhysicsTuning,
    pub speed: SpeedTuning,
    pub scoring: ScoringTuning,
    pub obstacles: ObstacleTuning,
    pub coins: CoinTuning,
    pub hearts: HeartTuning,
    pub power_ups: PowerUpTuning,
    pub magnet: MagnetTuning,
    pub effects: EffectsTuning,
    pub viewport: ViewportTuning,
    pub countdown: CountdownTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            physics: PhysicsTuning::default(),
            speed: SpeedTuning::default(),
            scoring: ScoringTuning::default(),
            obstacles: ObstacleTuning::default(),
            coins: CoinTuning::default(),
            hearts: HeartTuning::default(),
            power_ups: PowerUpTuning::default(),
            magnet: MagnetTuning::default(),
            effects: EffectsTuning::default(),
            viewport: ViewportTuning::default(),
            countdown: CountdownTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.physics;
        if p.gravity_up <= 0.0 || p.gravity_down <= 0.0 {
            return Err(TuningError::invalid("physics.gravity", "must be positive"));
        }
        if p.max_fall_speed <= 0.0 {
            return Err(TuningError::invalid("physics.max_fall_speed", "must be positive"));
        }
        if p.jump_force >= 0.0 {
            return Err(TuningError::invalid("physics.jump_force", "must be negative (upward)"));
        }

        let s = &self.speed;
        if s.initial_speed <= 0.0 {
            return Err(TuningError::invalid("speed.initial_speed", "must be positive"));
        }
        if s.max_speed <= s.initial_speed {
            return Err(TuningError::invalid(
                "speed.max_speed",
                format!("must exceed initial_speed ({})", s.initial_speed),
            ));
        }
        check_non_negative("speed.speed_increase", s.speed_increase)?;
        check_probability("speed.speed_penalty_on_hit", s.speed_penalty_on_hit)?;
        check_positive("speed.speed_recovery_duration", s.speed_recovery_duration)?;

        if self.scoring.max_lives == 0 {
            return Err(TuningError::invalid("scoring.max_lives", "must be at least 1"));
        }
        check_positive("scoring.combo_timeout", self.scoring.combo_timeout)?;
        check_non_negative("scoring.invincibility_duration", self.scoring.invincibility_duration)?;

        check_gap("obstacles", self.obstacles.min_gap, self.obstacles.max_gap)?;
        check_probability("obstacles.base_spawn_chance", self.obstacles.base_spawn_chance)?;

        self.coins.validate("coins")?;
        self.hearts.validate("hearts")?;
        self.power_ups.spawn.validate("power_ups")?;
        check_probability("power_ups.shield_chance", self.power_ups.shield_chance)?;
        check_positive("power_ups.magnet_duration", self.power_ups.magnet_duration)?;
        check_positive("magnet.radius", self.magnet.radius)?;
        check_probability("magnet.pull_speed", self.magnet.pull_speed)?;

        let e = &self.effects;
        check_positive("effects.hit_flash_duration", e.hit_flash_duration)?;
        check_positive("effects.camera_shake_duration", e.camera_shake_duration)?;
        check_positive("effects.trail_spawn_interval", e.trail_spawn_interval)?;

        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(TuningError::invalid("viewport", "must have a positive size"));
        }
        check_non_negative("countdown.go_hold", self.countdown.go_hold)?;
        Ok(())
    }
}

fn check_probability(field: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::invalid(field, format!("{value} is outside [0, 1]")))
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::invalid(field, format!("{value} must be positive")))
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::invalid(field, format!("{value} must not be negative")))
    }
}

fn check_gap(field: &'static str, min: f32, max: f32) -> Result<(), TuningError> {
    if min < 0.0 || max < min {
        Err(TuningError::invalid(
            field,
            format!("gap range {min}..{max} is inverted or negative"),
        ))
    } else {
        Ok(())
    }
}
