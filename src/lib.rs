//! Base Runner - side-scrolling endless runner simulation core
//!
//! Core modules:
//! - `sim`: Frame simulation (physics, spawning, collisions, progression)
//! - `runner`: Host-facing frame driver (fixed timestep, pause, run summary)
//! - `tuning`: Data-driven game balance

pub mod runner;
pub mod sim;
pub mod tuning;

pub use runner::{RunListener, Runner};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the frame rate the tuning was balanced at)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Reference frame rate used to normalize per-frame tuning values
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest host frame delta accepted (seconds); longer gaps are clamped
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Entities are culled once their right edge passes this far left of the viewport
    pub const OFFSCREEN_CULL_BUFFER: f32 = 50.0;
    /// Width of one tile of the scrolling ground pattern
    pub const GROUND_PATTERN_WIDTH: f32 = 200.0;
    /// Seconds spent in each background phase
    pub const PHASE_DURATION_SECS: f32 = 120.0;
    /// Minimum world distance between a new coin and any live obstacle
    pub const SAFE_COIN_OBSTACLE_DISTANCE: f32 = 180.0;
    /// Vertical jitter range for coin float height (±half)
    pub const COIN_HEIGHT_JITTER: f32 = 50.0;

    /// Floating text rise speed (pixels/s)
    pub const FLOATING_TEXT_RISE_SPEED: f32 = 30.0;
    /// Floating text lifetime (seconds)
    pub const FLOATING_TEXT_LIFETIME: f32 = 1.0;
    /// Pickup burst lifetime (seconds)
    pub const PICKUP_BURST_LIFETIME: f32 = 0.25;
    /// Blink frequency of the invincible player sprite (toggles/s)
    pub const INVINCIBLE_BLINK_RATE: f32 = 15.0;

    /// Combo thresholds and the multiplier reached at each (ascending)
    pub const COMBO_TIERS: [(u32, f32); 3] = [(5, 1.5), (10, 2.0), (15, 3.0)];
    /// Multiplier below the first combo tier
    pub const BASE_MULTIPLIER: f32 = 1.0;
}

/// Clamp a host-measured frame delta (seconds) to a safe integration step.
///
/// Negative and NaN deltas become zero; anything longer than
/// [`consts::MAX_FRAME_DT`] (e.g. after a backgrounded tab) is capped.
#[inline]
pub fn clamp_frame_dt(dt: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        0.0
    } else {
        dt.min(consts::MAX_FRAME_DT)
    }
}

/// Convert seconds to reference frames (1.0 = one frame at 60 Hz)
#[inline]
pub fn secs_to_frames(secs: f32) -> f32 {
    secs * consts::REFERENCE_FPS
}
