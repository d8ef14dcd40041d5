//! Run simulation module
//!
//! All gameplay logic lives here. The module stays free of rendering and
//! platform concerns:
//! - One owned `RunState`, mutated phase by phase
//! - All randomness through an injected `RandomSource`
//! - Entities in dense vectors, pruned every frame
//! - World space for entities; screen space only at read time

pub mod collision;
pub mod effects;
pub mod physics;
pub mod progression;
pub mod random;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::HitOutcome;
pub use random::{RandomSource, SequenceRandom, entropy_rng};
pub use snapshot::{EntityView, PlayerView, Snapshot};
pub use state::{
    Aabb, BackgroundPhase, CoinColor, GameEvent, GamePhase, ObstacleKind, Player, PowerUpKind, RunState, RunStats,
};
pub use tick::{TickInput, tick, toggle_pause};
