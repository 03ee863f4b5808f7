//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable frame delta, clamped by the caller
//! - Seeded RNG only, carried in the state
//! - No rendering or platform dependencies

pub mod clock;
pub mod effects;
pub mod level;
pub mod occupancy;
pub mod particles;
pub mod resolve;
pub mod state;
pub mod tick;

pub use clock::{FrameClock, frame_delta};
pub use effects::{ActiveEffect, ActiveEffects, PowerUpKind, PowerUpSpec};
pub use level::LevelParams;
pub use occupancy::{
    circular_distance, find_safe_angle, first_conflict, is_safe, within_threshold,
};
pub use particles::{Particle, Tint};
pub use resolve::{Resolution, advance_projectile, resolve_arrival};
pub use state::{
    GameEvent, GamePhase, GameState, PendingPowerUp, PlacedPin, Projectile, ProjectileState,
    RingState, RunSummary, Spin,
};
pub use tick::{TickInput, advance_level, request_shoot, setup_level, start_game, tick};
