//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a level table can be
//! swapped from JSON without touching gameplay code. Rates are per frame unit
//! (1/60 s); lengths are logical arena units.

use serde::{Deserialize, Serialize};

use crate::persistence::PersistError;

/// How the Shield effect runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShieldPolicy {
    /// Lasts until it absorbs a collision
    #[default]
    Consumable,
    /// Decays like the other effects, using the Shield duration
    Timed,
}

/// When power-ups may appear on the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerUpSpawnPolicy {
    /// One roll per level, at level setup
    #[default]
    LevelStart,
    /// A roll at level setup and another after every successful placement
    EveryPlacement,
}

/// Balance table for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Geometry ===
    /// Side of the square logical arena
    pub arena_size: f32,
    pub ring_radius_ratio: f32,
    pub pin_length_ratio: f32,
    pub pin_head_radius_ratio: f32,

    // === Physics ===
    /// Projectile speed (units per frame)
    pub pin_fly_speed: f32,
    pub ring_speed_base: f32,
    pub ring_speed_increment: f32,
    pub ring_speed_max: f32,
    /// Minimum angular separation between a landing pin and any placed pin
    pub collision_threshold: f32,

    // === Levels ===
    pub initial_pins: u32,
    pub pin_increment: u32,
    pub max_pins: u32,
    /// Levels past this index reuse its parameters
    pub max_level_index: u32,

    // === Scoring ===
    pub score_per_pin: u32,
    pub bonus_multiplier: f32,

    // === Power-ups ===
    pub power_up_chance: f32,
    pub power_up_chance_increment: f32,
    pub power_up_chance_max: f32,
    pub power_up_spawn_attempts: u32,
    pub slow_factor: f32,
    pub slow_duration: f32,
    pub shield_duration: f32,
    pub multiplier_duration: f32,
    pub shield_policy: ShieldPolicy,
    pub spawn_policy: PowerUpSpawnPolicy,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_size: 600.0,
            ring_radius_ratio: 0.35,
            pin_length_ratio: 0.12,
            pin_head_radius_ratio: 0.018,

            pin_fly_speed: 18.0,
            ring_speed_base: 0.004,
            ring_speed_increment: 0.0006,
            ring_speed_max: 0.018,
            collision_threshold: 0.1,

            initial_pins: 8,
            pin_increment: 3,
            max_pins: 25,
            max_level_index: 10,

            score_per_pin: 10,
            bonus_multiplier: 2.5,

            power_up_chance: 0.25,
            power_up_chance_increment: 0.04,
            power_up_chance_max: 0.7,
            power_up_spawn_attempts: 10,
            slow_factor: 0.5,
            slow_duration: 500.0,
            shield_duration: 1.0,
            multiplier_duration: 400.0,
            shield_policy: ShieldPolicy::Consumable,
            spawn_policy: PowerUpSpawnPolicy::LevelStart,
        }
    }
}

impl Tuning {
    /// Parse a tuning table; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject tables the simulation can't run with
    pub fn validate(&self) -> Result<(), PersistError> {
        let positive = [
            ("arena_size", self.arena_size),
            ("ring_radius_ratio", self.ring_radius_ratio),
            ("pin_length_ratio", self.pin_length_ratio),
            ("pin_fly_speed", self.pin_fly_speed),
            ("collision_threshold", self.collision_threshold),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PersistError::InvalidTuning(format!("{name} must be > 0")));
            }
        }
        if self.initial_pins == 0 || self.max_pins == 0 {
            return Err(PersistError::InvalidTuning(
                "levels need at least one pin".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.power_up_chance_max) {
            return Err(PersistError::InvalidTuning(
                "power_up_chance_max must be within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn ring_radius(&self) -> f32 {
        self.arena_size * self.ring_radius_ratio
    }

    #[inline]
    pub fn pin_length(&self) -> f32 {
        self.arena_size * self.pin_length_ratio
    }

    #[inline]
    pub fn pin_head_radius(&self) -> f32 {
        self.arena_size * self.pin_head_radius_ratio
    }

    /// Head offset of a freshly loaded projectile, measured from the ring
    /// center along the shot axis (negative = below the center)
    #[inline]
    pub fn projectile_spawn_offset(&self) -> f32 {
        self.pin_length() * 3.5 - self.arena_size / 2.0
    }
}
