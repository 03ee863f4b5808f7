//! Pin Ring - A rotating-ring pin placement arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ring, pins, power-ups, frame stepping)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Versioned session snapshots
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::{PinColor, Settings, Theme};
pub use tuning::Tuning;

use glam::Vec2;
use std::f32::consts::TAU;

/// Game configuration constants
pub mod consts {
    /// Nominal frame length in milliseconds; one "frame unit" of simulation time
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest frame delta accepted by the stepper (frame units)
    pub const MAX_FRAME_DELTA: f32 = 2.0;

    /// Screen-space angle at which every shot meets the ring (straight up)
    pub const SHOT_ANGLE: f32 = 1.5 * std::f32::consts::PI;

    /// Frames the ring pulses after a successful placement
    pub const PLACEMENT_PULSE_FRAMES: f32 = 12.0;

    /// Particle burst sizes
    pub const SHIELD_BURST: u32 = 30;
    pub const POWER_UP_BURST: u32 = 30;
    pub const DANGER_BURST: u32 = 50;
}

/// Normalize an angle to [0, 2π)
///
/// Non-finite input collapses to 0 in release builds.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    debug_assert!(angle.is_finite(), "non-finite angle {angle}");
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle_range() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(-0.5) - (TAU - 0.5)).abs() < 1e-5);
        assert!((normalize_angle(TAU + 1.0) - 1.0).abs() < 1e-5);
        assert!(normalize_angle(-1e-9) < TAU);
        assert_eq!(normalize_angle(TAU), 0.0);
    }

    #[test]
    fn test_polar_to_cartesian_shot_axis() {
        // Shot axis points to the top of the screen (negative y in canvas space)
        let p = polar_to_cartesian(10.0, consts::SHOT_ANGLE);
        assert!(p.x.abs() < 1e-4);
        assert!((p.y + 10.0).abs() < 1e-4);
    }
}
