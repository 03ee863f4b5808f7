//! Cosmetic particle bursts
//!
//! Particles never feed back into gameplay and are not serialized. Their
//! jitter comes from a hash of the frame counter rather than the gameplay
//! RNG, so spawning them cannot change what a seeded run does.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::PowerUpKind;

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Colour family of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    /// Fatal collision
    Danger,
    /// Power-up colour (also used for shield absorbs)
    PowerUp(PowerUpKind),
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Units per frame
    pub vel: Vec2,
    pub size: f32,
    pub tint: Tint,
    /// Frames left
    pub life: f32,
}

/// Lifetime upper bound, for alpha fade
pub const MAX_LIFE: f32 = 60.0;

#[inline]
fn unit_hash(seed: u32, salt: u32) -> f32 {
    let hash = seed
        .wrapping_mul(2654435761)
        .wrapping_add(salt.wrapping_mul(7919))
        .rotate_left(13)
        .wrapping_mul(2246822519);
    (hash % 1000) as f32 / 1000.0
}

/// Append `count` particles exploding from `origin`
pub fn burst(particles: &mut Vec<Particle>, origin: Vec2, tint: Tint, count: u32, seed: u64) {
    let seed = (seed as u32) ^ ((seed >> 32) as u32);
    for j in 0..count {
        if particles.len() >= MAX_PARTICLES {
            break;
        }
        let r1 = unit_hash(seed, j * 4);
        let r2 = unit_hash(seed, j * 4 + 1);
        let r3 = unit_hash(seed, j * 4 + 2);
        let r4 = unit_hash(seed, j * 4 + 3);
        particles.push(Particle {
            pos: origin,
            vel: Vec2::new((r1 - 0.5) * 6.0, (r2 - 0.5) * 6.0),
            size: 2.0 + r3 * 5.0,
            tint,
            life: 40.0 + r4 * 20.0,
        });
    }
}

/// Move particles by `dt` frames and drop the dead ones
pub fn update(particles: &mut Vec<Particle>, dt: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.life -= dt;
    }
    particles.retain(|p| p.life > 0.0);
}
