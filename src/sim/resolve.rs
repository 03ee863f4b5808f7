//! Projectile flight and arrival resolution
//!
//! A pin travels up the fixed shot axis. When its head reaches the ring it
//! lands at the ring-relative angle currently under the axis, and one of
//! three things happens: it collides with a placed pin (fatal, unless a
//! shield absorbs it), or it sticks, collecting any power-up it lands on.

use glam::Vec2;

use super::effects::PowerUpKind;
use super::occupancy::{first_conflict, within_threshold};
use super::particles::{self, Tint};
use super::state::{GameEvent, GamePhase, GameState, PendingPowerUp, PlacedPin};
use super::tick::roll_power_up;
use crate::consts::*;
use crate::tuning::PowerUpSpawnPolicy;
use crate::{normalize_angle, polar_to_cartesian};

/// Outcome of a pin reaching the ring
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Pin stuck at `angle`
    Placed {
        angle: f32,
        points: u64,
        collected: Vec<PowerUpKind>,
    },
    /// Pin hit the pin at index `blocked_by`; a shield took the hit
    ShieldAbsorbed { angle: f32, blocked_by: usize },
    /// Pin hit the pin at index `blocked_by`; the run is over
    Fatal { angle: f32, blocked_by: usize },
}

/// Move a flying projectile and resolve it if it reached the ring
pub fn advance_projectile(state: &mut GameState, dt: f32) -> Option<Resolution> {
    let ring_radius = state.tuning.ring_radius();
    let speed = state.tuning.pin_fly_speed;

    let projectile = state.projectile.as_mut()?;
    if !projectile.is_flying() {
        return None;
    }
    projectile.head_offset += speed * dt;
    if projectile.head_offset < ring_radius {
        return None;
    }

    let landing = state.ring.landing_angle();
    Some(resolve_arrival(state, landing))
}

/// Resolve a pin landing at the ring-relative angle `landing`
pub fn resolve_arrival(state: &mut GameState, landing: f32) -> Resolution {
    debug_assert_eq!(state.phase, GamePhase::Playing);
    let landing = normalize_angle(landing);
    let threshold = state.tuning.collision_threshold;
    state.projectile = None;

    let conflict = first_conflict(landing, state.pins.iter().map(|p| p.angle), threshold);
    if let Some(blocked_by) = conflict {
        let impact = contact_point(state);
        let seed = burst_seed(state);

        if state.effects.consume(PowerUpKind::Shield) {
            log::debug!("Shield absorbed collision at {landing:.3} rad");
            particles::burst(
                &mut state.particles,
                impact,
                Tint::PowerUp(PowerUpKind::Shield),
                SHIELD_BURST,
                seed,
            );
            state.emit(GameEvent::ShieldAbsorbed);
            state.pins_placed += 1;
            finish_pin(state);
            return Resolution::ShieldAbsorbed {
                angle: landing,
                blocked_by,
            };
        }

        log::info!(
            "Collision at {landing:.3} rad, game over with score {}",
            state.score
        );
        particles::burst(&mut state.particles, impact, Tint::Danger, DANGER_BURST, seed);
        state.finish_run();
        return Resolution::Fatal {
            angle: landing,
            blocked_by,
        };
    }

    // Two-phase collection: split the pending list first, then apply effects
    let (hits, misses): (Vec<PendingPowerUp>, Vec<PendingPowerUp>) = state
        .power_ups
        .iter()
        .partition(|p| within_threshold(p.angle, landing, threshold));
    state.power_ups = misses;

    let collected: Vec<PowerUpKind> = hits.iter().map(|p| p.kind).collect();
    for &kind in &collected {
        state.effects.activate(kind, &state.tuning);
        let seed = burst_seed(state);
        particles::burst(
            &mut state.particles,
            Vec2::ZERO,
            Tint::PowerUp(kind),
            POWER_UP_BURST,
            seed,
        );
        state.emit(GameEvent::PowerUp(kind));
        log::debug!("Collected {} power-up", kind.as_str());
    }

    state.emit(GameEvent::Hit);
    let sequence = state.pins.len() as u32 + 1;
    state.pins.push(PlacedPin {
        angle: landing,
        sequence,
    });
    state.pins_placed += 1;
    state.pulse_timer = PLACEMENT_PULSE_FRAMES;

    let factor = state.effects.score_factor(&state.tuning);
    let points = (state.tuning.score_per_pin as f32 * factor).floor() as u64;
    state.score += points;

    let level_done = finish_pin(state);
    if !level_done && state.tuning.spawn_policy == PowerUpSpawnPolicy::EveryPlacement {
        roll_power_up(state);
    }

    Resolution::Placed {
        angle: landing,
        points,
        collected,
    }
}

/// Count a resolved pin; completes the level or loads the next pin.
/// Returns whether the level is complete.
fn finish_pin(state: &mut GameState) -> bool {
    debug_assert!(state.pins_remaining > 0, "resolved a pin the level didn't need");
    state.pins_remaining = state.pins_remaining.saturating_sub(1);

    if state.pins_remaining == 0 {
        state.phase = GamePhase::LevelComplete;
        state.emit(GameEvent::LevelUp {
            next_level: state.level + 1,
        });
        log::info!("Level {} complete, score {}", state.level, state.score);
        true
    } else {
        state.spawn_projectile();
        false
    }
}

/// Where pins meet the ring on screen
fn contact_point(state: &GameState) -> Vec2 {
    polar_to_cartesian(state.tuning.ring_radius(), SHOT_ANGLE)
}

fn burst_seed(state: &GameState) -> u64 {
    state.time_ticks ^ ((state.pins_placed as u64) << 32) ^ state.particles.len() as u64
}
