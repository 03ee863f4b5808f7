//! Frame stepper and session transitions
//!
//! Core game loop that advances the simulation one rendered frame at a time.

use rand::Rng;
use std::f32::consts::TAU;

use super::effects::PowerUpKind;
use super::level::LevelParams;
use super::occupancy::find_safe_angle;
use super::particles;
use super::resolve::advance_projectile;
use super::state::{GameEvent, GamePhase, GameState, PendingPowerUp, ProjectileState, Spin};
use crate::consts::MAX_FRAME_DELTA;
use crate::normalize_angle;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Fire the loaded pin (click/tap/space)
    pub shoot: bool,
}

/// Advance the game state by one frame of `dt` frame units
///
/// Order matters: the ring turns before the pin is resolved so the landing
/// angle reflects this frame's rotation.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Only a live level moves
    if state.phase != GamePhase::Playing {
        return;
    }

    if input.shoot {
        request_shoot(state);
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DELTA)
    } else {
        0.0
    };
    state.time_ticks += 1;

    // 1. Ring rotation
    let speed_factor = state.effects.speed_factor(&state.tuning);
    state.ring.advance(dt, speed_factor);

    // 2. Projectile flight and arrival
    if let Some(resolution) = advance_projectile(state, dt) {
        log::debug!("Pin resolved: {resolution:?}");
    }

    // 3. Effect timers
    let expired = state.effects.decay(dt, state.tuning.shield_policy);
    for kind in expired {
        state.emit(GameEvent::EffectExpired(kind));
    }

    // 4. Particles
    particles::update(&mut state.particles, dt);

    // 5. Ring pulse
    state.pulse_timer = (state.pulse_timer - dt).max(0.0);
}

/// Fire the loaded pin. No-op unless a level is live and the pin is idle.
pub fn request_shoot(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    match state.projectile.as_mut() {
        Some(projectile) if projectile.state == ProjectileState::Idle => {
            projectile.state = ProjectileState::Flying;
            state.emit(GameEvent::Shoot);
            true
        }
        _ => false,
    }
}

/// Begin a fresh run at level 1
pub fn start_game(state: &mut GameState) {
    state.score = 0;
    state.level = 1;
    state.pins_placed = 0;
    state.new_high_score = false;
    state.effects.clear();
    state.particles.clear();
    state.pulse_timer = 0.0;
    setup_level(state);
    state.phase = GamePhase::Playing;
    log::info!("New run started (seed {})", state.seed);
}

/// Move from a completed level to the next one
pub fn advance_level(state: &mut GameState) -> bool {
    if state.phase != GamePhase::LevelComplete {
        return false;
    }
    state.level += 1;
    setup_level(state);
    state.phase = GamePhase::Playing;
    log::info!(
        "Level {}: {} pins, ring speed {:.4}",
        state.level,
        state.params.pins_required,
        state.params.ring_speed
    );
    true
}

/// Lay out the current level: fresh ring, no pins, maybe a power-up
pub fn setup_level(state: &mut GameState) {
    debug_assert_ne!(state.level, 0, "levels are 1-based");
    state.level = state.level.max(1);
    let params = LevelParams::for_level(state.level, &state.tuning);
    state.params = params;
    state.pins_remaining = params.pins_required;
    state.pins.clear();
    state.power_ups.clear();

    let angle = state.rng.random::<f32>() * TAU;
    let spin = if state.rng.random_bool(0.5) {
        Spin::Clockwise
    } else {
        Spin::CounterClockwise
    };
    state.ring.angle = normalize_angle(angle);
    state.ring.angular_speed = params.ring_speed.max(0.0);
    state.ring.spin = spin;

    roll_power_up(state);
    state.projectile = None;
    state.spawn_projectile();
}

/// Roll the level's power-up chance and spawn one on success
pub(crate) fn roll_power_up(state: &mut GameState) {
    let chance = state.params.power_up_chance.clamp(0.0, 1.0);
    if state.rng.random::<f32>() < chance {
        spawn_power_up(state);
    }
}

/// Place a random power-up clear of everything on the ring.
/// Skipped silently when the ring is too crowded.
pub(crate) fn spawn_power_up(state: &mut GameState) {
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let existing = state.occupied_angles();
    let threshold = state.tuning.collision_threshold * 2.0;
    let attempts = state.tuning.power_up_spawn_attempts;

    match find_safe_angle(&mut state.rng, &existing, threshold, attempts) {
        Some(angle) => {
            state.power_ups.push(PendingPowerUp { angle, kind });
            log::debug!("Spawned {} power-up at {angle:.3} rad", kind.as_str());
        }
        None => log::debug!("No room for a {} power-up", kind.as_str()),
    }
}
