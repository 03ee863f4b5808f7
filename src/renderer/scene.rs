//! Scene geometry
//!
//! Turns a read-only view of the game state into a triangle list. Everything
//! here runs natively so the layout can be unit tested without a GPU.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::polar_to_cartesian;
use crate::settings::Settings;
use crate::sim::particles::MAX_LIFE;
use crate::sim::{GameState, PowerUpKind, Tint};

const RING_SEGMENTS: u32 = 96;
const SHIELD_GAP: f32 = 8.0;
const SHIELD_WIDTH: f32 = 4.0;
/// Label height relative to the pin head radius
const LABEL_SCALE: f32 = 0.9;

/// Ring radius scale while the placement pulse runs
pub fn pulse_scale(pulse_timer: f32) -> f32 {
    if pulse_timer > 0.0 {
        1.0 + 0.05 * (pulse_timer * 0.5).sin()
    } else {
        1.0
    }
}

fn with_alpha(mut color: [f32; 4], alpha: f32) -> [f32; 4] {
    color[3] *= alpha.clamp(0.0, 1.0);
    color
}

/// Build the frame's vertices in canvas space (ring center at the origin, y down)
pub fn build(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let theme = settings.theme;
    let tuning = &state.tuning;
    let radius = tuning.ring_radius();
    let pin_length = tuning.pin_length();
    let head_radius = tuning.pin_head_radius();
    let pin_color = settings.pin_color.rgba(theme);
    let label_height = head_radius * LABEL_SCALE;

    let mut vertices = Vec::with_capacity(4096);

    // Ring disc, pulsing after a placement
    vertices.extend(shapes::circle(
        Vec2::ZERO,
        radius * pulse_scale(state.pulse_timer),
        theme.ring_fill(),
        RING_SEGMENTS,
    ));

    // Placed pins stick outward from the rim
    for placed in &state.pins {
        let theta = state.ring.to_screen(placed.angle);
        let head = polar_to_cartesian(radius, theta);
        let tail = polar_to_cartesian(radius + pin_length, theta);
        vertices.extend(shapes::pin(head, tail, head_radius, pin_color));
        vertices.extend(shapes::number(
            head,
            label_height,
            placed.sequence,
            theme.background(),
        ));
    }

    for power_up in &state.power_ups {
        let theta = state.ring.to_screen(power_up.angle);
        let color = power_up.kind.spec(tuning).color;
        let center = polar_to_cartesian(radius, theta);
        vertices.extend(shapes::circle(center, head_radius * 1.25, color, 20));
    }

    if let Some(projectile) = &state.projectile {
        let head = projectile.head_position();
        let tail = head + Vec2::new(0.0, pin_length);
        let color = if projectile.is_flying() {
            colors::FLYING_PIN
        } else {
            pin_color
        };
        vertices.extend(shapes::pin(head, tail, head_radius, color));
        // The loaded pin shows how many are left
        if !projectile.is_flying() {
            vertices.extend(shapes::number(
                head,
                label_height,
                state.pins_remaining,
                theme.background(),
            ));
        }
    }

    if state.effects.is_active(PowerUpKind::Shield) {
        let color = PowerUpKind::Shield.spec(tuning).color;
        let inner = radius + SHIELD_GAP - SHIELD_WIDTH * 0.5;
        vertices.extend(shapes::ring(
            Vec2::ZERO,
            inner,
            inner + SHIELD_WIDTH,
            color,
            RING_SEGMENTS,
        ));
    }

    for particle in &state.particles {
        let base = match particle.tint {
            Tint::Danger => colors::DANGER,
            Tint::PowerUp(kind) => kind.spec(tuning).color,
        };
        let color = with_alpha(base, particle.life / MAX_LIFE);
        vertices.extend(shapes::circle(particle.pos, particle.size * 0.5, color, 8));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PlacedPin, start_game};
    use crate::tuning::Tuning;

    fn playing() -> GameState {
        let mut state = GameState::new(42, Tuning::default());
        start_game(&mut state);
        state.power_ups.clear();
        state
    }

    #[test]
    fn test_pulse_scale() {
        assert_eq!(pulse_scale(0.0), 1.0);
        assert!(pulse_scale(3.0) > 1.0);
        assert!(pulse_scale(3.0) <= 1.05);
    }

    #[test]
    fn test_pins_add_geometry() {
        let mut state = playing();
        let settings = Settings::default();
        let empty = build(&state, &settings).len();

        state.pins.push(PlacedPin {
            angle: 0.0,
            sequence: 1,
        });
        let with_pin = build(&state, &settings).len();
        // Shaft quad, a 16-segment head and a two-bar "1"
        assert_eq!(with_pin - empty, 6 + 16 * 3 + 2 * 6);
    }

    #[test]
    fn test_pin_labels_follow_sequence() {
        let mut state = playing();
        state.projectile = None;
        let settings = Settings::default();

        state.pins.push(PlacedPin {
            angle: 1.0,
            sequence: 1,
        });
        let one = build(&state, &settings).len();
        state.pins[0].sequence = 8;
        let eight = build(&state, &settings).len();
        assert_eq!(eight - one, (7 - 2) * 6);
    }

    #[test]
    fn test_loaded_pin_shows_remaining_count() {
        let mut state = playing();
        let settings = Settings::default();
        state.pins_remaining = 1;
        let one_left = build(&state, &settings).len();
        state.pins_remaining = 8;
        let eight_left = build(&state, &settings).len();
        assert_eq!(eight_left - one_left, (7 - 2) * 6);

        // No label once the pin is in flight
        if let Some(projectile) = state.projectile.as_mut() {
            projectile.state = crate::sim::ProjectileState::Flying;
        }
        let flying = build(&state, &settings).len();
        assert_eq!(eight_left - flying, 7 * 6);
    }

    #[test]
    fn test_pin_follows_ring_rotation() {
        let mut state = playing();
        state.projectile = None;
        state.ring.angle = 0.0;
        let landing = state.ring.landing_angle();
        state.pins.push(PlacedPin {
            angle: landing,
            sequence: 1,
        });

        let vertices = build(&state, &Settings::default());
        // The shaft's first vertex sits near the top of the ring, beyond the rim
        let disc = (RING_SEGMENTS * 3) as usize;
        let tail = Vec2::from(vertices[disc].position);
        let radius = state.tuning.ring_radius();
        assert!(tail.y < -radius);
        assert!(tail.x.abs() < 3.0);
    }

    #[test]
    fn test_shield_halo_only_when_active() {
        let mut state = playing();
        let settings = Settings::default();
        let before = build(&state, &settings).len();
        let tuning = state.tuning.clone();
        state.effects.activate(PowerUpKind::Shield, &tuning);
        let after = build(&state, &settings).len();
        assert_eq!(after - before, (RING_SEGMENTS * 6) as usize);
    }

    #[test]
    fn test_particles_fade() {
        let mut state = playing();
        crate::sim::particles::burst(&mut state.particles, Vec2::ZERO, Tint::Danger, 1, 7);
        state.particles[0].life = MAX_LIFE / 2.0;
        let vertices = build(&state, &Settings::default());
        let last = vertices.last().map(|v| v.color[3]);
        assert_eq!(last, Some(0.5));
    }
}
