//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{ActiveEffects, PowerUpKind};
use super::level::LevelParams;
use super::particles::Particle;
use crate::normalize_angle;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Session created, no run started yet
    Ready,
    /// Active gameplay
    Playing,
    /// All pins of the level placed, waiting for the player to continue
    LevelComplete,
    /// Run ended
    GameOver,
}

/// Notifications for audio, haptics and HUD collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Pin launched
    Shoot,
    /// Pin placed on the ring
    Hit,
    /// Power-up collected
    PowerUp(PowerUpKind),
    /// Level cleared
    LevelUp { next_level: u32 },
    /// Pin collided without a shield
    GameOver { final_score: u64 },
    /// Shield took a collision
    ShieldAbsorbed,
    /// Timed effect ran out
    EffectExpired(PowerUpKind),
}

/// Rotation sense of the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spin {
    Clockwise,
    CounterClockwise,
}

impl Spin {
    /// Sign applied to the ring's angular speed
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Spin::Clockwise => 1.0,
            Spin::CounterClockwise => -1.0,
        }
    }
}

/// The rotating target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingState {
    /// Current rotation (radians, [0, 2π))
    pub angle: f32,
    /// Radians per frame, never negative
    pub angular_speed: f32,
    pub spin: Spin,
}

impl Default for RingState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            angular_speed: 0.0,
            spin: Spin::Clockwise,
        }
    }
}

impl RingState {
    /// Rotate by `dt` frames, scaled by any slow-down factor
    pub fn advance(&mut self, dt: f32, speed_factor: f32) {
        self.angle = normalize_angle(
            self.angle + self.angular_speed * self.spin.sign() * speed_factor * dt,
        );
    }

    /// Ring-relative angle of the point currently under the shot axis
    #[inline]
    pub fn landing_angle(&self) -> f32 {
        normalize_angle(crate::consts::SHOT_ANGLE - self.angle)
    }

    /// Screen angle of a ring-relative angle
    #[inline]
    pub fn to_screen(&self, ring_angle: f32) -> f32 {
        normalize_angle(ring_angle + self.angle)
    }
}

/// A pin stuck in the ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedPin {
    /// Ring-relative angle
    pub angle: f32,
    /// Placement order within the level, starting at 1
    pub sequence: u32,
}

/// A power-up waiting on the ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingPowerUp {
    /// Ring-relative angle
    pub angle: f32,
    pub kind: PowerUpKind,
}

/// Projectile lifecycle; resolved projectiles are dropped from the state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    /// Loaded, waiting for the player
    Idle,
    /// Travelling up the shot axis
    Flying,
}

/// The pin in the launcher or in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Signed distance of the pin head from the ring center along the shot
    /// axis; the pin arrives when this reaches the ring radius
    pub head_offset: f32,
    pub state: ProjectileState,
}

impl Projectile {
    pub fn loaded(tuning: &Tuning) -> Self {
        Self {
            head_offset: tuning.projectile_spawn_offset(),
            state: ProjectileState::Idle,
        }
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.state == ProjectileState::Flying
    }

    /// Screen position of the head in ring-centered canvas space (y down)
    pub fn head_position(&self) -> Vec2 {
        Vec2::new(0.0, -self.head_offset)
    }
}

/// End-of-run figures handed to the high score collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub final_score: u64,
    pub level: u32,
    pub pins_placed: u32,
    pub new_high_score: bool,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG; serialized so a restored run draws the same numbers
    pub(crate) rng: Pcg32,
    /// Balance table for this run
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    /// Parameters of the current level
    pub params: LevelParams,
    /// Score
    pub score: u64,
    /// Best score known to the session (seeded by the host, raised at game over)
    pub high_score: u64,
    /// Set at game over when the run beat `high_score`
    pub new_high_score: bool,
    /// Pins resolved this run (placed or shield-absorbed)
    pub pins_placed: u32,
    /// Pins still to shoot this level
    pub pins_remaining: u32,
    /// The rotating ring
    pub ring: RingState,
    /// Pins on the ring, in placement order
    pub pins: Vec<PlacedPin>,
    /// Power-ups on the ring
    pub power_ups: Vec<PendingPowerUp>,
    /// Pin in the launcher or in flight
    pub projectile: Option<Projectile>,
    /// Active power-up effects
    pub effects: ActiveEffects,
    /// Ring pulse after a placement (frames, cosmetic)
    pub pulse_timer: f32,
    /// Simulation frame counter
    pub time_ticks: u64,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Events raised since the last drain
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle session; `start_game` begins the first level
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let params = LevelParams::for_level(1, &tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Ready,
            level: 1,
            params,
            score: 0,
            high_score: 0,
            new_high_score: false,
            pins_placed: 0,
            pins_remaining: params.pins_required,
            ring: RingState::default(),
            pins: Vec::new(),
            power_ups: Vec::new(),
            projectile: None,
            effects: ActiveEffects::new(),
            pulse_timer: 0.0,
            time_ticks: 0,
            particles: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Seed the best score from persistent storage
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the previous call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events raised since the last drain, without consuming them
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Load the next pin into the launcher
    pub fn spawn_projectile(&mut self) {
        debug_assert!(
            !self.projectile.is_some_and(|p| p.is_flying()),
            "replacing a projectile in flight"
        );
        self.projectile = Some(Projectile::loaded(&self.tuning));
    }

    /// Fraction of the current level completed, for the progress bar
    pub fn level_progress(&self) -> f32 {
        let required = self.params.pins_required.max(1);
        let done = required.saturating_sub(self.pins_remaining);
        done as f32 / required as f32
    }

    /// Final figures once the run is over
    pub fn summary(&self) -> Option<RunSummary> {
        (self.phase == GamePhase::GameOver).then(|| RunSummary {
            final_score: self.score,
            level: self.level,
            pins_placed: self.pins_placed,
            new_high_score: self.new_high_score,
        })
    }

    /// Close the run: enter Game Over and settle the high score
    pub(crate) fn finish_run(&mut self) {
        self.phase = GamePhase::GameOver;
        self.new_high_score = self.score > self.high_score;
        if self.new_high_score {
            self.high_score = self.score;
        }
        self.projectile = None;
        self.emit(GameEvent::GameOver {
            final_score: self.score,
        });
    }

    /// Ring-relative angles of everything occupying the ring
    pub fn occupied_angles(&self) -> Vec<f32> {
        self.pins
            .iter()
            .map(|p| p.angle)
            .chain(self.power_ups.iter().map(|p| p.angle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn test_new_state_is_ready() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.level, 1);
        assert!(state.projectile.is_none());
        assert_eq!(state.pins_remaining, 8);
    }

    #[test]
    fn test_landing_angle_inverts_rotation() {
        let mut ring = RingState::default();
        assert!((ring.landing_angle() - 1.5 * PI).abs() < 1e-5);

        ring.angle = FRAC_PI_2;
        assert!((ring.landing_angle() - PI).abs() < 1e-5);

        // A pin placed at the landing angle sits under the shot axis
        let screen = ring.to_screen(ring.landing_angle());
        assert!((screen - 1.5 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_ring_advance_wraps_both_ways() {
        let mut ring = RingState {
            angle: TAU - 0.01,
            angular_speed: 0.01,
            spin: Spin::Clockwise,
        };
        ring.advance(2.0, 1.0);
        assert!((ring.angle - 0.01).abs() < 1e-4);

        ring.spin = Spin::CounterClockwise;
        ring.advance(4.0, 0.5);
        assert!((ring.angle - (TAU - 0.01)).abs() < 1e-4);
    }

    #[test]
    fn test_events_drain() {
        let mut state = GameState::new(1, Tuning::default());
        state.emit(GameEvent::Shoot);
        assert_eq!(state.pending_events(), &[GameEvent::Shoot]);
        assert_eq!(state.drain_events(), vec![GameEvent::Shoot]);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_summary_only_after_game_over() {
        let mut state = GameState::new(1, Tuning::default()).with_high_score(50);
        assert!(state.summary().is_none());
        state.phase = GamePhase::GameOver;
        state.score = 40;
        let summary = state.summary().unwrap();
        assert_eq!(summary.final_score, 40);
        assert!(!summary.new_high_score);
    }

    #[test]
    fn test_projectile_head_position() {
        let projectile = Projectile {
            head_offset: 200.0,
            state: ProjectileState::Flying,
        };
        assert_eq!(projectile.head_position(), Vec2::new(0.0, -200.0));
    }
}
