//! Power-ups and the timed effects they grant

use serde::{Deserialize, Serialize};

use crate::tuning::{ShieldPolicy, Tuning};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Halves ring speed
    Slow,
    /// Absorbs one collision
    Shield,
    /// Boosts score per pin
    Multiplier,
}

/// Gameplay and presentation data attached to a power-up kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpSpec {
    /// Effect lifetime in frames
    pub duration: f32,
    /// Factor applied to score per pin while active
    pub score_factor: f32,
    /// Factor applied to ring speed while active
    pub speed_factor: f32,
    /// Badge/particle colour
    pub color: [f32; 4],
    /// HUD badge glyph
    pub icon: &'static str,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Slow,
        PowerUpKind::Shield,
        PowerUpKind::Multiplier,
    ];

    pub fn spec(self, tuning: &Tuning) -> PowerUpSpec {
        match self {
            PowerUpKind::Slow => PowerUpSpec {
                duration: tuning.slow_duration,
                score_factor: 1.0,
                speed_factor: tuning.slow_factor,
                color: [0.984, 0.737, 0.020, 1.0],
                icon: "⏱️",
            },
            PowerUpKind::Shield => PowerUpSpec {
                duration: tuning.shield_duration,
                score_factor: 1.0,
                speed_factor: 1.0,
                color: [0.259, 0.522, 0.957, 1.0],
                icon: "🛡️",
            },
            PowerUpKind::Multiplier => PowerUpSpec {
                duration: tuning.multiplier_duration,
                score_factor: tuning.bonus_multiplier,
                speed_factor: 1.0,
                color: [0.918, 0.263, 0.208, 1.0],
                icon: "✨",
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Slow => "slow",
            PowerUpKind::Shield => "shield",
            PowerUpKind::Multiplier => "multiplier",
        }
    }

    /// Whether this effect counts down under the given shield policy
    fn decays(self, policy: ShieldPolicy) -> bool {
        self != PowerUpKind::Shield || policy == ShieldPolicy::Timed
    }
}

/// A running effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    /// Frames left (ignored for a consumable Shield)
    pub remaining: f32,
}

/// Active effects, at most one per kind, kept sorted by kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    effects: Vec<ActiveEffect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an effect; re-acquiring a running one resets its timer
    pub fn activate(&mut self, kind: PowerUpKind, tuning: &Tuning) {
        let remaining = kind.spec(tuning).duration;
        match self.effects.binary_search_by_key(&kind, |e| e.kind) {
            Ok(i) => self.effects[i].remaining = remaining,
            Err(i) => self.effects.insert(i, ActiveEffect { kind, remaining }),
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn get(&self, kind: PowerUpKind) -> Option<&ActiveEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Remove an effect, returning whether it was running
    pub fn consume(&mut self, kind: PowerUpKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        self.effects.len() != before
    }

    /// Count timers down by `dt` frames and return the kinds that ran out
    pub fn decay(&mut self, dt: f32, policy: ShieldPolicy) -> Vec<PowerUpKind> {
        for effect in self.effects.iter_mut().filter(|e| e.kind.decays(policy)) {
            effect.remaining -= dt;
        }
        let expired: Vec<PowerUpKind> = self
            .effects
            .iter()
            .filter(|e| e.kind.decays(policy) && e.remaining <= 0.0)
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| !expired.contains(&e.kind));
        expired
    }

    /// Combined ring speed factor of the running effects
    pub fn speed_factor(&self, tuning: &Tuning) -> f32 {
        self.effects
            .iter()
            .map(|e| e.kind.spec(tuning).speed_factor)
            .product()
    }

    /// Combined score factor of the running effects
    pub fn score_factor(&self, tuning: &Tuning) -> f32 {
        self.effects
            .iter()
            .map(|e| e.kind.spec(tuning).score_factor)
            .product()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reacquire_resets_duration() {
        let tuning = Tuning::default();
        let mut effects = ActiveEffects::new();
        effects.activate(PowerUpKind::Slow, &tuning);
        effects.decay(100.0, ShieldPolicy::Consumable);
        assert_eq!(effects.get(PowerUpKind::Slow).unwrap().remaining, 400.0);

        effects.activate(PowerUpKind::Slow, &tuning);
        assert_eq!(effects.get(PowerUpKind::Slow).unwrap().remaining, 500.0);
        assert_eq!(effects.iter().count(), 1);
    }

    #[test]
    fn test_expiry_reported_once() {
        let tuning = Tuning::default();
        let mut effects = ActiveEffects::new();
        effects.activate(PowerUpKind::Multiplier, &tuning);
        assert!(effects.decay(399.0, ShieldPolicy::Consumable).is_empty());
        assert_eq!(
            effects.decay(1.0, ShieldPolicy::Consumable),
            vec![PowerUpKind::Multiplier]
        );
        assert!(effects.decay(1.0, ShieldPolicy::Consumable).is_empty());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_consumable_shield_never_decays() {
        let tuning = Tuning::default();
        let mut effects = ActiveEffects::new();
        effects.activate(PowerUpKind::Shield, &tuning);
        for _ in 0..1000 {
            assert!(effects.decay(2.0, ShieldPolicy::Consumable).is_empty());
        }
        assert!(effects.consume(PowerUpKind::Shield));
        assert!(!effects.consume(PowerUpKind::Shield));
    }

    #[test]
    fn test_timed_shield_decays() {
        let tuning = Tuning::default();
        let mut effects = ActiveEffects::new();
        effects.activate(PowerUpKind::Shield, &tuning);
        assert_eq!(
            effects.decay(1.0, ShieldPolicy::Timed),
            vec![PowerUpKind::Shield]
        );
    }

    #[test]
    fn test_factors() {
        let tuning = Tuning::default();
        let mut effects = ActiveEffects::new();
        assert_eq!(effects.speed_factor(&tuning), 1.0);
        assert_eq!(effects.score_factor(&tuning), 1.0);

        effects.activate(PowerUpKind::Multiplier, &tuning);
        effects.activate(PowerUpKind::Slow, &tuning);
        assert_eq!(effects.speed_factor(&tuning), 0.5);
        assert_eq!(effects.score_factor(&tuning), 2.5);
    }

    #[test]
    fn test_kept_sorted_by_kind() {
        let tuning = Tuning::default();
        let mut effects = ActiveEffects::new();
        effects.activate(PowerUpKind::Multiplier, &tuning);
        effects.activate(PowerUpKind::Slow, &tuning);
        effects.activate(PowerUpKind::Shield, &tuning);
        let kinds: Vec<_> = effects.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, PowerUpKind::ALL.to_vec());
    }
}
