//! Per-level difficulty table

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Difficulty derived from a level number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Pins the player must place to clear the level
    pub pins_required: u32,
    /// Ring rotation speed (radians per frame)
    pub ring_speed: f32,
    /// Probability of a power-up roll succeeding
    pub power_up_chance: f32,
}

impl LevelParams {
    /// Parameters for a 1-based level number
    ///
    /// Levels past `tuning.max_level_index + 1` reuse the last row.
    pub fn for_level(level: u32, tuning: &Tuning) -> Self {
        debug_assert!(level >= 1, "levels are 1-based");
        let index = level.saturating_sub(1).min(tuning.max_level_index);
        let step = index as f32;

        let pins_required = tuning
            .initial_pins
            .saturating_add(index.saturating_mul(tuning.pin_increment))
            .min(tuning.max_pins);
        let ring_speed =
            (tuning.ring_speed_base + step * tuning.ring_speed_increment).min(tuning.ring_speed_max);
        let power_up_chance = (tuning.power_up_chance
            + step * tuning.power_up_chance_increment)
            .min(tuning.power_up_chance_max);

        Self {
            pins_required,
            ring_speed,
            power_up_chance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_level() {
        let params = LevelParams::for_level(1, &Tuning::default());
        assert_eq!(params.pins_required, 8);
        assert!((params.ring_speed - 0.004).abs() < 1e-7);
        assert!((params.power_up_chance - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_pins_hit_cap() {
        let tuning = Tuning::default();
        assert_eq!(LevelParams::for_level(2, &tuning).pins_required, 11);
        assert_eq!(LevelParams::for_level(6, &tuning).pins_required, 23);
        assert_eq!(LevelParams::for_level(7, &tuning).pins_required, 25);
        assert_eq!(LevelParams::for_level(50, &tuning).pins_required, 25);
    }

    #[test]
    fn test_index_is_capped() {
        let tuning = Tuning::default();
        assert_eq!(
            LevelParams::for_level(11, &tuning),
            LevelParams::for_level(400, &tuning)
        );
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let tuning = Tuning::default();
        let mut prev = LevelParams::for_level(1, &tuning);
        for level in 2..=15 {
            let params = LevelParams::for_level(level, &tuning);
            assert!(params.pins_required >= prev.pins_required);
            assert!(params.ring_speed >= prev.ring_speed);
            assert!(params.power_up_chance >= prev.power_up_chance);
            assert!(params.pins_required <= 25);
            assert!(params.ring_speed <= 0.018);
            assert!(params.power_up_chance <= 0.70);
            prev = params;
        }
    }

    #[test]
    fn test_tight_maxima_clamp() {
        let tuning = Tuning {
            ring_speed_max: 0.005,
            power_up_chance_max: 0.3,
            ..Tuning::default()
        };
        let params = LevelParams::for_level(11, &tuning);
        assert_eq!(params.ring_speed, 0.005);
        assert_eq!(params.power_up_chance, 0.3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: parameters never decrease from one level to the next
            #[test]
            fn prop_non_decreasing(level in 1u32..1000) {
                let tuning = Tuning::default();
                let a = LevelParams::for_level(level, &tuning);
                let b = LevelParams::for_level(level + 1, &tuning);
                prop_assert!(b.pins_required >= a.pins_required);
                prop_assert!(b.ring_speed >= a.ring_speed);
                prop_assert!(b.power_up_chance >= a.power_up_chance);
            }

            /// Property: the generator is a pure function of its inputs
            #[test]
            fn prop_deterministic(level in 1u32..1000) {
                let tuning = Tuning::default();
                prop_assert_eq!(
                    LevelParams::for_level(level, &tuning),
                    LevelParams::for_level(level, &tuning)
                );
            }
        }
    }
}
