//! Angular occupancy on the ring
//!
//! Pins and power-ups are stored as ring-relative angles in [0, 2π). All
//! proximity questions are answered with wrap-around distance, so 0.05 and
//! 6.2 radians count as neighbours.

use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::normalize_angle;

/// Shortest angular distance between two angles, in [0, π]
#[inline]
pub fn circular_distance(a: f32, b: f32) -> f32 {
    let diff = (normalize_angle(a) - normalize_angle(b)).abs();
    diff.min(TAU - diff).clamp(0.0, PI)
}

/// True when `candidate` keeps at least `threshold` from every existing angle
pub fn is_safe(candidate: f32, existing: impl IntoIterator<Item = f32>, threshold: f32) -> bool {
    existing
        .into_iter()
        .all(|angle| circular_distance(candidate, angle) >= threshold)
}

/// Index of the first angle closer than `threshold` to `candidate`
pub fn first_conflict(
    candidate: f32,
    existing: impl IntoIterator<Item = f32>,
    threshold: f32,
) -> Option<usize> {
    existing
        .into_iter()
        .position(|angle| within_threshold(candidate, angle, threshold))
}

/// True when `a` and `b` are closer than `threshold`
#[inline]
pub fn within_threshold(a: f32, b: f32, threshold: f32) -> bool {
    circular_distance(a, b) < threshold
}

/// Draw random angles until one is safe, giving up after `attempts` tries
///
/// Running out of attempts is an expected outcome on a crowded ring.
pub fn find_safe_angle<R: Rng>(
    rng: &mut R,
    existing: &[f32],
    threshold: f32,
    attempts: u32,
) -> Option<f32> {
    (0..attempts)
        .map(|_| normalize_angle(rng.random::<f32>() * TAU))
        .find(|&candidate| is_safe(candidate, existing.iter().copied(), threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_wraparound_distance() {
        let d = circular_distance(0.05, 6.2);
        assert!((d - (TAU - 6.15)).abs() < 1e-5);
        assert!(d < 0.14);
    }

    #[test]
    fn test_opposite_angles() {
        assert!((circular_distance(0.0, PI) - PI).abs() < 1e-6);
    }

    #[test]
    fn test_is_safe_boundary() {
        // Exactly at threshold is safe, just inside is not
        assert!(is_safe(0.1, [0.0], 0.1));
        assert!(!is_safe(0.099, [0.0], 0.1));
        assert!(is_safe(3.0, [], 0.1));
    }

    #[test]
    fn test_first_conflict_picks_first() {
        let existing = [2.0, 1.0, 1.02];
        assert_eq!(first_conflict(1.01, existing, 0.1), Some(1));
        assert_eq!(first_conflict(4.0, existing, 0.1), None);
    }

    #[test]
    fn test_find_safe_angle_respects_threshold() {
        let mut rng = Pcg32::seed_from_u64(7);
        let existing = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let angle = find_safe_angle(&mut rng, &existing, 0.2, 50).expect("room left on ring");
        assert!(is_safe(angle, existing, 0.2));
        assert!((0.0..TAU).contains(&angle));
    }

    #[test]
    fn test_find_safe_angle_gives_up_on_full_ring() {
        let mut rng = Pcg32::seed_from_u64(7);
        let existing: Vec<f32> = (0..64).map(|i| i as f32 * TAU / 64.0).collect();
        assert_eq!(find_safe_angle(&mut rng, &existing, 0.5, 10), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: distance is symmetric
            #[test]
            fn prop_symmetric(a in 0.0f32..TAU, b in 0.0f32..TAU) {
                prop_assert_eq!(circular_distance(a, b), circular_distance(b, a));
            }

            /// Property: distance stays within [0, π]
            #[test]
            fn prop_bounded(a in -20.0f32..20.0, b in -20.0f32..20.0) {
                let d = circular_distance(a, b);
                prop_assert!((0.0..=PI).contains(&d));
            }

            /// Property: an angle is at distance zero from itself
            #[test]
            fn prop_identity(a in -20.0f32..20.0) {
                prop_assert_eq!(circular_distance(a, a), 0.0);
            }
        }
    }
}
