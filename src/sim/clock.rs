//! Frame clock for the host's animation-frame loop
//!
//! Converts callback timestamps (milliseconds) into frame deltas and keeps a
//! stale or doubly-bound callback from stepping the same logical frame twice.

use crate::consts::{FRAME_MS, MAX_FRAME_DELTA};

/// Frame units elapsed over `elapsed_ms`, clamped to [0, MAX_FRAME_DELTA]
///
/// The upper clamp keeps a resumed background tab from teleporting the pin.
pub fn frame_delta(elapsed_ms: f64) -> f32 {
    let frames = (elapsed_ms / FRAME_MS) as f32;
    if frames.is_nan() {
        return 0.0;
    }
    frames.clamp(0.0, MAX_FRAME_DELTA)
}

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    generation: u64,
    running: bool,
    /// Time the loop was (re)started
    anchor: f64,
    /// Timestamp of the last frame that was let through
    last_frame: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or restart the loop; callbacks must present the returned token
    pub fn start(&mut self, now: f64) -> u64 {
        self.generation += 1;
        self.running = true;
        self.anchor = now;
        self.last_frame = None;
        self.generation
    }

    /// Stop the loop; outstanding callbacks become stale
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Delta for a frame callback, or None if it must not step the simulation
    pub fn frame(&mut self, token: u64, now: f64) -> Option<f32> {
        if !self.running || token != self.generation {
            return None;
        }
        if self.last_frame.is_some_and(|last| now <= last) {
            return None;
        }
        let since = self.last_frame.unwrap_or(self.anchor);
        self.last_frame = Some(now);
        Some(frame_delta(now - since))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_delta_clamps() {
        assert!((frame_delta(FRAME_MS) - 1.0).abs() < 1e-6);
        assert_eq!(frame_delta(10_000.0), 2.0);
        assert_eq!(frame_delta(-5.0), 0.0);
        assert_eq!(frame_delta(f64::NAN), 0.0);
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let mut clock = FrameClock::new();
        let token = clock.start(1000.0);
        assert!(clock.frame(token, 1000.0 + FRAME_MS).is_some());
        assert!(clock.frame(token, 1000.0 + FRAME_MS).is_none());
        assert!(clock.frame(token, 1000.0 + 2.0 * FRAME_MS).is_some());
    }

    #[test]
    fn test_stale_token_rejected() {
        let mut clock = FrameClock::new();
        let old = clock.start(0.0);
        let new = clock.start(50.0);
        assert!(clock.frame(old, 70.0).is_none());
        assert!(clock.frame(new, 70.0).is_some());
    }

    #[test]
    fn test_stopped_clock_rejects() {
        let mut clock = FrameClock::new();
        let token = clock.start(0.0);
        clock.stop();
        assert!(!clock.is_running());
        assert!(clock.frame(token, 16.0).is_none());
    }

    #[test]
    fn test_first_frame_before_anchor_is_zero() {
        // Animation-frame timestamps can predate the moment the loop started
        let mut clock = FrameClock::new();
        let token = clock.start(500.0);
        assert_eq!(clock.frame(token, 495.0), Some(0.0));
    }
}
