//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! The event mapping is platform independent; synthesis is wasm32 only.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Pin launched - plucked C5
    Shoot,
    /// Pin stuck in the ring - low thud
    Hit,
    /// Power-up collected
    PowerUp,
    /// Level cleared - major triad
    LevelUp,
    /// Run ended
    GameOver,
    /// Shield took the hit
    ShieldAbsorbed,
    /// Timed effect ran out
    EffectExpired,
}

impl SoundEffect {
    /// Sound for a simulation event
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shoot => Some(SoundEffect::Shoot),
            GameEvent::Hit => Some(SoundEffect::Hit),
            GameEvent::PowerUp(_) => Some(SoundEffect::PowerUp),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::ShieldAbsorbed => Some(SoundEffect::ShieldAbsorbed),
            GameEvent::EffectExpired(_) => Some(SoundEffect::EffectExpired),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Pick up a changed sound toggle or volume
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Shoot => self.play_shoot(ctx, vol),
                SoundEffect::Hit => self.play_hit(ctx, vol),
                SoundEffect::PowerUp => self.play_power_up(ctx, vol),
                SoundEffect::LevelUp => self.play_level_up(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
                SoundEffect::ShieldAbsorbed => self.play_shield(ctx, vol),
                SoundEffect::EffectExpired => self.play_expired(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Single decaying tone starting `delay` seconds from now
        fn blip(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
            peak: f32,
            delay: f64,
            length: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(peak, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }

        /// Shoot - short bright pluck
        fn play_shoot(&self, ctx: &AudioContext, vol: f32) {
            self.blip(ctx, 523.25, OscillatorType::Triangle, vol * 0.3, 0.0, 0.12);
        }

        /// Hit - membrane thump with a falling pitch
        fn play_hit(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 130.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(130.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(65.0, t + 0.05)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Power-up - G5 chirp
        fn play_power_up(&self, ctx: &AudioContext, vol: f32) {
            self.blip(ctx, 783.99, OscillatorType::Triangle, vol * 0.3, 0.0, 0.12);
            self.blip(ctx, 1046.5, OscillatorType::Triangle, vol * 0.2, 0.06, 0.1);
        }

        /// Level up - C major triad
        fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
            for freq in [261.63, 329.63, 392.0] {
                self.blip(ctx, freq, OscillatorType::Triangle, vol * 0.2, 0.0, 0.3);
            }
        }

        /// Game over - long growl sliding down from C2
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 65.41, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.5)
                .ok();
            osc.frequency().set_value_at_time(65.41, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 1.5)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 1.6).ok();
        }

        /// Shield - metallic ping
        fn play_shield(&self, ctx: &AudioContext, vol: f32) {
            self.blip(ctx, 1200.0, OscillatorType::Square, vol * 0.15, 0.0, 0.25);
            self.blip(ctx, 600.0, OscillatorType::Sine, vol * 0.3, 0.0, 0.3);
        }

        /// Effect expired - soft falling pair
        fn play_expired(&self, ctx: &AudioContext, vol: f32) {
            self.blip(ctx, 660.0, OscillatorType::Sine, vol * 0.15, 0.0, 0.1);
            self.blip(ctx, 440.0, OscillatorType::Sine, vol * 0.15, 0.1, 0.15);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerUpKind;

    #[test]
    fn test_every_event_has_a_sound() {
        let events = [
            GameEvent::Shoot,
            GameEvent::Hit,
            GameEvent::PowerUp(PowerUpKind::Slow),
            GameEvent::LevelUp { next_level: 2 },
            GameEvent::GameOver { final_score: 10 },
            GameEvent::ShieldAbsorbed,
            GameEvent::EffectExpired(PowerUpKind::Multiplier),
        ];
        for event in &events {
            assert!(SoundEffect::for_event(event).is_some(), "{event:?}");
        }
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PowerUp(PowerUpKind::Shield)),
            Some(SoundEffect::PowerUp)
        );
    }
}
