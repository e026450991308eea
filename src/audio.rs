//! Sound triggers
//!
//! The game only asks for sounds; how they are made is up to the sink. On the
//! browser `WebAudio` synthesizes them with oscillators, no external files needed.

/// Fire-and-forget sound output. Implementations must never fail loudly.
pub trait AudioSink {
    fn play_flap(&mut self);
    fn play_score(&mut self);
    fn play_hit(&mut self);
    fn set_muted(&mut self, muted: bool);
}

/// Sink that plays nothing (native runs and tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio {
    pub muted: bool,
}

impl AudioSink for SilentAudio {
    fn play_flap(&mut self) {}
    fn play_score(&mut self) {}
    fn play_hit(&mut self) {}

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::AudioSink;

    /// Web Audio synthesizer
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                muted: false,
            }
        }

        /// Resume the context (browsers require a user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Context and volume for a new sound, or `None` when silent
        fn ready(&self) -> Option<(&AudioContext, f32)> {
            if self.muted || self.master_volume <= 0.0 {
                return None;
            }
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some((ctx, self.master_volume))
        }

        fn create_osc(
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

        /// Quick square chirp, 300 → 400 → 350 Hz
        fn flap(ctx: &AudioContext, vol: f32) -> Option<()> {
            let (osc, gain) = Self::create_osc(ctx, 300.0, OscillatorType::Square)?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok()?;
            gain.gain().linear_ramp_to_value_at_time(vol * 0.2, t + 0.05).ok()?;
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.1).ok()?;
            osc.frequency().set_value_at_time(300.0, t).ok()?;
            osc.frequency().linear_ramp_to_value_at_time(400.0, t + 0.05).ok()?;
            osc.frequency().linear_ramp_to_value_at_time(350.0, t + 0.1).ok()?;

            osc.start().ok()?;
            osc.stop_with_when(t + 0.12).ok()
        }

        /// Rising sine chime
        fn score(ctx: &AudioContext, vol: f32) -> Option<()> {
            let (osc, gain) = Self::create_osc(ctx, 500.0, OscillatorType::Sine)?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok()?;
            gain.gain().linear_ramp_to_value_at_time(vol * 0.3, t + 0.1).ok()?;
            gain.gain().linear_ramp_to_value_at_time(vol * 0.2, t + 0.2).ok()?;
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.3).ok()?;
            osc.frequency().set_value_at_time(500.0, t).ok()?;
            osc.frequency().linear_ramp_to_value_at_time(600.0, t + 0.1).ok()?;
            osc.frequency().linear_ramp_to_value_at_time(800.0, t + 0.2).ok()?;
            osc.frequency().linear_ramp_to_value_at_time(1000.0, t + 0.3).ok()?;

            osc.start().ok()?;
            osc.stop_with_when(t + 0.32).ok()
        }

        /// Harsh impact: detuned sawtooth pair sweeping down
        fn hit(ctx: &AudioContext, vol: f32) -> Option<()> {
            let t = ctx.current_time();
            for (freq, level) in [(180.0, 0.4), (187.0, 0.25)] {
                let (osc, gain) = Self::create_osc(ctx, freq, OscillatorType::Sawtooth)?;
                gain.gain().set_value_at_time(vol * level, t).ok()?;
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok()?;
                osc.frequency().set_value_at_time(freq, t).ok()?;
                osc.frequency()
                    .exponential_ramp_to_value_at_time(40.0, t + 0.4)
                    .ok()?;
                osc.start().ok()?;
                osc.stop_with_when(t + 0.45).ok()?;
            }
            Some(())
        }
    }

    impl AudioSink for WebAudio {
        fn play_flap(&mut self) {
            if let Some((ctx, vol)) = self.ready() {
                Self::flap(ctx, vol);
            }
        }

        fn play_score(&mut self) {
            if let Some((ctx, vol)) = self.ready() {
                Self::score(ctx, vol);
            }
        }

        fn play_hit(&mut self) {
            if let Some((ctx, vol)) = self.ready() {
                Self::hit(ctx, vol);
            }
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
    }
}
