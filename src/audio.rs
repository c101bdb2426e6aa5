//! Sound cues
//!
//! Procedurally generated with the Web Audio API - no sample files. The
//! simulation only sees the [`AudioCues`] trait.

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    /// A stalk was hit; intensity 1.0 when severed, 0.5 when only damaged
    Cut,
    /// Severed close to its center
    PerfectCut,
    /// Combo reached the cue threshold
    Combo,
}

/// Fire-and-forget cue sink
pub trait AudioCues {
    fn play(&mut self, cue: CueKind, intensity: f32);
}

/// Silent sink for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioCues for NullAudio {
    fn play(&mut self, _cue: CueKind, _intensity: f32) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{
        AudioContext, AudioNode, BiquadFilterType, GainNode, OscillatorNode, OscillatorType,
    };

    use super::{AudioCues, CueKind};

    /// Web Audio cue player.
    ///
    /// Browsers refuse to start an AudioContext outside a user gesture. Cues
    /// only fire from pointer-up handlers, so the context is created on the
    /// first cue.
    #[derive(Default)]
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        /// Context creation failed once; stay silent
        disabled: bool,
    }

    impl WebAudio {
        pub fn new() -> Self {
            Self::default()
        }

        /// Create (or resume) the audio context. Call from a gesture handler.
        fn unlock(&mut self) {
            if self.disabled {
                return;
            }
            match &self.ctx {
                Some(ctx) => {
                    if ctx.state() == web_sys::AudioContextState::Suspended {
                        let _ = ctx.resume();
                    }
                }
                None => match AudioContext::new() {
                    Ok(ctx) => {
                        log::info!("Audio context created");
                        self.ctx = Some(ctx);
                    }
                    Err(e) => {
                        log::warn!("Failed to create AudioContext - audio disabled: {:?}", e);
                        self.disabled = true;
                    }
                },
            }
        }

        /// Oscillator -> [through] -> gain -> destination
        fn voice(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
            through: Option<&AudioNode>,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            match through {
                Some(node) => {
                    osc.connect_with_audio_node(node).ok()?;
                    node.connect_with_audio_node(&gain).ok()?;
                }
                None => {
                    osc.connect_with_audio_node(&gain).ok()?;
                }
            }
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Blade swish - random sawtooth through a rising high-pass
        fn play_cut(ctx: &AudioContext, intensity: f32) {
            let Ok(filter) = ctx.create_biquad_filter() else {
                return;
            };
            filter.set_type(BiquadFilterType::Highpass);
            let freq = 200.0 + js_sys::Math::random() as f32 * 300.0;
            let node: &AudioNode = &filter;
            let Some((osc, gain)) = Self::voice(ctx, freq, OscillatorType::Sawtooth, Some(node))
            else {
                return;
            };
            let t = ctx.current_time();

            filter.frequency().set_value_at_time(1000.0, t).ok();
            filter
                .frequency()
                .linear_ramp_to_value_at_time(3000.0, t + 0.1)
                .ok();
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(0.3 * intensity, t + 0.01)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// Perfect cut - rising sine
        fn play_perfect(ctx: &AudioContext) {
            let Some((osc, gain)) = Self::voice(ctx, 880.0, OscillatorType::Sine, None) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(880.0, t).ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(1320.0, t + 0.1)
                .ok();
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.2, t + 0.05).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.3)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// Combo - three-note triangle arpeggio
        fn play_combo(ctx: &AudioContext) {
            for i in 0..3 {
                let freq = 440.0 * (1.0 + i as f32 * 0.5);
                let Some((osc, gain)) = Self::voice(ctx, freq, OscillatorType::Triangle, None)
                else {
                    continue;
                };
                let t = ctx.current_time() + i as f64 * 0.1;
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().linear_ramp_to_value_at_time(0.1, t + 0.05).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    impl AudioCues for WebAudio {
        fn play(&mut self, cue: CueKind, intensity: f32) {
            self.unlock();
            let Some(ctx) = &self.ctx else { return };

            match cue {
                CueKind::Cut => Self::play_cut(ctx, intensity.clamp(0.0, 1.0)),
                CueKind::PerfectCut => Self::play_perfect(ctx),
                CueKind::Combo => Self::play_combo(ctx),
            }
        }
    }
}
