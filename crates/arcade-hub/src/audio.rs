#[cfg(not(target_family = "wasm"))]
use std::cell::Cell;
#[cfg(target_family = "wasm")]
use std::cell::RefCell;

use arcade_core::config::{AudioConfig, ToneConfig};

/// UI sounds the hub can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Hover,
    Click,
}

/// Wraps the Web Audio API context.
///
/// Browsers only allow an `AudioContext` to start after a user gesture, so
/// the context is created by [`AudioManager::unlock`] on the first click and
/// kept for the rest of the page session. Until then every tone is a no-op.
pub struct AudioManager {
    config: AudioConfig,
    #[cfg(target_family = "wasm")]
    ctx: RefCell<Option<web_sys::AudioContext>>,
    #[cfg(not(target_family = "wasm"))]
    unlocked: Cell<bool>,
}

impl AudioManager {
    pub fn new(config: AudioConfig) -> Self {
        Self {
            config,
            #[cfg(target_family = "wasm")]
            ctx: RefCell::new(None),
            #[cfg(not(target_family = "wasm"))]
            unlocked: Cell::new(false),
        }
    }

    /// Create the audio context if it does not exist yet. Idempotent.
    pub fn unlock(&self) {
        if !self.config.enabled || self.is_unlocked() {
            return;
        }
        #[cfg(target_family = "wasm")]
        match web_sys::AudioContext::new() {
            Ok(ctx) => *self.ctx.borrow_mut() = Some(ctx),
            Err(e) => crate::diag::console_warn!("AudioContext unavailable: {e:?}"),
        }
        #[cfg(not(target_family = "wasm"))]
        {
            self.unlocked.set(true);
        }
    }

    pub fn is_unlocked(&self) -> bool {
        #[cfg(target_family = "wasm")]
        {
            self.ctx.borrow().is_some()
        }
        #[cfg(not(target_family = "wasm"))]
        {
            self.unlocked.get()
        }
    }

    pub fn play(&self, tone: Tone) {
        let settings = match tone {
            Tone::Hover => &self.config.hover,
            Tone::Click => &self.config.click,
        };
        self.play_tone(settings);
    }

    #[allow(unused_variables)]
    fn play_tone(&self, tone: &ToneConfig) {
        #[cfg(target_family = "wasm")]
        {
            let ctx = self.ctx.borrow();
            let Some(ctx) = ctx.as_ref() else {
                return;
            };
            let Ok(oscillator) = ctx.create_oscillator() else {
                return;
            };
            let Ok(gain_node) = ctx.create_gain() else {
                return;
            };

            oscillator.set_type(oscillator_type(tone.wave));
            oscillator.frequency().set_value(tone.frequency);

            let now = ctx.current_time();
            let end = now + tone.duration_secs;
            let gain = gain_node.gain();
            let _ = gain.set_value_at_time(tone.start_gain, now);
            let _ = gain.exponential_ramp_to_value_at_time(tone.end_gain, end);

            let _ = oscillator.connect_with_audio_node(&gain_node);
            let _ = gain_node.connect_with_audio_node(&ctx.destination());
            let _ = oscillator.start();
            let _ = oscillator.stop_with_when(end);
        }
    }
}

#[cfg(target_family = "wasm")]
fn oscillator_type(wave: arcade_core::config::Waveform) -> web_sys::OscillatorType {
    use arcade_core::config::Waveform;

    match wave {
        Waveform::Sine => web_sys::OscillatorType::Sine,
        Waveform::Square => web_sys::OscillatorType::Square,
        Waveform::Triangle => web_sys::OscillatorType::Triangle,
        Waveform::Sawtooth => web_sys::OscillatorType::Sawtooth,
    }
}
