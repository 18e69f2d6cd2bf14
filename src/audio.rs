//! Audio collaborator seam
//!
//! The arena only emits intent ([`Cue`]s). Sinks decide what that sounds like;
//! every sink call is a no-op until `init` has succeeded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Kind;

/// Discrete audio intent emitted by the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    Spawn(Kind),
    Transform { from: Kind, to: Kind },
    StartAmbience(Kind),
    StopAmbience,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio unavailable: {0}")]
    Unavailable(String),
}

/// What the arena needs from an audio engine
pub trait AudioSink {
    fn init(&mut self) -> Result<(), AudioError>;

    /// Browsers keep audio suspended until a user gesture
    fn resume_on_user_gesture(&mut self);

    fn play_spawn_cue(&mut self, kind: Kind);

    /// Sweep from the loser's tone to the winner's
    fn play_transform_cue(&mut self, from: Kind, to: Kind);

    /// Replace any running ambience with the one for `kind`
    fn start_dominant_ambience(&mut self, kind: Kind);

    /// Silence ambience; safe when nothing is playing
    fn stop_ambience(&mut self);

    fn set_muted(&mut self, muted: bool);

    fn is_muted(&self) -> bool;

    /// Master volume, 0.0 - 1.0
    fn set_volume(&mut self, _volume: f32) {}

    fn volume(&self) -> f32 {
        1.0
    }
}

/// Silent sink
#[derive(Debug, Default)]
pub struct NullAudio {
    muted: bool,
}

impl AudioSink for NullAudio {
    fn init(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
    fn resume_on_user_gesture(&mut self) {}
    fn play_spawn_cue(&mut self, _kind: Kind) {}
    fn play_transform_cue(&mut self, _from: Kind, _to: Kind) {}
    fn start_dominant_ambience(&mut self, _kind: Kind) {}
    fn stop_ambience(&mut self) {}
    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
    fn is_muted(&self) -> bool {
        self.muted
    }
}

/// Sink that records cues in order (headless runs and tests)
#[derive(Debug)]
pub struct CueLog {
    initialized: bool,
    muted: bool,
    volume: f32,
    ambience: Option<Kind>,
    cues: Vec<Cue>,
}

impl Default for CueLog {
    fn default() -> Self {
        Self {
            initialized: false,
            muted: false,
            volume: 1.0,
            ambience: None,
            cues: Vec::new(),
        }
    }
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Ambience currently playing
    pub fn ambience(&self) -> Option<Kind> {
        self.ambience
    }

    fn record(&mut self, cue: Cue) {
        if self.initialized {
            log::trace!("cue {:?}", cue);
            self.cues.push(cue);
        }
    }
}

impl AudioSink for CueLog {
    fn init(&mut self) -> Result<(), AudioError> {
        self.initialized = true;
        Ok(())
    }

    fn resume_on_user_gesture(&mut self) {}

    fn play_spawn_cue(&mut self, kind: Kind) {
        self.record(Cue::Spawn(kind));
    }

    fn play_transform_cue(&mut self, from: Kind, to: Kind) {
        self.record(Cue::Transform { from, to });
    }

    fn start_dominant_ambience(&mut self, kind: Kind) {
        if self.initialized {
            self.ambience = Some(kind);
        }
        self.record(Cue::StartAmbience(kind));
    }

    fn stop_ambience(&mut self) {
        self.ambience = None;
        self.record(Cue::StopAmbience);
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::WebAudio;

/// Procedural tones via the Web Audio API - no sound files
#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioError, AudioSink};
    use crate::sim::Kind;

    const MASTER_GAIN: f32 = 0.5;
    const AMBIENCE_GAIN: f32 = 0.15;

    /// Spawn tone per kind
    fn spawn_tone(kind: Kind) -> (f32, OscillatorType) {
        match kind {
            Kind::Rock => (150.0, OscillatorType::Square),
            Kind::Paper => (300.0, OscillatorType::Sine),
            Kind::Scissors => (450.0, OscillatorType::Triangle),
        }
    }

    /// Transform sweep endpoints (C3, C4, G4)
    fn sweep_tone(kind: Kind) -> f32 {
        match kind {
            Kind::Rock => 130.81,
            Kind::Paper => 261.63,
            Kind::Scissors => 392.00,
        }
    }

    /// Ambience chord per dominant kind
    fn chord(kind: Kind) -> [f32; 3] {
        match kind {
            Kind::Rock => [130.81, 164.81, 196.00],
            Kind::Paper => [261.63, 329.63, 392.00],
            Kind::Scissors => [392.00, 493.88, 587.33],
        }
    }

    /// Web Audio sink
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master: Option<GainNode>,
        ambience_gain: Option<GainNode>,
        ambience_oscs: Vec<OscillatorNode>,
        ambience: Option<Kind>,
        muted: bool,
        volume: f32,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self {
                ctx: None,
                master: None,
                ambience_gain: None,
                ambience_oscs: Vec::new(),
                ambience: None,
                muted: false,
                volume: 1.0,
            }
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            Self::default()
        }

        fn master_level(&self) -> f32 {
            if self.muted { 0.0 } else { MASTER_GAIN * self.volume }
        }

        fn apply_master_level(&self) {
            if let Some(master) = &self.master {
                master.gain().set_value(self.master_level());
            }
        }

        /// Oscillator routed through its own gain into the master bus
        fn create_osc(&self, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
            let ctx = self.ctx.as_ref()?;
            let master = self.master.as_ref()?;
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(master).ok()?;

            Some((osc, gain))
        }

        fn now(&self) -> Option<f64> {
            if self.muted {
                return None;
            }
            self.ctx.as_ref().map(|ctx| ctx.current_time())
        }
    }

    impl AudioSink for WebAudio {
        fn init(&mut self) -> Result<(), AudioError> {
            if self.ctx.is_some() {
                return Ok(());
            }
            let unavailable = |e: wasm_bindgen::JsValue| AudioError::Unavailable(format!("{e:?}"));

            let ctx = AudioContext::new().map_err(unavailable)?;
            let master = ctx.create_gain().map_err(unavailable)?;
            master.gain().set_value(self.master_level());
            master
                .connect_with_audio_node(&ctx.destination())
                .map_err(unavailable)?;

            let ambience_gain = ctx.create_gain().map_err(unavailable)?;
            ambience_gain.gain().set_value(0.0);
            ambience_gain.connect_with_audio_node(&master).map_err(unavailable)?;

            self.ctx = Some(ctx);
            self.master = Some(master);
            self.ambience_gain = Some(ambience_gain);
            Ok(())
        }

        fn resume_on_user_gesture(&mut self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                    log::info!("AudioContext resumed");
                }
            }
        }

        fn play_spawn_cue(&mut self, kind: Kind) {
            let Some(t) = self.now() else { return };
            let (freq, wave) = spawn_tone(kind);
            let Some((osc, gain)) = self.create_osc(freq, wave) else {
                return;
            };

            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.2, t + 0.02).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        fn play_transform_cue(&mut self, from: Kind, to: Kind) {
            let Some(t) = self.now() else { return };
            let Some((osc, gain)) = self.create_osc(sweep_tone(from), OscillatorType::Sine) else {
                return;
            };

            osc.frequency().set_value_at_time(sweep_tone(from), t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(sweep_tone(to), t + 0.2)
                .ok();
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.15, t + 0.02).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        fn start_dominant_ambience(&mut self, kind: Kind) {
            if self.ctx.is_none() || self.ambience == Some(kind) {
                return;
            }
            self.stop_ambience();
            self.ambience = Some(kind);

            let (Some(ctx), Some(bus)) = (self.ctx.as_ref(), self.ambience_gain.as_ref()) else {
                return;
            };
            let t = ctx.current_time();

            let mut oscs = Vec::with_capacity(3);
            for (i, freq) in chord(kind).into_iter().enumerate() {
                let (Ok(osc), Ok(gain)) = (ctx.create_oscillator(), ctx.create_gain()) else {
                    continue;
                };
                osc.set_type(OscillatorType::Sine);
                osc.frequency().set_value_at_time(freq, t).ok();
                // Slight detune for richness
                osc.detune().set_value_at_time((i as f32 - 1.0) * 2.0, t).ok();
                gain.gain().set_value_at_time(0.1, t).ok();

                if osc.connect_with_audio_node(&gain).is_err() || gain.connect_with_audio_node(bus).is_err() {
                    continue;
                }
                osc.start().ok();
                oscs.push(osc);
            }

            // Fade in
            bus.gain().set_value_at_time(0.0, t).ok();
            bus.gain().linear_ramp_to_value_at_time(AMBIENCE_GAIN, t + 1.0).ok();
            self.ambience_oscs = oscs;
        }

        fn stop_ambience(&mut self) {
            self.ambience = None;
            let (Some(ctx), Some(bus)) = (self.ctx.as_ref(), self.ambience_gain.as_ref()) else {
                return;
            };
            let t = ctx.current_time();

            // Fade out
            bus.gain().linear_ramp_to_value_at_time(0.0, t + 0.5).ok();
            for osc in self.ambience_oscs.drain(..) {
                osc.stop_with_when(t + 0.5).ok();
            }
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            self.apply_master_level();
        }

        fn is_muted(&self) -> bool {
            self.muted
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
            self.apply_master_level();
        }

        fn volume(&self) -> f32 {
            self.volume
        }
    }
}
