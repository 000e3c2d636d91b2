//! Audio system using Web Audio API
//!
//! Everything is synthesized at runtime: short oscillator blips for sound
//! effects and one background track rendered into a looping buffer.

#[cfg(target_arch = "wasm32")]
use web_sys::{
    AudioBufferSourceNode, AudioContext, AudioContextState, GainNode, OscillatorNode,
    OscillatorType,
};

/// Background track tempo
const MUSIC_BPM: f32 = 140.0;
/// Each step is an eighth note
const STEPS_PER_BEAT: f32 = 2.0;

/// Lead line as MIDI notes, one per step (0 = rest)
const MELODY: [u8; 32] = [
    72, 0, 76, 79, 76, 0, 72, 74, //
    76, 0, 79, 81, 79, 76, 74, 0, //
    72, 0, 76, 79, 84, 0, 81, 79, //
    77, 76, 74, 76, 72, 0, 0, 0,
];

/// Bass line, one note per beat (two steps)
const BASS: [u8; 16] = [48, 48, 55, 55, 57, 57, 53, 55, 48, 48, 55, 55, 53, 53, 55, 43];

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ground jump
    Jump,
    /// Mid-air jump
    DoubleJump,
    /// Collectible picked up
    Collect,
    /// Hit an obstacle
    Crash,
    /// Run beat the best score
    NewRecord,
}

fn midi_to_freq(note: u8) -> f32 {
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

/// Length of one sequencer step in seconds
pub fn step_seconds() -> f32 {
    60.0 / MUSIC_BPM / STEPS_PER_BEAT
}

/// Render the background loop as mono samples in [-1, 1]
///
/// Notes decay to silence within their step, so the buffer loops without a
/// click.
pub fn synthesize_track(sample_rate: f32) -> Vec<f32> {
    let step_len = (step_seconds() * sample_rate).round() as usize;
    let mut samples = vec![0.0f32; step_len * MELODY.len()];

    for (step, chunk) in samples.chunks_mut(step_len).enumerate() {
        let lead = MELODY[step];
        let bass = BASS[step / 2];
        // Bass notes ring for two steps
        let bass_offset = (step % 2) * step_len;
        let bass_len = step_len * 2;

        for (i, sample) in chunk.iter_mut().enumerate() {
            let mut value = 0.0;

            if lead != 0 {
                let t = i as f32 / sample_rate;
                let phase = (t * midi_to_freq(lead)).fract();
                // Soft square: pulse blended with its fundamental
                let pulse = if phase < 0.5 { 1.0 } else { -1.0 };
                let sine = (phase * std::f32::consts::TAU).sin();
                value += (pulse * 0.4 + sine * 0.6) * envelope(i, step_len) * 0.3;
            }

            let j = bass_offset + i;
            let t = j as f32 / sample_rate;
            let phase = (t * midi_to_freq(bass)).fract();
            // Triangle wave
            let tri = 4.0 * (phase - 0.5).abs() - 1.0;
            value += tri * envelope(j, bass_len) * 0.25;

            *sample = value.clamp(-1.0, 1.0);
        }
    }

    samples
}

/// Short attack, linear release to zero at the end of the note
fn envelope(i: usize, len: usize) -> f32 {
    let attack = (len / 40).max(1);
    let release_start = len * 3 / 4;
    if i < attack {
        i as f32 / attack as f32
    } else if i < release_start {
        1.0
    } else {
        (len - i) as f32 / (len - release_start) as f32
    }
}

/// Audio manager for the game
#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    music_volume: f32,
    music_gain: Option<GainNode>,
    music_source: Option<AudioBufferSourceNode>,
}

#[cfg(target_arch = "wasm32")]
impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_volume: 1.0,
            music_volume: 0.4,
            music_gain: None,
            music_source: None,
        }
    }

    /// Apply effective volumes from settings
    pub fn apply_settings(&mut self, settings: &crate::Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.set_music_volume(settings.effective_music_volume());
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        if let Some(gain) = &self.music_gain {
            gain.gain().set_value(self.music_volume);
        }
    }

    /// Ask the browser to resume the context
    ///
    /// Resolves once audio may play; rejects when autoplay is blocked.
    pub fn resume(&self) -> Option<wasm_bindgen_futures::JsFuture> {
        let ctx = self.ctx.as_ref()?;
        match ctx.resume() {
            Ok(promise) => Some(wasm_bindgen_futures::JsFuture::from(promise)),
            Err(e) => {
                log::warn!("AudioContext.resume failed: {:?}", e);
                None
            }
        }
    }

    /// Whether the context is actually producing sound
    pub fn is_running(&self) -> bool {
        self.ctx
            .as_ref()
            .is_some_and(|ctx| ctx.state() == AudioContextState::Running)
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_source.is_some()
    }

    /// Start the looping background track (no-op if already playing)
    pub fn start_music(&mut self) {
        if self.music_source.is_some() {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match Self::build_music(ctx, self.music_volume) {
            Some((source, gain)) => {
                self.music_source = Some(source);
                self.music_gain = Some(gain);
                log::info!("Music started");
            }
            None => log::warn!("Failed to start music"),
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(source) = self.music_source.take() {
            source.stop().ok();
            log::info!("Music stopped");
        }
        self.music_gain = None;
    }

    fn build_music(ctx: &AudioContext, vol: f32) -> Option<(AudioBufferSourceNode, GainNode)> {
        let sample_rate = ctx.sample_rate();
        let mut samples = synthesize_track(sample_rate);

        let buffer = ctx
            .create_buffer(1, samples.len() as u32, sample_rate)
            .ok()?;
        buffer.copy_to_channel(&mut samples, 0).ok()?;

        let source = ctx.create_buffer_source().ok()?;
        let gain = ctx.create_gain().ok()?;
        source.set_buffer(Some(&buffer));
        source.set_loop(true);
        gain.gain().set_value(vol);
        source.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        source.start().ok()?;

        Some((source, gain))
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Jump => self.play_sweep(ctx, vol, 300.0, 600.0, 0.12),
            SoundEffect::DoubleJump => self.play_double_jump(ctx, vol),
            SoundEffect::Collect => self.play_collect(ctx, vol),
            SoundEffect::Crash => self.play_crash(ctx, vol),
            SoundEffect::NewRecord => self.play_new_record(ctx, vol),
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

    /// Rising chirp
    fn play_sweep(&self, ctx: &AudioContext, vol: f32, from: f32, to: f32, secs: f64) {
        let Some((osc, gain)) = self.create_osc(ctx, from, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + secs)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + secs)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + secs + 0.03).ok();
    }

    /// Double jump - higher chirp with a triangle sparkle
    fn play_double_jump(&self, ctx: &AudioContext, vol: f32) {
        self.play_sweep(ctx, vol, 500.0, 900.0, 0.1);

        if let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Triangle) {
            let t = ctx.current_time() + 0.04;
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.12).ok();
        }
    }

    /// Collect - happy ding
    fn play_collect(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.06;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Crash - low thud then a sad descending line
    fn play_crash(&self, ctx: &AudioContext, vol: f32) {
        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.45, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = 0.2 + i as f64 * 0.18;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// New record - celebratory arpeggio
    fn play_new_record(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_length_matches_sequence() {
        let rate = 8000.0;
        let samples = synthesize_track(rate);
        let step_len = (step_seconds() * rate).round() as usize;
        assert_eq!(samples.len(), step_len * MELODY.len());
    }

    #[test]
    fn test_track_stays_in_range_and_loops_cleanly() {
        let samples = synthesize_track(8000.0);
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!(samples.iter().any(|s| s.abs() > 0.1));
        // Starts from silence and fades out at the seam
        assert!(samples[0].abs() < 1e-3);
        assert!(samples[samples.len() - 1].abs() < 0.05);
    }

    #[test]
    fn test_midi_to_freq() {
        assert!((midi_to_freq(69) - 440.0).abs() < 1e-3);
        assert!((midi_to_freq(81) - 880.0).abs() < 1e-2);
    }
}
