/// Sound engine: procedural chiptune music and cues via rodio.
///
/// Two tracks, both generated as in-memory WAV buffers at init time:
///   - theme    background loop, restarted with every new maze
///   - victory  one-shot fanfare when the exit is reached
///
/// The theme plays on its own Sink so it can be stopped; the victory cue
/// is fire-and-forget.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::synth;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        theme: Arc<Vec<u8>>,
        victory: Arc<Vec<u8>>,
        music: Option<Sink>,
    }

    impl SoundEngine {
        /// `None` when no output device is available.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                theme: Arc::new(synth::make_wav(&synth::gen_theme())),
                victory: Arc::new(synth::make_wav(&synth::gen_victory())),
                music: None,
            })
        }

        /// (Re)start the background loop from the top.
        pub fn play_music(&mut self) {
            self.stop();
            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    log::debug!("could not open music sink: {e}");
                    return;
                }
            };
            let cursor = Cursor::new(self.theme.as_ref().clone());
            match rodio::Decoder::new_looped(cursor) {
                Ok(src) => {
                    sink.append(src);
                    self.music = Some(sink);
                }
                Err(e) => log::debug!("could not decode theme: {e}"),
            }
        }

        pub fn stop(&mut self) {
            if let Some(sink) = self.music.take() {
                sink.stop();
            }
        }

        pub fn play_victory(&self) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(self.victory.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }
    }
}

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
mod synth {
    use std::f32::consts::PI;

    pub const SAMPLE_RATE: u32 = 22050;

    /// Theme tempo: one step is an eighth note.
    const STEP_SECS: f32 = 0.16;

    /// (frequency Hz, steps). 0 Hz is a rest.
    const THEME: [(f32, u32); 16] = [
        (220.0, 2), (261.6, 1), (329.6, 1), (311.1, 2), (246.9, 2),
        (220.0, 1), (0.0, 1), (174.6, 2), (196.0, 1), (220.0, 1),
        (261.6, 2), (246.9, 2), (207.7, 1), (0.0, 1), (220.0, 3), (0.0, 1),
    ];

    /// Background theme: soft square lead over a drone a fifth below.
    pub fn gen_theme() -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, steps) in &THEME {
            let n = (SAMPLE_RATE as f32 * STEP_SECS * steps as f32) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = note_envelope(i, n);
                let lead = if freq > 0.0 { square(t, freq) * 0.5 * env } else { 0.0 };
                let drone = (t * 110.0 * 2.0 * PI).sin() * 0.15;
                samples.push((lead + drone) * 0.25);
            }
        }
        samples
    }

    /// Victory: rising major arpeggio, last note held.
    pub fn gen_victory() -> Vec<f32> {
        let notes = [(523.3_f32, 0.09), (659.3, 0.09), (784.0, 0.09), (1046.5, 0.4)];
        let mut samples = Vec::new();
        for &(freq, dur) in &notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.6;
                let wave = square(t, freq) * 0.6 + (t * freq * 2.0 * 2.0 * PI).sin() * 0.4;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    /// Softened square: sine with odd harmonics.
    fn square(t: f32, freq: f32) -> f32 {
        let w = t * freq * 2.0 * PI;
        w.sin() + (3.0 * w).sin() / 3.0 + (5.0 * w).sin() / 5.0
    }

    /// Short attack and release so notes don't click.
    fn note_envelope(i: usize, n: usize) -> f32 {
        let edge = (SAMPLE_RATE as usize / 200).min(n / 2).max(1);
        if i < edge {
            i as f32 / edge as f32
        } else if i + edge > n {
            (n - i) as f32 / edge as f32
        } else {
            1.0
        }
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a 16-bit mono PCM buffer
    // ════════════════════════════════════════════════════════════

    pub fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_music(&mut self) {}
    pub fn stop(&mut self) {}
    pub fn play_victory(&self) {}
}
