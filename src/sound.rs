//! Completion sound playback. Tones are synthesized on the fly from
//! the pack's recipe instead of shipping audio assets.

use std::f32::consts::PI;

use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};

use crate::types::{SoundPack, Tone};

const SAMPLE_RATE: u32 = 44_100;

/// Owns the audio output stream for the lifetime of the app. Opening
/// the stream can fail (headless machine, missing device); playback
/// then stays silent rather than erroring, and the rest of the app
/// never notices.
pub struct SoundPlayer {
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl SoundPlayer {
    pub fn new() -> Self {
        Self {
            output: OutputStream::try_default().ok(),
        }
    }

    /// A player that never opens an audio device.
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { output: None }
    }

    /// Fire-and-forget playback of a pack's tone at `volume` (0..=1).
    pub fn play(&self, pack: &SoundPack, volume: f32) {
        let Some((_, handle)) = &self.output else {
            return;
        };
        let Ok(sink) = Sink::try_new(handle) else {
            return;
        };
        sink.set_volume(volume.clamp(0.0, 1.0));
        sink.append(render_tone(&pack.tone));
        sink.detach();
    }
}

fn render_tone(tone: &Tone) -> SamplesBuffer<f32> {
    SamplesBuffer::new(1, SAMPLE_RATE, tone_samples(tone))
}

/// Sum the tone's sine partials under an exponential decay envelope.
fn tone_samples(tone: &Tone) -> Vec<f32> {
    let total = (SAMPLE_RATE as u64 * tone.duration_ms as u64 / 1000) as usize;
    let mut samples = Vec::with_capacity(total);
    for i in 0..total {
        let t = i as f32 / SAMPLE_RATE as f32;
        let mut sample = 0.0;
        for &(freq, amp) in tone.partials {
            sample += (t * freq * 2.0 * PI).sin() * amp;
        }
        let envelope = (-tone.decay * t).exp();
        samples.push(sample * envelope * 0.2);
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SOUND_PACKS;

    #[test]
    fn clip_length_matches_recipe() {
        for pack in &SOUND_PACKS {
            let samples = tone_samples(&pack.tone);
            let expected = SAMPLE_RATE as usize * pack.tone.duration_ms as usize / 1000;
            assert_eq!(samples.len(), expected);
        }
    }

    #[test]
    fn samples_stay_in_sane_range() {
        for pack in &SOUND_PACKS {
            let ceiling: f32 =
                pack.tone.partials.iter().map(|&(_, amp)| amp).sum::<f32>() * 0.2 + f32::EPSILON;
            for sample in tone_samples(&pack.tone) {
                assert!(sample.is_finite());
                assert!(sample.abs() <= ceiling);
            }
        }
    }

    #[test]
    fn envelope_decays_toward_silence() {
        for pack in &SOUND_PACKS {
            let samples = tone_samples(&pack.tone);
            let rms = |window: &[f32]| {
                (window.iter().map(|s| s * s).sum::<f32>() / window.len() as f32).sqrt()
            };
            let head = rms(&samples[..1000]);
            let tail = rms(&samples[samples.len() - 1000..]);
            assert!(tail < head / 4.0);
        }
    }
}
