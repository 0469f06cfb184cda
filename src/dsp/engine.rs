//! Audio Engine: renders an EventSequence to a mono sample buffer.
//!
//! Every note is rendered independently over its own attack-through-release
//! window and summed into a zeroed mix, which is then scaled and hard-clipped.

use crate::event::EventSequence;

use super::mixer::{MASTER_GAIN, Mixer};
use super::voice::{Voice, seconds_to_samples};

/// Sample rate used when the caller doesn't choose one.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Silence appended after the last release so the fade fully resolves.
pub const TAIL_SECONDS: f64 = 1.0;

/// Rendered mono audio. Samples are within [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl SampleBuffer {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length of the buffer in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Which note decides where the song ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EndMode {
    /// End after the release of the last note in sequence order (default).
    #[default]
    LastNote,
    /// End after whichever release finishes latest, so a long release on an
    /// earlier note is never cut short.
    LongestRelease,
}

/// The audio rendering engine.
#[derive(Debug, Clone)]
pub struct AudioEngine {
    pub sample_rate: u32,
    pub end_mode: EndMode,
    /// Scale applied to the summed mix before clipping.
    pub master_gain: f64,
    /// Extra seconds rendered after the latest release.
    pub tail_seconds: f64,
}

impl AudioEngine {
    pub fn new(sample_rate: u32) -> Self {
        AudioEngine {
            sample_rate,
            end_mode: EndMode::default(),
            master_gain: MASTER_GAIN,
            tail_seconds: TAIL_SECONDS,
        }
    }

    /// Buffer length needed for `events`, or `None` when there is nothing
    /// to render. A zero-length buffer is reported as `None` too.
    pub fn total_samples(&self, events: &EventSequence) -> Option<usize> {
        let end = match self.end_mode {
            EndMode::LastNote => events.last()?.release_end(),
            EndMode::LongestRelease => events.release_end()?,
        };
        let total = seconds_to_samples(end + self.tail_seconds, self.sample_rate as f64);
        (total > 0).then_some(total)
    }

    /// Render every note into a fresh buffer. Returns `None` for an empty
    /// sequence: no audio is produced, which is not a failure.
    pub fn render(&self, events: &EventSequence) -> Option<SampleBuffer> {
        let total_samples = self.total_samples(events)?;
        let sample_rate = self.sample_rate as f64;

        let mut mixer = Mixer::new();
        mixer.master_gain = self.master_gain;
        mixer.clear(total_samples);

        for note in events {
            let voice = Voice::new(note);
            for j in voice.sample_range(sample_rate, total_samples) {
                let t = j as f64 / sample_rate;
                mixer.add(j, voice.sample_at(t));
            }
        }

        let samples = mixer.output();
        tracing::debug!(
            notes = events.len(),
            samples = samples.len(),
            sample_rate = self.sample_rate,
            "rendered audio"
        );

        Some(SampleBuffer {
            sample_rate: self.sample_rate,
            samples,
        })
    }
}
