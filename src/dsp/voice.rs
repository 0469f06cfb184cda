//! Voice: one note's oscillator shaped by its envelope.

use std::ops::Range;

use crate::event::NoteEvent;

/// A note being rendered. Stateless: every sample is computed directly from
/// absolute time, so samples can be evaluated in any order.
#[derive(Debug, Clone, Copy)]
pub struct Voice<'a> {
    note: &'a NoteEvent,
}

impl<'a> Voice<'a> {
    pub fn new(note: &'a NoteEvent) -> Self {
        Voice { note }
    }

    /// Sample indices the note can touch: from its onset to the end of its
    /// release, clipped to `total_samples`.
    pub fn sample_range(&self, sample_rate: f64, total_samples: usize) -> Range<usize> {
        let start = seconds_to_samples(self.note.start_time, sample_rate);
        let end = seconds_to_samples(self.note.release_end(), sample_rate).min(total_samples);
        start.min(end)..end
    }

    /// Contribution at absolute time `t`, before master gain.
    pub fn sample_at(&self, t: f64) -> f64 {
        let note_t = t - self.note.start_time;
        if note_t < 0.0 {
            return 0.0;
        }

        let state = &self.note.state;
        let gain = state.envelope.gain_at(note_t, self.note.duration);
        if gain == 0.0 {
            return 0.0;
        }

        let freq = self.note.frequency_at(note_t);
        state.waveform.sample(freq, t) * gain * state.waveform.gain()
    }
}

/// Convert seconds to a sample index, rounding to the nearest sample.
pub fn seconds_to_samples(seconds: f64, sample_rate: f64) -> usize {
    (seconds * sample_rate).round().max(0.0) as usize
}
