use serde::{Deserialize, Serialize};

use crate::dsp::envelope::Envelope;
use crate::dsp::oscillator::Waveform;

// ── Synth State ─────────────────────────────────────────────

/// The current instrument: every command except notes, `PAUSE` and `LOOP`
/// edits this, and every note carries a copy of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthState {
    pub waveform: Waveform,
    pub envelope: Envelope,
    /// Portamento time in seconds (0 = no slide).
    pub slide: f64,
    /// Frequency of the previously played note. Cleared by `PAUSE`.
    pub last_freq: Option<f64>,
}

impl Default for SynthState {
    fn default() -> Self {
        SynthState {
            waveform: Waveform::default(),
            envelope: Envelope::default(),
            slide: 0.0,
            last_freq: None,
        }
    }
}

// ── Note Events ─────────────────────────────────────────────

/// A single scheduled note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Pitch in Hz.
    pub frequency: f64,
    /// Held time in seconds, not counting release.
    pub duration: f64,
    /// Onset in seconds from the start of the piece.
    pub start_time: f64,
    /// Instrument snapshot taken when the note was parsed.
    pub state: SynthState,
}

impl NoteEvent {
    /// Time the note stops sounding, release tail included. A negative
    /// release counts as none.
    pub fn release_end(&self) -> f64 {
        self.start_time + self.duration + self.state.envelope.release.max(0.0)
    }

    /// Instantaneous frequency `note_t` seconds into the note. Slides
    /// linearly from the previous note's pitch when portamento is active.
    pub fn frequency_at(&self, note_t: f64) -> f64 {
        match self.state.last_freq {
            Some(from) if self.state.slide > 0.0 && note_t < self.state.slide => {
                from + (self.frequency - from) * (note_t / self.state.slide)
            }
            _ => self.frequency,
        }
    }
}

// ── Event Sequence ──────────────────────────────────────────

/// Notes in the order they were parsed. Start times never decrease.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventSequence {
    events: Vec<NoteEvent>,
}

impl EventSequence {
    pub fn new() -> Self {
        EventSequence { events: Vec::new() }
    }

    /// Append a note. Its start time must not precede the last note's.
    pub fn push(&mut self, event: NoteEvent) {
        debug_assert!(
            self.events
                .last()
                .is_none_or(|last| last.start_time <= event.start_time),
            "events must be appended in time order"
        );
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&NoteEvent> {
        self.events.last()
    }

    /// Latest `release_end` over all notes, or `None` when empty.
    pub fn release_end(&self) -> Option<f64> {
        self.events.iter().map(NoteEvent::release_end).reduce(f64::max)
    }
}

impl<'a> IntoIterator for &'a EventSequence {
    type Item = &'a NoteEvent;
    type IntoIter = std::slice::Iter<'a, NoteEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl From<Vec<NoteEvent>> for EventSequence {
    fn from(mut events: Vec<NoteEvent>) -> Self {
        events.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        EventSequence { events }
    }
}
