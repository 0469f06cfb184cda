//! Pitch spelling → frequency, in twelve-tone equal temperament.

/// Reference pitch A4 in Hz.
pub const A4_FREQUENCY: f64 = 440.0;

/// MIDI note number of A4.
pub const A4_MIDI: i32 = 69;

/// Highest valid MIDI note number.
pub const MAX_MIDI: i32 = 127;

/// Parse a pitch spelling (e.g. "C4", "F#3", "bb5", "C-1") into a MIDI note
/// number in `0..=127`.
///
/// The letter is case-insensitive; the accidental is `#` (sharp) or `b`
/// (flat); the octave is a signed integer. C4 = 60.
pub fn note_to_midi(note: &str) -> Option<u8> {
    let bytes = note.as_bytes();
    let base_semitone = match bytes.first()?.to_ascii_uppercase() {
        b'C' => 0,
        b'D' => 2,
        b'E' => 4,
        b'F' => 5,
        b'G' => 7,
        b'A' => 9,
        b'B' => 11,
        _ => return None,
    };

    let (accidental, idx) = match bytes.get(1) {
        Some(b'#') => (1, 2),
        Some(b'b') => (-1, 2),
        _ => (0, 1),
    };

    let octave: i32 = note[idx..].parse().ok()?;
    let midi = octave
        .checked_add(1)?
        .checked_mul(12)?
        .checked_add(base_semitone + accidental)?;

    if (0..=MAX_MIDI).contains(&midi) {
        Some(midi as u8)
    } else {
        None
    }
}

/// Convert a MIDI note number to frequency: `440 * 2^((midi - 69) / 12)`.
pub fn midi_to_frequency(midi: u8) -> f64 {
    A4_FREQUENCY * 2.0_f64.powf((midi as i32 - A4_MIDI) as f64 / 12.0)
}

/// Frequency of a pitch spelling in Hz, or `None` when the spelling is
/// malformed or falls outside the MIDI range.
pub fn lookup(name: &str) -> Option<f64> {
    note_to_midi(name).map(midi_to_frequency)
}
