//! ADSR envelope evaluated as a pure function of note-relative time.

use serde::{Deserialize, Serialize};

/// ADSR envelope with linear attack/decay/release segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level [0, 1].
    pub sustain: f64,
    /// Release time in seconds, measured from the end of the note.
    pub release: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope {
            attack: 0.01,
            decay: 0.0,
            sustain: 1.0,
            release: 0.01,
        }
    }
}

impl Envelope {
    /// Gain at `note_t` seconds into a note that is held for `duration`
    /// seconds. Always within [0, 1].
    ///
    /// Segments are tested in order (attack, decay, sustain, release), so a
    /// note shorter than `attack + decay` is released from the sustain level
    /// rather than from wherever the ramp had reached. Zero-length segments
    /// are skipped, never divided by.
    pub fn gain_at(&self, note_t: f64, duration: f64) -> f64 {
        let gain = if note_t < 0.0 {
            0.0
        } else if note_t < self.attack {
            note_t / self.attack
        } else if note_t < self.attack + self.decay {
            let progress = (note_t - self.attack) / self.decay;
            1.0 - (1.0 - self.sustain) * progress
        } else if note_t < duration {
            self.sustain
        } else if note_t < duration + self.release {
            let progress = (note_t - duration) / self.release;
            self.sustain * (1.0 - progress)
        } else {
            0.0
        };
        gain.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(attack: f64, decay: f64, sustain: f64, release: f64) -> Envelope {
        Envelope {
            attack,
            decay,
            sustain,
            release,
        }
    }

    #[test]
    fn attack_ramps_linearly() {
        let e = env(0.1, 0.0, 1.0, 0.1);
        assert!((e.gain_at(0.05, 1.0) - 0.5).abs() < 1e-12);
        assert_eq!(e.gain_at(0.0, 1.0), 0.0);
    }

    #[test]
    fn decay_falls_to_sustain() {
        let e = env(0.1, 0.2, 0.4, 0.1);
        assert_eq!(e.gain_at(0.1, 1.0), 1.0);
        let halfway = e.gain_at(0.2, 1.0);
        assert!((halfway - 0.7).abs() < 1e-12, "got {halfway}");
        assert!((e.gain_at(0.5, 1.0) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn release_fades_from_sustain() {
        let e = env(0.0, 0.0, 0.6, 0.2);
        assert!((e.gain_at(1.1, 1.0) - 0.3).abs() < 1e-12);
        assert_eq!(e.gain_at(1.2, 1.0), 0.0);
        assert_eq!(e.gain_at(5.0, 1.0), 0.0);
    }

    #[test]
    fn zero_attack_starts_at_full_gain() {
        let e = env(0.0, 0.0, 1.0, 0.01);
        assert_eq!(e.gain_at(0.0, 1.0), 1.0);
    }

    #[test]
    fn zero_release_cuts_at_note_end() {
        let e = env(0.0, 0.0, 1.0, 0.0);
        assert_eq!(e.gain_at(0.999, 1.0), 1.0);
        assert_eq!(e.gain_at(1.0, 1.0), 0.0);
    }

    #[test]
    fn short_note_stays_in_range() {
        // Note far shorter than attack + decay
        let e = env(0.5, 0.5, 0.3, 0.2);
        let mut t = 0.0;
        while t < 2.0 {
            let g = e.gain_at(t, 0.1);
            assert!((0.0..=1.0).contains(&g), "gain out of range at {t}: {g}");
            t += 0.001;
        }
    }

    #[test]
    fn malformed_levels_are_clamped() {
        let e = env(0.0, 0.1, 3.0, 0.1);
        for i in 0..200 {
            let g = e.gain_at(i as f64 * 0.01, 1.0);
            assert!((0.0..=1.0).contains(&g), "gain out of range: {g}");
        }
        let negative = env(0.0, 0.0, -0.5, 0.1);
        assert_eq!(negative.gain_at(0.5, 1.0), 0.0);
    }
}
