//! Stateless oscillators evaluated at absolute playback time.
//!
//! Phase is derived from global time rather than accumulated per note, so two
//! notes of the same pitch and waveform are always phase-aligned.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Supported waveform shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    #[default]
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Parse a `WAVE` argument. Only the exact uppercase names are accepted.
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "SINE" => Some(Waveform::Sine),
            "SQUARE" => Some(Waveform::Square),
            "SAWTOOTH" => Some(Waveform::Sawtooth),
            "TRIANGLE" => Some(Waveform::Triangle),
            _ => None,
        }
    }

    /// Loudness compensation so harmonically rich waveforms don't drown out
    /// a sine at the same envelope level.
    pub fn gain(self) -> f64 {
        match self {
            Waveform::Sine => 1.0,
            Waveform::Triangle => 0.8,
            Waveform::Square | Waveform::Sawtooth => 0.25,
        }
    }

    /// Oscillator value at frequency `freq` (Hz) and absolute time `t` (s).
    pub fn sample(self, freq: f64, t: f64) -> f64 {
        let phase = 2.0 * PI * freq * t;
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if phase.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            // Centered ramp with period 1/f.
            Waveform::Sawtooth => {
                let cycles = freq * t;
                2.0 * (cycles - (0.5 + cycles).floor())
            }
            Waveform::Triangle => phase.sin().asin() * (2.0 / PI),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44100.0;

    fn sweep(waveform: Waveform, freq: f64) -> impl Iterator<Item = f64> {
        (0..44100).map(move |i| waveform.sample(freq, i as f64 / SR))
    }

    #[test]
    fn sine_zero_at_start() {
        let s = Waveform::Sine.sample(440.0, 0.0);
        assert!(s.abs() < 1e-10, "Sine should start at 0, got {s}");
    }

    #[test]
    fn square_is_strictly_bipolar() {
        for s in sweep(Waveform::Square, 440.0) {
            assert!(s == 1.0 || s == -1.0, "Square must be ±1, got {s}");
        }
        assert_eq!(Waveform::Square.sample(440.0, 0.0), 1.0);
    }

    #[test]
    fn sawtooth_is_centered_ramp() {
        // A quarter period in: 2 * (0.25 - floor(0.75)) = 0.5
        let s = Waveform::Sawtooth.sample(1.0, 0.25);
        assert!((s - 0.5).abs() < 1e-12, "got {s}");
        // Just before the wrap it approaches +1, just after it sits near -1
        assert!(Waveform::Sawtooth.sample(1.0, 0.499) > 0.99);
        assert!(Waveform::Sawtooth.sample(1.0, 0.501) < -0.99);
        for s in sweep(Waveform::Sawtooth, 440.0) {
            assert!((-1.0..=1.0).contains(&s), "Saw out of range: {s}");
        }
    }

    #[test]
    fn triangle_peaks_at_quarter_period() {
        let s = Waveform::Triangle.sample(1.0, 0.25);
        assert!((s - 1.0).abs() < 1e-9, "Triangle should peak at 1, got {s}");
        let mid = Waveform::Triangle.sample(1.0, 0.125);
        assert!((mid - 0.5).abs() < 1e-9, "Triangle should be linear, got {mid}");
    }

    #[test]
    fn all_waveforms_in_range() {
        for wf in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Sawtooth,
            Waveform::Triangle,
        ] {
            for s in sweep(wf, 880.0) {
                assert!(s.abs() <= 1.0 + 1e-12, "{wf:?} out of range: {s}");
            }
        }
    }

    #[test]
    fn gain_compensation_constants() {
        assert_eq!(Waveform::Sine.gain(), 1.0);
        assert_eq!(Waveform::Triangle.gain(), 0.8);
        assert_eq!(Waveform::Square.gain(), 0.25);
        assert_eq!(Waveform::Sawtooth.gain(), 0.25);
    }

    #[test]
    fn keyword_names_are_exact() {
        assert_eq!(Waveform::from_keyword("SAWTOOTH"), Some(Waveform::Sawtooth));
        assert_eq!(Waveform::from_keyword("sine"), None);
        assert_eq!(Waveform::from_keyword("NOISE"), None);
    }
}
