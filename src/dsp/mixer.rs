//! Mixer: sums note contributions with master gain and hard clipping.

/// Global scale applied to the mix so several overlapping notes fit in range.
pub const MASTER_GAIN: f64 = 0.1;

/// A summing mixer that accumulates audio from many notes.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub master_gain: f64,
    buffer: Vec<f64>,
}

impl Mixer {
    pub fn new() -> Self {
        Mixer {
            master_gain: MASTER_GAIN,
            buffer: Vec::new(),
        }
    }

    /// Prepare a buffer of `num_samples` filled with zeros.
    pub fn clear(&mut self, num_samples: usize) {
        self.buffer.clear();
        self.buffer.resize(num_samples, 0.0);
    }

    /// Add a sample at the given index. Out-of-range indices are dropped.
    pub fn add(&mut self, index: usize, sample: f64) {
        if let Some(slot) = self.buffer.get_mut(index) {
            *slot += sample;
        }
    }

    /// The mixed output, scaled by master gain and hard-clipped to [-1, 1].
    pub fn output(&self) -> Vec<f32> {
        self.buffer
            .iter()
            .map(|&s| hard_clip(s * self.master_gain) as f32)
            .collect()
    }
}

fn hard_clip(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_previous_mix() {
        let mut m = Mixer::new();
        m.clear(3);
        m.add(1, 5.0);
        m.clear(2);
        assert_eq!(m.output(), vec![0.0, 0.0]);
    }

    #[test]
    fn accumulates_samples() {
        let mut m = Mixer::new();
        m.master_gain = 1.0;
        m.clear(4);
        m.add(0, 0.5);
        m.add(0, 0.25);
        m.add(1, -0.5);
        m.add(10, 1.0);
        let out = m.output();
        assert_eq!(out, vec![0.75, -0.5, 0.0, 0.0]);
    }

    #[test]
    fn master_gain_scales_mix() {
        let mut m = Mixer::new();
        m.clear(1);
        m.add(0, 2.0);
        assert!((m.output()[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn hard_clip_flattens_overflow() {
        let mut m = Mixer::new();
        m.master_gain = 1.0;
        m.clear(2);
        m.add(0, 100.0);
        m.add(1, -3.0);
        assert_eq!(m.output(), vec![1.0, -1.0]);
    }
}
