//! DSP Engine: offline synthesis of parsed note events.
//!
//! Oscillators and envelopes are pure functions of time, so rendering is
//! deterministic: the same event sequence always yields the same samples.

pub mod engine;
pub mod envelope;
pub mod mixer;
pub mod oscillator;
pub mod voice;
