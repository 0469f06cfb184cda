pub mod dsp;
pub mod error;
pub mod event;
pub mod export;
pub mod lexer;
pub mod parser;
pub mod pitch;
pub mod token;

use crate::dsp::engine::{AudioEngine, SampleBuffer};
use crate::event::EventSequence;
use crate::parser::ParseOutput;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the jshl-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Parse `.jshl` source into a time-ordered event sequence.
/// Recoverable problems are logged as warnings and otherwise skipped.
pub fn parse(source: &str) -> EventSequence {
    let output = parse_with_diagnostics(source);
    for diagnostic in &output.diagnostics {
        tracing::warn!(line = diagnostic.line, "{}", diagnostic.kind);
    }
    output.events
}

/// Parse `.jshl` source, returning warnings alongside the events instead of
/// logging them.
pub fn parse_with_diagnostics(source: &str) -> ParseOutput {
    parser::parse_source(source)
}

/// Render events at `sample_rate`. `None` means there were no notes.
pub fn render(events: &EventSequence, sample_rate: u32) -> Option<SampleBuffer> {
    AudioEngine::new(sample_rate).render(events)
}

/// Parse and render in one step.
pub fn compile(source: &str, sample_rate: u32) -> Option<SampleBuffer> {
    render(&parse(source), sample_rate)
}

/// WASM-exposed: parse `.jshl` source into a JSON event list.
#[wasm_bindgen]
pub fn compile_song(source: &str) -> Result<JsValue, JsValue> {
    let events = parse(source);
    serde_wasm_bindgen::to_value(&events).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: compile and render `.jshl` source to a float WAV byte array.
/// Empty when the source has no notes.
#[wasm_bindgen]
pub fn render_song_wav(source: &str, sample_rate: u32) -> Result<Vec<u8>, JsValue> {
    match compile(source, sample_rate) {
        Some(buffer) => {
            export::encode_wav(&buffer).map_err(|e| JsValue::from_str(&format!("{e}")))
        }
        None => Ok(Vec::new()),
    }
}

/// WASM-exposed: compile and render `.jshl` source to mono f32 samples.
/// Returns the raw audio buffer for AudioWorklet playback.
#[wasm_bindgen]
pub fn render_song_samples(source: &str, sample_rate: u32) -> Vec<f32> {
    compile(source, sample_rate)
        .map(|buffer| buffer.samples)
        .unwrap_or_default()
}
