//! `jshl`: compile JSHL music notation to an audio file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use jshl_core::dsp::engine::{AudioEngine, DEFAULT_SAMPLE_RATE};
use jshl_core::error::Diagnostic;
use jshl_core::export::{self, OutputFormat};

#[derive(ClapParser, Debug)]
#[command(
    name = "jshl",
    version,
    about = "JSHL compiler - converts JSHL music notation to audio files",
    after_help = "\
JSHL language:
  WAVE <type>         Set waveform: SINE, SQUARE, SAWTOOTH, TRIANGLE
  ENVELOPE A D S R    Configure ADSR envelope (seconds, 0-1)
  SLIDE <time>        Set pitch slide duration (seconds)
  <note> <duration>   Play note (C-1 to G9, sharps/flats supported)
  PAUSE <duration>    Add silence
  LOOP <count> { }    Repeat enclosed block"
)]
struct Cli {
    /// Input JSHL source file
    input: PathBuf,

    /// Output audio file
    #[arg(default_value = "output.wav")]
    output: PathBuf,

    /// Output format: wav, raw (default: from the output extension, else wav)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Sample rate in Hz
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_SAMPLE_RATE,
        value_parser = clap::value_parser!(u32).range(8000..=192000)
    )]
    rate: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Also write the parsed event list as JSON
    #[arg(long, value_name = "PATH")]
    events: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.input.extension().and_then(|e| e.to_str()) != Some("jshl") {
        tracing::warn!(
            "input file '{}' doesn't have .jshl extension",
            cli.input.display()
        );
    }

    let bytes = fs::read(&cli.input)
        .with_context(|| format!("cannot read file '{}'", cli.input.display()))?;
    let source = decode_source(&bytes);

    let parsed = jshl_core::parse_with_diagnostics(&source);
    let source_name = cli.input.display().to_string();
    for diagnostic in &parsed.diagnostics {
        report_diagnostic(&source_name, &source, diagnostic);
    }

    for event in parsed.events.iter() {
        tracing::debug!(
            start = event.start_time,
            duration = event.duration,
            frequency = event.frequency,
            waveform = ?event.state.waveform,
            "note"
        );
    }

    if let Some(path) = &cli.events {
        let json = serde_json::to_string_pretty(&parsed.events)?;
        fs::write(path, json)
            .with_context(|| format!("cannot write event list to '{}'", path.display()))?;
    }

    let engine = AudioEngine::new(cli.rate);
    let Some(buffer) = engine.render(&parsed.events) else {
        tracing::warn!("no notes to render, nothing written");
        return Ok(());
    };

    let format = output_format(cli.format, &cli.output);
    export::write(&cli.output, &buffer, format)
        .with_context(|| format!("cannot write to file '{}'", cli.output.display()))?;

    tracing::info!(
        "compiled {} notes, {:.2}s -> {} ({format}, {} Hz)",
        parsed.events.len(),
        buffer.duration(),
        cli.output.display(),
        buffer.sample_rate
    );

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Invalid UTF-8 (e.g. Latin-1 bytes in a comment) is replaced rather than
/// rejected.
fn decode_source(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Explicit `--format` wins, then the output extension, then WAV.
fn output_format(explicit: Option<OutputFormat>, output: &Path) -> OutputFormat {
    explicit
        .or_else(|| OutputFormat::from_extension(output))
        .unwrap_or(OutputFormat::Wav)
}

fn report_diagnostic(source_name: &str, source: &str, diagnostic: &Diagnostic) {
    let span = diagnostic.span.range();
    let result = Report::build(ReportKind::Warning, (source_name, span.clone()))
        .with_config(Config::default().with_index_type(IndexType::Byte))
        .with_message(diagnostic.kind.to_string())
        .with_label(Label::new((source_name, span)).with_message(diagnostic.kind.hint()))
        .finish()
        .eprint((source_name, Source::from(source)));

    if let Err(e) = result {
        tracing::warn!("{diagnostic} ({e})");
    }
}
