use crate::dsp::envelope::Envelope;
use crate::dsp::oscillator::Waveform;
use crate::error::{Diagnostic, DiagnosticKind};
use crate::event::{EventSequence, NoteEvent, SynthState};
use crate::lexer::{Lexer, SourceLine};
use crate::pitch;
use crate::token::{Keyword, Word};

/// Everything a parse pass produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutput {
    pub events: EventSequence,
    /// Recoverable problems, in source order of discovery.
    pub diagnostics: Vec<Diagnostic>,
    /// Time cursor after the last line, in seconds. Includes trailing pauses.
    pub end_time: f64,
}

/// Line-oriented parser. Threads one `SynthState` and a time cursor through
/// the whole source, including every iteration of every loop.
pub struct Parser<'s, 'a> {
    lines: &'s [SourceLine<'a>],
    state: SynthState,
    events: EventSequence,
    diagnostics: Vec<Diagnostic>,
}

impl<'s, 'a> Parser<'s, 'a> {
    pub fn new(lines: &'s [SourceLine<'a>]) -> Self {
        Parser {
            lines,
            state: SynthState::default(),
            events: EventSequence::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn parse(mut self) -> ParseOutput {
        let mut cursor = 0;
        let end_time = self.parse_block(&mut cursor, self.lines.len(), 0.0);
        tracing::debug!(
            events = self.events.len(),
            warnings = self.diagnostics.len(),
            end_time,
            "parsed source"
        );
        ParseOutput {
            events: self.events,
            diagnostics: self.diagnostics,
            end_time,
        }
    }

    /// Parse lines from `*cursor` up to `end` (exclusive), starting at
    /// `start_time`. Stops early at a `}` line. Returns the advanced time.
    fn parse_block(&mut self, cursor: &mut usize, end: usize, start_time: f64) -> f64 {
        let lines = self.lines;
        let mut time = start_time;

        while *cursor < end {
            let line = &lines[*cursor];
            *cursor += 1;

            let Some(command) = line.command() else {
                continue;
            };

            match Keyword::from_word(command.text) {
                Some(Keyword::Wave) => {
                    // Unrecognized names leave the waveform unchanged.
                    if let Some(waveform) =
                        line.word(1).and_then(|w| Waveform::from_keyword(w.text))
                    {
                        self.state.waveform = waveform;
                    }
                }
                Some(Keyword::Envelope) => {
                    self.state.envelope = parse_envelope(line);
                }
                Some(Keyword::Slide) => {
                    self.state.slide = line.number(1).unwrap_or(0.0);
                }
                Some(Keyword::Pause) => {
                    if let Some(pause) = line.number(1).filter(|d| *d > 0.0) {
                        time += pause;
                    }
                    self.state.last_freq = None;
                }
                Some(Keyword::Loop) => {
                    time = self.parse_loop(line, command, cursor, end, time);
                }
                Some(Keyword::BlockEnd) => return time,
                None => {
                    time = self.parse_note(line, command, time);
                }
            }
        }

        time
    }

    /// `LOOP <count> {`: replay the body `count` times, carrying state and
    /// time across iterations. `*cursor` points at the first body line.
    fn parse_loop(
        &mut self,
        line: &SourceLine<'a>,
        keyword: &Word<'a>,
        cursor: &mut usize,
        end: usize,
        time: f64,
    ) -> f64 {
        let count = line.integer(1).unwrap_or(1);
        let body_start = *cursor;

        let Some(terminator) = self.find_block_end(body_start, end) else {
            // The body lines are then read once, as ordinary lines.
            self.report(DiagnosticKind::UnclosedLoop, line, keyword);
            return time;
        };

        let mut time = time;
        for _ in 0..count.max(0) {
            let mut body_cursor = body_start;
            time = self.parse_block(&mut body_cursor, terminator, time);
        }

        *cursor = terminator + 1;
        time
    }

    /// Index of the `}` line that closes a loop body starting at `start`.
    /// Inner `LOOP` lines each claim one `}` before the outer one matches.
    fn find_block_end(&self, start: usize, end: usize) -> Option<usize> {
        let mut depth = 0usize;
        for idx in start..end {
            let line = &self.lines[idx];
            if line.opens_loop() {
                depth += 1;
            } else if line.closes_block() {
                if depth == 0 {
                    return Some(idx);
                }
                depth -= 1;
            }
        }
        None
    }

    /// `<pitch> <duration>`: anything that isn't a command.
    fn parse_note(&mut self, line: &SourceLine<'a>, name: &Word<'a>, time: f64) -> f64 {
        let duration = line.number(1).unwrap_or(0.0);
        if duration <= 0.0 {
            // Zero or missing duration: a silent label line.
            return time;
        }

        match pitch::lookup(name.text) {
            Some(frequency) => {
                self.events.push(NoteEvent {
                    frequency,
                    duration,
                    start_time: time,
                    state: self.state,
                });
                self.state.last_freq = Some(frequency);
                time + duration
            }
            None => {
                self.report(
                    DiagnosticKind::UnknownNote {
                        name: name.text.to_string(),
                    },
                    line,
                    name,
                );
                time
            }
        }
    }

    fn report(&mut self, kind: DiagnosticKind, line: &SourceLine<'a>, word: &Word<'a>) {
        self.diagnostics.push(Diagnostic {
            kind,
            line: line.number,
            span: word.span,
        });
    }
}

/// `ENVELOPE <a> <d> <s> <r>`: each missing or unreadable field falls back
/// to its own default. Negative segment times are clamped to zero.
fn parse_envelope(line: &SourceLine<'_>) -> Envelope {
    let defaults = Envelope::default();
    let duration = |index, default: f64| line.number(index).unwrap_or(default).max(0.0);
    Envelope {
        attack: duration(1, defaults.attack),
        decay: duration(2, defaults.decay),
        sustain: line.number(3).unwrap_or(defaults.sustain),
        release: duration(4, defaults.release),
    }
}

/// Parse source text into events, collecting warnings instead of logging them.
pub fn parse_source(source: &str) -> ParseOutput {
    let lines = Lexer::new(source).lines();
    Parser::new(&lines).parse()
}
