use crate::token::Span;
use std::fmt;
use std::io;

/// A recoverable problem found while parsing. Parsing always continues.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 1-based source line.
    pub line: usize,
    /// The offending word.
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// A note-like line with a positive duration whose pitch didn't resolve.
    UnknownNote { name: String },
    /// `LOOP` with no matching `}` before the end of its block.
    UnclosedLoop,
}

impl DiagnosticKind {
    /// Short label for annotated source reports.
    pub fn hint(&self) -> &'static str {
        match self {
            DiagnosticKind::UnknownNote { .. } => "expected a pitch like C4, F#3 or Bb5",
            DiagnosticKind::UnclosedLoop => "this loop has no closing `}`",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnknownNote { name } => write!(f, "Unknown note '{name}'"),
            DiagnosticKind::UnclosedLoop => write!(f, "Unclosed LOOP"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}", self.kind, self.line)
    }
}

/// Failures while writing rendered audio.
#[derive(Debug)]
pub enum JshlError {
    Io(io::Error),
    Wav(hound::Error),
}

impl fmt::Display for JshlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JshlError::Io(e) => write!(f, "I/O error: {e}"),
            JshlError::Wav(e) => write!(f, "WAV encoding error: {e}"),
        }
    }
}

impl std::error::Error for JshlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JshlError::Io(e) => Some(e),
            JshlError::Wav(e) => Some(e),
        }
    }
}

impl From<io::Error> for JshlError {
    fn from(e: io::Error) -> Self {
        JshlError::Io(e)
    }
}

impl From<hound::Error> for JshlError {
    fn from(e: hound::Error) -> Self {
        JshlError::Wav(e)
    }
}
