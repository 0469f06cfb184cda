/// Byte range into the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// A whitespace-delimited word on a source line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Word<'a> {
    pub text: &'a str,
    pub span: Span,
}

/// Command keywords. Matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Wave,
    Envelope,
    Slide,
    Pause,
    Loop,
    /// `}` on its own closes the current block.
    BlockEnd,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "WAVE" => Some(Keyword::Wave),
            "ENVELOPE" => Some(Keyword::Envelope),
            "SLIDE" => Some(Keyword::Slide),
            "PAUSE" => Some(Keyword::Pause),
            "LOOP" => Some(Keyword::Loop),
            "}" => Some(Keyword::BlockEnd),
            _ => None,
        }
    }
}
