use crate::token::{Keyword, Span, Word};

/// One line of source, with leading whitespace and line terminators removed.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine<'a> {
    /// 1-based line number.
    pub number: usize,
    pub text: &'a str,
    pub span: Span,
    pub words: Vec<Word<'a>>,
}

impl<'a> SourceLine<'a> {
    pub fn is_blank(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_comment(&self) -> bool {
        self.text.starts_with('#')
    }

    /// The command word, or `None` for blank and comment lines.
    pub fn command(&self) -> Option<&Word<'a>> {
        if self.is_comment() {
            return None;
        }
        self.words.first()
    }

    pub fn word(&self, index: usize) -> Option<&Word<'a>> {
        self.words.get(index)
    }

    /// Numeric prefix of the word at `index`, if it has one.
    pub fn number(&self, index: usize) -> Option<f64> {
        self.word(index).and_then(|w| leading_number(w.text))
    }

    /// Integer prefix of the word at `index`, if it has one.
    pub fn integer(&self, index: usize) -> Option<i64> {
        self.word(index).and_then(|w| leading_integer(w.text))
    }

    /// True when the first word is `LOOP`.
    pub fn opens_loop(&self) -> bool {
        self.command()
            .is_some_and(|w| Keyword::from_word(w.text) == Some(Keyword::Loop))
    }

    /// True when a `}` appears anywhere on a non-comment line.
    pub fn closes_block(&self) -> bool {
        !self.is_comment() && self.text.contains('}')
    }
}

pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input }
    }

    /// Split the input on `\n`. Each line is cut at its first `\r`, and
    /// words are separated by spaces and tabs.
    pub fn lines(&self) -> Vec<SourceLine<'a>> {
        let mut lines = Vec::new();
        let mut offset = 0;
        for (idx, raw) in self.input.split('\n').enumerate() {
            let line_start = offset;
            offset += raw.len() + 1;

            let content = match raw.find('\r') {
                Some(cut) => &raw[..cut],
                None => raw,
            };
            let trimmed = content.trim_start_matches([' ', '\t']);
            let text_start = line_start + (content.len() - trimmed.len());

            lines.push(SourceLine {
                number: idx + 1,
                text: trimmed,
                span: Span::new(text_start, text_start + trimmed.len()),
                words: split_words(trimmed, text_start),
            });
        }
        lines
    }
}

fn split_words(text: &str, base: usize) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in text.char_indices() {
        let is_sep = ch == ' ' || ch == '\t';
        match (start, is_sep) {
            (None, false) => start = Some(i),
            (Some(s), true) => {
                words.push(Word {
                    text: &text[s..i],
                    span: Span::new(base + s, base + i),
                });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push(Word {
            text: &text[s..],
            span: Span::new(base + s, base + text.len()),
        });
    }
    words
}

/// Byte length of the longest prefix of `text` that reads as a decimal number
/// (optional sign, digits with an optional fraction, optional exponent).
fn numeric_prefix_len(text: &str, allow_fraction: bool) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut idx = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        idx += 1;
    }

    let int_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    let mut digits = idx - int_start;

    if allow_fraction && idx < bytes.len() && bytes[idx] == b'.' {
        let frac_start = idx + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if digits > 0 || end > frac_start {
            digits += end - frac_start;
            idx = end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if allow_fraction && idx < bytes.len() && matches!(bytes[idx], b'e' | b'E') {
        let mut end = idx + 1;
        if matches!(bytes.get(end), Some(b'+') | Some(b'-')) {
            end += 1;
        }
        let exp_digits = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > exp_digits {
            idx = end;
        }
    }

    Some(idx)
}

/// Read a float from the start of `text`, ignoring trailing garbage.
/// `"0.5s"` reads as 0.5; `"abc"` has no numeric prefix.
pub fn leading_number(text: &str) -> Option<f64> {
    let len = numeric_prefix_len(text, true)?;
    text[..len].parse().ok()
}

/// Read an integer from the start of `text`, ignoring trailing garbage.
pub fn leading_integer(text: &str) -> Option<i64> {
    let len = numeric_prefix_len(text, false)?;
    text[..len].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<Vec<String>> {
        Lexer::new(input)
            .lines()
            .iter()
            .map(|l| l.words.iter().map(|w| w.text.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_splits_lines_and_words() {
        assert_eq!(
            words("WAVE SINE\n  C4\t0.5\n\nPAUSE 1"),
            vec![
                vec!["WAVE".to_string(), "SINE".to_string()],
                vec!["C4".to_string(), "0.5".to_string()],
                vec![],
                vec!["PAUSE".to_string(), "1".to_string()],
            ]
        );
    }

    #[test]
    fn test_crlf_terminators_stripped() {
        let lines = Lexer::new("C4 1\r\nD4 2\r\n").lines();
        assert_eq!(lines[0].text, "C4 1");
        assert_eq!(lines[1].words[1].text, "2");
        assert!(lines[2].is_blank());
    }

    #[test]
    fn test_spans_point_into_source() {
        let src = "WAVE SINE\n   H4 1.0";
        let lines = Lexer::new(src).lines();
        let note = lines[1].words[0];
        assert_eq!(&src[note.span.range()], "H4");
        assert_eq!(lines[1].number, 2);
        assert_eq!(&src[lines[1].span.range()], "H4 1.0");
    }

    #[test]
    fn test_comment_lines_have_no_command() {
        let lines = Lexer::new("# a comment with }\n  # indented").lines();
        assert!(lines[0].command().is_none());
        assert!(!lines[0].closes_block());
        assert!(lines[1].is_comment());
    }

    #[test]
    fn test_block_end_detection() {
        let lines = Lexer::new("LOOP 2 {\nC4 1 }\n}").lines();
        assert!(lines[0].opens_loop());
        assert!(!lines[0].closes_block());
        assert!(lines[1].closes_block());
        assert!(lines[2].closes_block());
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("0.5"), Some(0.5));
        assert_eq!(leading_number("0.5s"), Some(0.5));
        assert_eq!(leading_number(".25"), Some(0.25));
        assert_eq!(leading_number("-1"), Some(-1.0));
        assert_eq!(leading_number("1e-2"), Some(0.01));
        assert_eq!(leading_number("2e"), Some(2.0));
        assert_eq!(leading_number("abc"), None);
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("3"), Some(3));
        assert_eq!(leading_integer("3{"), Some(3));
        assert_eq!(leading_integer("2.9"), Some(2));
        assert_eq!(leading_integer("-4"), Some(-4));
        assert_eq!(leading_integer("x"), None);
    }
}
