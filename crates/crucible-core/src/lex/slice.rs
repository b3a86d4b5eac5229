//! Whitespace- and quote-delimited slicing of raw argument text.
//!
//! [`Slices`] is a restartable iterator over [`Slice`]s. Quoting only takes
//! effect at the start of a slice; a quotation mark embedded in the middle of
//! an unquoted run is an ordinary character (the classic parser reports it as
//! an error at its own level).

use crate::config::QuotationMarks;

/// One delimited piece of the input text.
///
/// The carried text has escape backslashes already removed. An unclosed
/// quoted slice is emitted with `closed == false`; the parsers turn that
/// into an explicit failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    text: String,
    quoted: bool,
    closed: bool,
    escaped_start: bool,
}

impl Slice {
    /// The corrected slice text, with escape markers removed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the slice, returning its text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// Whether the slice was delimited by a quotation-mark pair.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// `false` when a quoted slice ran to end of input without its closing
    /// character.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the first character of the slice was produced by an escape.
    ///
    /// Token classification uses this to keep `\-foo` a plain value.
    pub fn starts_escaped(&self) -> bool {
        self.escaped_start
    }
}

/// Iterator slicing `input` into whitespace- or quote-delimited pieces.
pub struct Slices<'a> {
    rest: &'a str,
    quotes: &'a QuotationMarks,
}

impl<'a> Slices<'a> {
    pub fn new(input: &'a str, quotes: &'a QuotationMarks) -> Self {
        Self {
            rest: input,
            quotes,
        }
    }

    /// Scans a quoted slice. `open` has already been identified; the cursor
    /// sits on its first content byte.
    fn next_quoted(&mut self, open_len: usize, close: char) -> Slice {
        let content: &'a str = &self.rest[open_len..];
        let mut escapes = Vec::new();
        let mut chars = content.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c == '\\' {
                if let Some(&(_, next)) = chars.peek() {
                    if self.quotes.is_mark(next) {
                        escapes.push(i);
                        chars.next();
                        continue;
                    }
                }
            }
            if c == close {
                let slice = Slice {
                    text: strip_escapes(&content[..i], &escapes),
                    quoted: true,
                    closed: true,
                    escaped_start: false,
                };
                self.rest = &content[i + c.len_utf8()..];
                return slice;
            }
        }
        // Soft unclosed condition; the parser decides whether it is fatal.
        let slice = Slice {
            text: strip_escapes(content, &escapes),
            quoted: true,
            closed: false,
            escaped_start: false,
        };
        self.rest = "";
        slice
    }

    /// Scans an unquoted slice up to the next whitespace.
    fn next_unquoted(&mut self) -> Slice {
        let mut escapes = Vec::new();
        let mut chars = self.rest.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c.is_whitespace() {
                let slice = Slice {
                    text: strip_escapes(&self.rest[..i], &escapes),
                    quoted: false,
                    closed: true,
                    escaped_start: escapes.first() == Some(&0),
                };
                self.rest = &self.rest[i..];
                return slice;
            }
            if c == '\\' {
                if let Some(&(_, next)) = chars.peek() {
                    if self.quotes.is_mark(next) || next == '-' {
                        escapes.push(i);
                        chars.next();
                    }
                }
            }
        }
        let slice = Slice {
            text: strip_escapes(self.rest, &escapes),
            quoted: false,
            closed: true,
            escaped_start: escapes.first() == Some(&0),
        };
        self.rest = "";
        slice
    }
}

impl Iterator for Slices<'_> {
    type Item = Slice;

    fn next(&mut self) -> Option<Slice> {
        self.rest = self.rest.trim_start();
        if self.rest.is_empty() {
            return None;
        }
        let first = self.rest.chars().next()?;
        match self.quotes.close_for(first) {
            Some(close) => Some(self.next_quoted(first.len_utf8(), close)),
            None => Some(self.next_unquoted()),
        }
    }
}

/// Rebuilds `raw` with the backslashes at the collected byte offsets
/// skipped. One allocation, no incremental splicing.
fn strip_escapes(raw: &str, escapes: &[usize]) -> String {
    if escapes.is_empty() {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len() - escapes.len());
    let mut skip = escapes.iter().copied().peekable();
    for (i, c) in raw.char_indices() {
        if skip.peek() == Some(&i) {
            skip.next();
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice_all(input: &str) -> Vec<Slice> {
        let quotes = QuotationMarks::default();
        Slices::new(input, &quotes).collect()
    }

    #[test]
    fn test_simple_split() {
        let slices = slice_all("a b  c");
        let texts: Vec<&str> = slices.iter().map(Slice::text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert!(slices.iter().all(|s| !s.is_quoted() && s.is_closed()));
    }

    #[test]
    fn test_quoted_slice() {
        let slices = slice_all(r#"a "b c" d"#);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].text(), "a");
        assert_eq!(slices[1].text(), "b c");
        assert!(slices[1].is_quoted());
        assert_eq!(slices[2].text(), "d");
        assert!(!slices[2].is_quoted());
    }

    #[test]
    fn test_escaped_quote_is_literal() {
        let slices = slice_all(r#"\"literal\""#);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].text(), r#""literal""#);
        assert!(!slices[0].is_quoted());
    }

    #[test]
    fn test_escape_inside_quotes() {
        let slices = slice_all(r#""say \"hi\" now""#);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].text(), r#"say "hi" now"#);
        assert!(slices[0].is_quoted());
        assert!(slices[0].is_closed());
    }

    #[test]
    fn test_unclosed_quote() {
        let slices = slice_all(r#"say "hello"#);
        assert_eq!(slices.len(), 2);
        assert!(slices[1].is_quoted());
        assert!(!slices[1].is_closed());
        assert_eq!(slices[1].text(), "hello");
    }

    #[test]
    fn test_asymmetric_pair() {
        let slices = slice_all("say «bonjour monde» now");
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[1].text(), "bonjour monde");
        assert!(slices[1].is_quoted());
    }

    #[test]
    fn test_escaped_dash_marks_slice() {
        let slices = slice_all(r"\-not-a-flag");
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].text(), "-not-a-flag");
        assert!(slices[0].starts_escaped());
    }

    #[test]
    fn test_backslash_without_mark_is_kept() {
        let slices = slice_all(r"C:\path\to");
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].text(), r"C:\path\to");
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(slice_all("").is_empty());
        assert!(slice_all("   \t ").is_empty());
    }

    #[test]
    fn test_empty_quoted_slice() {
        let slices = slice_all(r#"a "" b"#);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[1].text(), "");
        assert!(slices[1].is_quoted());
    }
}
