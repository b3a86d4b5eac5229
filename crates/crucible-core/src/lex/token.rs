//! Classification of slices into value and option tokens.

use super::slice::{Slice, Slices};
use crate::config::QuotationMarks;

/// A classified piece of argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A plain value, quoted or not.
    Value(Slice),
    /// One or more bundled short option characters (`-abc` carries `abc`).
    Short(String),
    /// A long option name, with the inline value split off `--name=value`.
    Long {
        name: String,
        inline: Option<String>,
    },
}

/// Iterator classifying [`Slices`] into [`Token`]s.
///
/// A bare `--` sets a one-shot terminator: every later slice is a plain
/// value regardless of leading dashes (the usual end-of-options convention).
pub struct Tokens<'a> {
    slices: Slices<'a>,
    options_terminated: bool,
}

impl<'a> Tokens<'a> {
    pub fn new(input: &'a str, quotes: &'a QuotationMarks) -> Self {
        Self {
            slices: Slices::new(input, quotes),
            options_terminated: false,
        }
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let slice = self.slices.next()?;
            if self.options_terminated
                || slice.is_quoted()
                || slice.starts_escaped()
                || !slice.text().starts_with('-')
            {
                return Some(Token::Value(slice));
            }

            let text = slice.text();
            if text == "--" {
                self.options_terminated = true;
                continue;
            }
            if let Some(rest) = text.strip_prefix("--") {
                let (name, inline) = match rest.split_once('=') {
                    Some((name, value)) => (name.to_string(), Some(value.to_string())),
                    None => (rest.to_string(), None),
                };
                return Some(Token::Long { name, inline });
            }
            // `-x...` is a short option run unless it looks like a negative
            // number (or is a lone dash).
            let mut chars = text.chars();
            chars.next();
            return match chars.next() {
                Some(c) if !c.is_ascii_digit() => Some(Token::Short(text[1..].to_string())),
                _ => Some(Token::Value(slice)),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let quotes = QuotationMarks::default();
        Tokens::new(input, &quotes).collect()
    }

    fn value_texts(input: &str) -> Vec<String> {
        tokens(input)
            .into_iter()
            .map(|t| match t {
                Token::Value(s) => s.into_text(),
                other => panic!("expected value, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_long_option() {
        assert_eq!(
            tokens("--reason"),
            vec![Token::Long {
                name: "reason".to_string(),
                inline: None
            }]
        );
    }

    #[test]
    fn test_long_option_inline_value() {
        assert_eq!(
            tokens("--reason=spam"),
            vec![Token::Long {
                name: "reason".to_string(),
                inline: Some("spam".to_string())
            }]
        );
    }

    #[test]
    fn test_short_option_run() {
        assert_eq!(tokens("-abc"), vec![Token::Short("abc".to_string())]);
    }

    #[test]
    fn test_negative_number_is_value() {
        assert_eq!(value_texts("-5 -12.5"), vec!["-5", "-12.5"]);
    }

    #[test]
    fn test_lone_dash_is_value() {
        assert_eq!(value_texts("-"), vec!["-"]);
    }

    #[test]
    fn test_terminator_downgrades_options() {
        let toks = tokens("-a -- -b --c");
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[0], Token::Short("a".to_string()));
        assert!(matches!(&toks[1], Token::Value(s) if s.text() == "-b"));
        assert!(matches!(&toks[2], Token::Value(s) if s.text() == "--c"));
    }

    #[test]
    fn test_quoted_dash_is_value() {
        let toks = tokens(r#""-a""#);
        assert!(matches!(&toks[0], Token::Value(s) if s.text() == "-a"));
    }

    #[test]
    fn test_escaped_dash_is_value() {
        let toks = tokens(r"\-a");
        assert!(matches!(&toks[0], Token::Value(s) if s.text() == "-a"));
    }
}
