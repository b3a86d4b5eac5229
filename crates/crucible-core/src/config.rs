//! Configuration surface shared by the command map, the lexer, and the parsers.
//!
//! A single [`ServiceConfig`] is the source of truth for separator handling,
//! case sensitivity, and the quotation-mark map. Host applications typically
//! deserialize it from their own configuration layer:
//!
//! ```rust,ignore
//! let config: ServiceConfig = figment.extract_inner("commands")?;
//! let service = CommandService::new(config);
//! ```

use std::borrow::Cow;
use std::collections::HashMap;

use serde::Deserialize;

/// How an alias path segment must be delimited from the text that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorRequirement {
    /// The configured separator must follow the segment. When the separator
    /// is itself a single whitespace character, any whitespace satisfies it.
    #[default]
    Separator,
    /// Either the configured separator or any whitespace suffices.
    SeparatorOrWhitespace,
}

/// Case handling applied uniformly to segment lookups and option-name
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    /// Segments and option names match regardless of case.
    #[default]
    Insensitive,
    /// Segments and option names must match exactly.
    Sensitive,
}

impl CaseSensitivity {
    /// Normalizes a segment for use as a map key.
    pub fn fold<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            CaseSensitivity::Sensitive => Cow::Borrowed(text),
            CaseSensitivity::Insensitive => {
                if text.chars().any(char::is_uppercase) {
                    Cow::Owned(text.to_lowercase())
                } else {
                    Cow::Borrowed(text)
                }
            }
        }
    }

    /// Compares two strings under this sensitivity.
    pub fn eq(&self, a: &str, b: &str) -> bool {
        match self {
            CaseSensitivity::Sensitive => a == b,
            CaseSensitivity::Insensitive => {
                a.chars()
                    .flat_map(char::to_lowercase)
                    .eq(b.chars().flat_map(char::to_lowercase))
            }
        }
    }

    /// Compares two characters under this sensitivity.
    pub fn char_eq(&self, a: char, b: char) -> bool {
        match self {
            CaseSensitivity::Sensitive => a == b,
            CaseSensitivity::Insensitive => a.to_lowercase().eq(b.to_lowercase()),
        }
    }

    /// Returns the remainder of `text` after `prefix`, compared under this
    /// sensitivity, or `None` if `text` does not start with `prefix`.
    pub fn strip_prefix<'t>(&self, text: &'t str, prefix: &str) -> Option<&'t str> {
        match self {
            CaseSensitivity::Sensitive => text.strip_prefix(prefix),
            CaseSensitivity::Insensitive => {
                let mut indices = text.char_indices();
                for expected in prefix.chars() {
                    let (_, found) = indices.next()?;
                    if !self.char_eq(found, expected) {
                        return None;
                    }
                }
                Some(match indices.next() {
                    Some((i, _)) => &text[i..],
                    None => "",
                })
            }
        }
    }
}

/// Map of opening quotation characters to their closing counterparts.
///
/// Pairs may be asymmetric (`«` closes with `»`) and several pairs may share
/// a closing character. The default set covers the straight double quote,
/// the curly and low-high typographic pairs, and guillemets in both
/// directions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct QuotationMarks {
    pairs: HashMap<char, char>,
}

impl Default for QuotationMarks {
    fn default() -> Self {
        Self {
            pairs: HashMap::from([
                ('"', '"'),
                ('“', '”'),
                ('„', '‟'),
                ('«', '»'),
                ('»', '«'),
            ]),
        }
    }
}

impl QuotationMarks {
    /// Creates an empty map; quoting is effectively disabled.
    pub fn none() -> Self {
        Self {
            pairs: HashMap::new(),
        }
    }

    /// Registers an open/close pair, replacing any existing pair for `open`.
    pub fn with_pair(mut self, open: char, close: char) -> Self {
        self.pairs.insert(open, close);
        self
    }

    /// Returns the closing character for `open`, if `open` starts a pair.
    pub fn close_for(&self, open: char) -> Option<char> {
        self.pairs.get(&open).copied()
    }

    /// Whether `c` appears in the map as an opening or closing character.
    ///
    /// Escape handling applies to every registered character, not only
    /// opening ones, so `\”` inside curly quotes works as expected.
    pub fn is_mark(&self, c: char) -> bool {
        self.pairs.contains_key(&c) || self.pairs.values().any(|&close| close == c)
    }
}

/// Whether a chosen command's handler should be awaited inline or may be
/// driven concurrently with other work by the host.
///
/// This is a pass-through attribute: the framework reports it on the
/// execution outcome and otherwise awaits the handler either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Sequential,
    Parallel,
}

/// Top-level configuration for a command service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// String separating alias path segments in the input text.
    pub separator: String,
    /// How strictly the separator must appear between segments.
    pub separator_requirement: SeparatorRequirement,
    /// Case handling for segment and option-name comparisons.
    pub case_sensitivity: CaseSensitivity,
    /// Quotation-mark pairs recognized by the lexer.
    pub quotation_marks: QuotationMarks,
    /// Run mode applied to commands that do not declare their own.
    pub default_run_mode: RunMode,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
            separator_requirement: SeparatorRequirement::default(),
            case_sensitivity: CaseSensitivity::default(),
            quotation_marks: QuotationMarks::default(),
            default_run_mode: RunMode::default(),
        }
    }
}

impl ServiceConfig {
    /// Whether the configured separator is a single whitespace character.
    ///
    /// Segment scanning treats any whitespace as the separator in that case.
    pub fn separator_is_whitespace(&self) -> bool {
        let mut chars = self.separator.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_whitespace())
    }
}
