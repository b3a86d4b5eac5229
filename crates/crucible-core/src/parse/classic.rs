//! The character-based positional-only parser.

use super::ArgumentParser;
use crate::args::RawArguments;
use crate::command::Command;
use crate::config::ServiceConfig;
use crate::error::{BuildError, ParseFailure};

/// The legacy parser: walks the raw text character by character, assigning
/// consecutive quoted or whitespace-separated spans to positional
/// parameters in declared order. The last parameter may be multi-value
/// (absorbing every further span) or a remainder (absorbing the rest of
/// the text verbatim).
///
/// Unlike [`RichArgumentParser`](super::RichArgumentParser) this variant
/// enforces cardinality at parse time (`TooFewArguments` /
/// `TooManyArguments`) and rejects commands with option parameters when
/// they are registered.
pub struct ClassicArgumentParser;

impl ArgumentParser for ClassicArgumentParser {
    fn validate(&self, command: &Command) -> Result<(), BuildError> {
        match command.parameters().iter().find(|p| p.is_option()) {
            Some(parameter) => Err(BuildError::OptionWithClassicParser {
                command: command.name().to_string(),
                parameter: parameter.name().to_string(),
            }),
            None => Ok(()),
        }
    }

    fn parse(
        &self,
        command: &Command,
        text: &str,
        config: &ServiceConfig,
    ) -> Result<RawArguments, ParseFailure> {
        let parameters = command.parameters();
        let quotes = &config.quotation_marks;
        let mut raw = RawArguments::for_command(command);
        let mut cursor = 0usize;
        let mut current: Option<String> = None;
        let mut expected_quote: Option<char> = None;
        let mut escaped = false;
        let mut whitespace_required = false;

        let finalize = |raw: &mut RawArguments,
                            cursor: &mut usize,
                            value: String|
         -> Result<(), ParseFailure> {
            match parameters.get(*cursor) {
                None => {
                    if command.ignores_extra_arguments() {
                        Ok(())
                    } else {
                        Err(ParseFailure::TooManyArguments { value })
                    }
                }
                Some(parameter) => {
                    if parameter.is_multiple() {
                        raw.push(*cursor, value, true);
                    } else {
                        raw.push(*cursor, value, false);
                        *cursor += 1;
                    }
                    Ok(())
                }
            }
        };

        for (i, c) in text.char_indices() {
            if whitespace_required {
                if !c.is_whitespace() {
                    return Err(ParseFailure::NoWhitespaceBetweenArguments { position: i });
                }
                whitespace_required = false;
                continue;
            }
            if escaped {
                escaped = false;
                let buffer = current.get_or_insert_with(String::new);
                if quotes.is_mark(c) {
                    buffer.push(c);
                    continue;
                }
                // The backslash was literal; the character falls through to
                // the ordinary rules below.
                buffer.push('\\');
            }
            if let Some(close) = expected_quote {
                if c == '\\' {
                    escaped = true;
                    continue;
                }
                if c == close {
                    finalize(&mut raw, &mut cursor, current.take().unwrap_or_default())?;
                    expected_quote = None;
                    whitespace_required = true;
                    continue;
                }
                current.get_or_insert_with(String::new).push(c);
                continue;
            }
            if c == '\\' {
                current.get_or_insert_with(String::new);
                escaped = true;
                continue;
            }
            if c.is_whitespace() {
                if let Some(value) = current.take() {
                    finalize(&mut raw, &mut cursor, value)?;
                }
                continue;
            }
            // At an argument boundary a remainder parameter takes the rest
            // of the text verbatim.
            if current.is_none() && parameters.get(cursor).is_some_and(|p| p.is_remainder()) {
                raw.push(cursor, text[i..].trim_end().to_string(), false);
                cursor += 1;
                return finish(command, raw, cursor);
            }
            if let Some(close) = quotes.close_for(c) {
                if current.is_some() {
                    return Err(ParseFailure::UnexpectedQuotationMark { position: i });
                }
                expected_quote = Some(close);
                current = Some(String::new());
                continue;
            }
            current.get_or_insert_with(String::new).push(c);
        }

        if expected_quote.is_some() {
            return Err(ParseFailure::UnclosedQuotationMark);
        }
        if escaped {
            current.get_or_insert_with(String::new).push('\\');
        }
        if let Some(value) = current.take() {
            finalize(&mut raw, &mut cursor, value)?;
        }
        finish(command, raw, cursor)
    }
}

/// Cardinality check once the text is exhausted.
fn finish(
    command: &Command,
    raw: RawArguments,
    cursor: usize,
) -> Result<RawArguments, ParseFailure> {
    for (index, parameter) in command.parameters().iter().enumerate().skip(cursor) {
        if !raw.is_bound(index) && parameter.is_required() {
            return Err(ParseFailure::TooFewArguments {
                parameter: parameter.name().to_string(),
            });
        }
    }
    Ok(raw)
}
