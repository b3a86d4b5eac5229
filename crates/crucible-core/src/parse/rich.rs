//! The token-based parser supporting named options.

use std::collections::HashMap;

use tracing::trace;

use super::ArgumentParser;
use crate::args::RawArguments;
use crate::command::Command;
use crate::config::ServiceConfig;
use crate::error::{BuildError, ParseFailure};
use crate::lex::{Token, Tokens};
use crate::parameter::Parameter;

/// The default argument parser.
///
/// Consumes the token stream against the command's declared parameters:
/// positionals in order (a remainder or multi-value positional keeps
/// consuming), options by short/long name with inline values, switch
/// bundling, greedy accumulation, and mutual-exclusion groups. The `--`
/// terminator downgrades everything after it to plain values.
///
/// Unsatisfied required positionals are deliberately not a parse failure
/// here; the binder consuming the raw-argument map enforces completeness.
pub struct RichArgumentParser;

impl ArgumentParser for RichArgumentParser {
    fn validate(&self, _command: &Command) -> Result<(), BuildError> {
        Ok(())
    }

    fn parse(
        &self,
        command: &Command,
        text: &str,
        config: &ServiceConfig,
    ) -> Result<RawArguments, ParseFailure> {
        let parameters = command.parameters();
        let mut raw = RawArguments::for_command(command);
        let positionals: Vec<usize> = parameters
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_option())
            .map(|(i, _)| i)
            .collect();
        let mut positional_cursor = 0usize;
        // Option awaiting its value, by parameter index.
        let mut pending: Option<usize> = None;
        // Mutual-exclusion group -> display name of the claiming option.
        let mut claimed: HashMap<String, String> = HashMap::new();

        for token in Tokens::new(text, &config.quotation_marks) {
            match token {
                Token::Value(slice) => {
                    if !slice.is_closed() {
                        return Err(ParseFailure::UnclosedQuotationMark);
                    }
                    let value = slice.into_text();
                    if let Some(index) = pending {
                        let parameter = &parameters[index];
                        raw.push(index, value, accumulates(parameter));
                        if !accumulates(parameter) {
                            pending = None;
                        }
                        continue;
                    }
                    match positionals.get(positional_cursor) {
                        Some(&index) => {
                            let parameter = &parameters[index];
                            if parameter.is_multiple() || parameter.is_remainder() {
                                raw.push(index, value, true);
                            } else {
                                raw.push(index, value, false);
                                positional_cursor += 1;
                            }
                        }
                        None if command.ignores_extra_arguments() => {
                            trace!(value = %value, "dropping extra value token");
                        }
                        None => return Err(ParseFailure::TooManyValues { value }),
                    }
                }
                Token::Short(flags) => {
                    end_pending(parameters, &mut pending)?;
                    parse_short_run(command, config, &flags, &mut raw, &mut pending, &mut claimed)?;
                }
                Token::Long { name, inline } => {
                    end_pending(parameters, &mut pending)?;
                    parse_long(command, config, name, inline, &mut raw, &mut pending, &mut claimed)?;
                }
            }
        }

        // A pending non-greedy option at end of input is not an error at
        // this level; the binder's completeness pass has the final say.
        for (index, parameter) in parameters.iter().enumerate() {
            if parameter.is_remainder() || (parameter.is_greedy() && !parameter.is_multiple()) {
                raw.flatten(index);
            }
        }
        Ok(raw)
    }
}

/// Whether a pending option keeps consuming value tokens.
fn accumulates(parameter: &Parameter) -> bool {
    parameter.is_greedy() || parameter.is_multiple()
}

/// The name an option failure should report.
fn display_name(parameter: &Parameter) -> String {
    parameter
        .option()
        .map(|o| o.display_name())
        .unwrap_or_else(|| parameter.name().to_string())
}

/// A new flag ends any pending option. For a non-greedy pending option
/// that is a parse failure: a flag arrived where its value was expected.
fn end_pending(
    parameters: &[std::sync::Arc<Parameter>],
    pending: &mut Option<usize>,
) -> Result<(), ParseFailure> {
    if let Some(index) = pending.take() {
        let parameter = &parameters[index];
        if !accumulates(parameter) {
            return Err(ParseFailure::ExpectedOptionValue {
                name: display_name(parameter),
            });
        }
    }
    Ok(())
}

fn claim_group(
    claimed: &mut HashMap<String, String>,
    parameter: &Parameter,
) -> Result<(), ParseFailure> {
    let Some(option) = parameter.option() else {
        return Ok(());
    };
    let Some(group) = option.group() else {
        return Ok(());
    };
    let name = option.display_name();
    if let Some(existing) = claimed.get(group) {
        if existing != &name {
            return Err(ParseFailure::MutuallyExclusiveOption {
                name,
                conflicting: existing.clone(),
            });
        }
    }
    claimed.insert(group.to_string(), name);
    Ok(())
}

/// Processes a bundled short-flag run such as `-abc`.
///
/// Switches consume one character each and the scan continues; the first
/// value-taking option consumes the rest of the run as its inline value
/// (or goes pending when the run ends with it).
fn parse_short_run(
    command: &Command,
    config: &ServiceConfig,
    flags: &str,
    raw: &mut RawArguments,
    pending: &mut Option<usize>,
    claimed: &mut HashMap<String, String>,
) -> Result<(), ParseFailure> {
    let mut chars = flags.chars();
    while let Some(flag) = chars.next() {
        let Some((index, parameter)) = command.find_short_option(flag, config.case_sensitivity)
        else {
            return Err(ParseFailure::UnknownOptionName {
                name: flag.to_string(),
            });
        };
        claim_group(claimed, parameter)?;

        if parameter.is_switch() {
            if raw.is_bound(index) {
                return Err(ParseFailure::DuplicateOptionName {
                    name: flag.to_string(),
                });
            }
            raw.push(index, "true".to_string(), false);
            continue;
        }

        if raw.is_bound(index) && !parameter.is_multiple() {
            return Err(ParseFailure::DuplicateOptionName {
                name: flag.to_string(),
            });
        }
        let rest: String = chars.by_ref().collect();
        if rest.is_empty() {
            *pending = Some(index);
        } else {
            raw.push(index, rest, accumulates(parameter));
            *pending = accumulates(parameter).then_some(index);
        }
    }
    Ok(())
}

fn parse_long(
    command: &Command,
    config: &ServiceConfig,
    name: String,
    inline: Option<String>,
    raw: &mut RawArguments,
    pending: &mut Option<usize>,
    claimed: &mut HashMap<String, String>,
) -> Result<(), ParseFailure> {
    let Some((index, parameter)) = command.find_long_option(&name, config.case_sensitivity) else {
        return Err(ParseFailure::UnknownOptionName { name });
    };
    claim_group(claimed, parameter)?;

    if parameter.is_switch() {
        if raw.is_bound(index) {
            return Err(ParseFailure::DuplicateOptionName { name });
        }
        // `--force=false` still works; presence alone means true.
        raw.push(index, inline.unwrap_or_else(|| "true".to_string()), false);
        return Ok(());
    }

    if raw.is_bound(index) && !parameter.is_multiple() {
        return Err(ParseFailure::DuplicateOptionName { name });
    }
    match inline {
        Some(value) => {
            raw.push(index, value, accumulates(parameter));
            *pending = accumulates(parameter).then_some(index);
        }
        None => *pending = Some(index),
    }
    Ok(())
}
