//! Execution-pipeline failures.
//!
//! Like parse failures these are data, not panics: the service returns
//! them inside [`ExecutionOutcome`](crate::service::ExecutionOutcome).

use std::time::Duration;

use thiserror::Error;

use crucible_core::{CheckFailure, ParseFailure, TypeParseFailure};

/// Why an input failed to execute.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionFailure {
    /// No registered alias path was a prefix of the input.
    #[error("no command matched the input")]
    CommandNotFound,

    /// The chosen overload's argument parser rejected the remaining text.
    #[error("arguments for '{command}' could not be parsed: {failure}")]
    ArgumentParse {
        command: String,
        failure: ParseFailure,
    },

    /// A raw fragment failed type conversion.
    #[error("argument of '{command}' could not be converted: {failure}")]
    TypeParse {
        command: String,
        failure: TypeParseFailure,
    },

    /// A required positional parameter received no fragment.
    ///
    /// The rich parser defers this cardinality check to the binder, which
    /// is where this failure originates.
    #[error("missing required argument '{parameter}' for '{command}'")]
    MissingRequiredArgument { command: String, parameter: String },

    /// A check rejected the invocation.
    #[error("check failed for '{command}': {failure}")]
    CheckFailed {
        command: String,
        failure: CheckFailure,
    },

    /// A cooldown bucket is exhausted.
    #[error("'{command}' is on cooldown, retry in {retry_after:?}")]
    OnCooldown {
        command: String,
        retry_after: Duration,
    },

    /// Every overload under the best-matching alias path failed; the
    /// per-overload failures are carried in match order.
    #[error("no overload of '{path}' accepted the input")]
    OverloadsFailed {
        path: String,
        failures: Vec<ExecutionFailure>,
    },

    /// The command was chosen and invoked, but its handler reported an
    /// application error.
    #[error("command '{command}' failed: {reason}")]
    HandlerFailed { command: String, reason: String },
}
