//! The type-parser contract: raw text fragment in, typed value out.
//!
//! Type parsers are consumed by the binder once per scalar fragment;
//! multi-value parameters invoke the parser once per fragment and collect
//! the results. [`FromStrParser`] covers any `FromStr` type, which is how
//! most parameters are declared; protocol-specific parsers (user mentions,
//! channel references, ...) implement [`TypeParser`] directly.

use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;

use crate::args::ArgumentValue;
use crate::context::CommandContext;
use crate::parameter::Parameter;

/// A failed conversion of one raw fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse '{value}' for parameter '{parameter}': {reason}")]
pub struct TypeParseFailure {
    parameter: String,
    value: String,
    reason: String,
}

impl TypeParseFailure {
    pub fn new(
        parameter: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// The offending parameter's name.
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// The raw fragment that failed to convert.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Converts one raw text fragment into a typed value.
#[async_trait]
pub trait TypeParser: Send + Sync {
    async fn parse(
        &self,
        ctx: &CommandContext,
        parameter: &Parameter,
        raw: &str,
    ) -> Result<ArgumentValue, TypeParseFailure>;
}

/// The generic adapter backing every `FromStr` parameter type.
pub struct FromStrParser<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for FromStrParser<T> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T> TypeParser for FromStrParser<T>
where
    T: FromStr + Send + Sync + 'static,
    <T as FromStr>::Err: Display,
{
    async fn parse(
        &self,
        _ctx: &CommandContext,
        parameter: &Parameter,
        raw: &str,
    ) -> Result<ArgumentValue, TypeParseFailure> {
        raw.parse::<T>()
            .map(|value| Box::new(value) as ArgumentValue)
            .map_err(|e| TypeParseFailure::new(parameter.name(), raw, e.to_string()))
    }
}
