//! Argument parsing: remaining match text in, raw per-parameter fragments
//! out.
//!
//! Two variants live behind the [`ArgumentParser`] trait, selected
//! per-command:
//!
//! - [`RichArgumentParser`] — token-based; supports named options,
//!   switches, greedy values, and mutually-exclusive groups.
//! - [`ClassicArgumentParser`] — character-based and positional-only,
//!   retained for commands that want its stricter cardinality failures.
//!
//! They have different validation contracts (the classic variant rejects
//! option parameters outright), which is why they are two strategies
//! rather than one parser with flags.

mod classic;
mod rich;

pub use classic::ClassicArgumentParser;
pub use rich::RichArgumentParser;

use crate::args::RawArguments;
use crate::command::Command;
use crate::config::ServiceConfig;
use crate::error::{BuildError, ParseFailure};

/// A per-command argument parsing strategy.
///
/// Parsing is pure and synchronous: no shared state, no suspension points,
/// safe to call concurrently and repeatedly.
pub trait ArgumentParser: Send + Sync {
    /// Registration-time validation of a command against this variant.
    fn validate(&self, command: &Command) -> Result<(), BuildError>;

    /// Parses the remaining text of a match into raw per-parameter
    /// fragments, or a structured failure.
    fn parse(
        &self,
        command: &Command,
        text: &str,
        config: &ServiceConfig,
    ) -> Result<RawArguments, ParseFailure>;
}
