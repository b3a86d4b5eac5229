//! The command model: an immutable description of one invocable operation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::check::Check;
use crate::config::{CaseSensitivity, RunMode};
use crate::handler::CommandHandler;
use crate::parameter::Parameter;
use crate::parse::ArgumentParser;

/// Overload identity derived from the ordered parameter type sequence.
///
/// Two commands under the same terminal segment may only share an
/// identifier when exactly one of them ends in a remainder/greedy
/// parameter — and even then not when the other ignores extra arguments,
/// since both would then accept any input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    identifier: String,
    has_remainder: bool,
}

impl Signature {
    pub(crate) fn of(parameters: &[Arc<Parameter>]) -> Self {
        let mut identifier = String::new();
        for parameter in parameters {
            identifier.push_str(parameter.ty().name());
            if parameter.is_multiple() {
                identifier.push_str("[]");
            }
            identifier.push(';');
        }
        let has_remainder = parameters
            .last()
            .is_some_and(|p| p.is_remainder() || p.is_greedy());
        Self {
            identifier,
            has_remainder,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Whether the trailing parameter is a remainder or greedy.
    pub fn has_remainder(&self) -> bool {
        self.has_remainder
    }
}

/// A declarative rate limit: at most `amount` uses per `per`, tracked in
/// the bucket named by `bucket` (the framework's key provider decides what
/// a bucket key means — user, channel, anything).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cooldown {
    pub amount: u32,
    pub per: Duration,
    pub bucket: String,
}

impl Cooldown {
    pub fn new(amount: u32, per: Duration, bucket: impl Into<String>) -> Self {
        Self {
            amount,
            per,
            bucket: bucket.into(),
        }
    }
}

/// One registered command. Built once via
/// [`CommandBuilder`](crate::builder::CommandBuilder); immutable afterward.
pub struct Command {
    name: String,
    aliases: Vec<String>,
    parameters: Vec<Arc<Parameter>>,
    signature: Signature,
    ignores_extra_arguments: bool,
    priority: i32,
    run_mode: Option<RunMode>,
    cooldowns: Vec<Cooldown>,
    checks: Vec<Arc<dyn Check>>,
    parser: Arc<dyn ArgumentParser>,
    handler: Arc<dyn CommandHandler>,
}

impl Command {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        aliases: Vec<String>,
        parameters: Vec<Arc<Parameter>>,
        ignores_extra_arguments: bool,
        priority: i32,
        run_mode: Option<RunMode>,
        cooldowns: Vec<Cooldown>,
        checks: Vec<Arc<dyn Check>>,
        parser: Arc<dyn ArgumentParser>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self {
        let signature = Signature::of(&parameters);
        Self {
            name,
            aliases,
            parameters,
            signature,
            ignores_extra_arguments,
            priority,
            run_mode,
            cooldowns,
            checks,
            parser,
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alias segments this command is registered under. The empty string
    /// means "use the parent module's path directly".
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn parameters(&self) -> &[Arc<Parameter>] {
        &self.parameters
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Whether surplus value tokens are silently dropped instead of
    /// failing the parse.
    pub fn ignores_extra_arguments(&self) -> bool {
        self.ignores_extra_arguments
    }

    /// Overload priority; higher is tried first within an alias group.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Command-specific run mode, or `None` to use the service default.
    pub fn run_mode(&self) -> Option<RunMode> {
        self.run_mode
    }

    pub fn cooldowns(&self) -> &[Cooldown] {
        &self.cooldowns
    }

    /// Module checks first, then the command's own.
    pub fn checks(&self) -> &[Arc<dyn Check>] {
        &self.checks
    }

    pub fn argument_parser(&self) -> &Arc<dyn ArgumentParser> {
        &self.parser
    }

    pub fn handler(&self) -> &Arc<dyn CommandHandler> {
        &self.handler
    }

    /// Number of whitespace-separated words in the command name. Used by
    /// match ranking to penalize names with embedded whitespace.
    pub fn name_word_count(&self) -> usize {
        self.name.split_whitespace().count()
    }

    /// Declaration index of the named parameter.
    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name() == name)
    }

    /// Resolves a short flag against the declared option parameters.
    pub fn find_short_option(
        &self,
        flag: char,
        case: CaseSensitivity,
    ) -> Option<(usize, &Arc<Parameter>)> {
        self.parameters.iter().enumerate().find(|(_, p)| {
            p.option()
                .is_some_and(|o| o.short_names().iter().any(|&s| case.char_eq(s, flag)))
        })
    }

    /// Resolves a long flag against the declared option parameters.
    pub fn find_long_option(
        &self,
        name: &str,
        case: CaseSensitivity,
    ) -> Option<(usize, &Arc<Parameter>)> {
        self.parameters.iter().enumerate().find(|(_, p)| {
            p.option()
                .is_some_and(|o| o.long_names().iter().any(|l| case.eq(l, name)))
        })
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("parameters", &self.parameters)
            .field("signature", &self.signature)
            .field("priority", &self.priority)
            .field("ignores_extra_arguments", &self.ignores_extra_arguments)
            .finish_non_exhaustive()
    }
}
