//! Fluent builders: the explicit registration step producing immutable
//! commands and modules.
//!
//! ```rust,ignore
//! let module = ModuleBuilder::new("moderation")
//!     .command(
//!         CommandBuilder::new("ban")
//!             .alias("ban")
//!             .parameter(ParameterBuilder::value::<String>("user"))
//!             .parameter(
//!                 ParameterBuilder::option::<String>("reason")
//!                     .short('r')
//!                     .long("reason"),
//!             )
//!             .parameter(ParameterBuilder::remainder::<String>("note").optional())
//!             .handler(handler_fn(ban)),
//!     )
//!     .build()?;
//! ```

use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use crate::check::Check;
use crate::command::{Command, Cooldown};
use crate::config::RunMode;
use crate::error::BuildError;
use crate::handler::CommandHandler;
use crate::module::Module;
use crate::parameter::{Cardinality, OptionData, Parameter, TypeMeta};
use crate::parse::{ArgumentParser, RichArgumentParser};
use crate::typeparse::{FromStrParser, TypeParser};

/// Builder for one parameter.
pub struct ParameterBuilder {
    name: String,
    ty: TypeMeta,
    parser: Arc<dyn TypeParser>,
    cardinality: Cardinality,
    is_option: bool,
    short_names: Vec<char>,
    long_names: Vec<String>,
    group: Option<String>,
    greedy: bool,
    default: Option<String>,
}

impl ParameterBuilder {
    fn typed<T: 'static>(
        name: impl Into<String>,
        parser: Arc<dyn TypeParser>,
        cardinality: Cardinality,
        is_option: bool,
    ) -> Self {
        Self {
            name: name.into(),
            ty: TypeMeta::of::<T>(),
            parser,
            cardinality,
            is_option,
            short_names: Vec::new(),
            long_names: Vec::new(),
            group: None,
            greedy: false,
            default: None,
        }
    }

    /// A positional parameter taking one fragment.
    pub fn value<T>(name: impl Into<String>) -> Self
    where
        T: FromStr + Send + Sync + 'static,
        <T as FromStr>::Err: Display,
    {
        Self::typed::<T>(
            name,
            Arc::new(FromStrParser::<T>::default()),
            Cardinality::Single,
            false,
        )
    }

    /// A positional parameter absorbing all remaining text as one fragment.
    pub fn remainder<T>(name: impl Into<String>) -> Self
    where
        T: FromStr + Send + Sync + 'static,
        <T as FromStr>::Err: Display,
    {
        Self::typed::<T>(
            name,
            Arc::new(FromStrParser::<T>::default()),
            Cardinality::Remainder,
            false,
        )
    }

    /// A named option parameter taking one value.
    pub fn option<T>(name: impl Into<String>) -> Self
    where
        T: FromStr + Send + Sync + 'static,
        <T as FromStr>::Err: Display,
    {
        Self::typed::<T>(
            name,
            Arc::new(FromStrParser::<T>::default()),
            Cardinality::Single,
            true,
        )
    }

    /// A zero-argument boolean switch, set to `true` by mere presence.
    pub fn switch(name: impl Into<String>) -> Self {
        Self::typed::<bool>(
            name,
            Arc::new(FromStrParser::<bool>::default()),
            Cardinality::Single,
            true,
        )
        .default_value("false")
    }

    /// A parameter of a type without a `FromStr` impl, converted by a
    /// custom parser.
    pub fn custom<T: 'static>(name: impl Into<String>, parser: Arc<dyn TypeParser>) -> Self {
        Self::typed::<T>(name, parser, Cardinality::Single, false)
    }

    /// Replaces the type parser.
    pub fn parser(mut self, parser: Arc<dyn TypeParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Allows the parameter to be absent without a default.
    pub fn optional(mut self) -> Self {
        if !matches!(self.cardinality, Cardinality::Remainder) {
            self.cardinality = Cardinality::Optional;
        } else {
            // A remainder stays a remainder; absence is handled by the
            // default instead.
            self.default = self.default.take().or(Some(String::new()));
        }
        self
    }

    /// Collects any number of fragments instead of one.
    pub fn multiple(mut self) -> Self {
        self.cardinality = Cardinality::Multiple;
        self
    }

    /// Raw default text, type-parsed when the parameter goes unsatisfied.
    pub fn default_value(mut self, text: impl Into<String>) -> Self {
        self.default = Some(text.into());
        self
    }

    /// Adds a single-character alias.
    pub fn short(mut self, flag: char) -> Self {
        self.short_names.push(flag);
        self
    }

    /// Adds a long alias.
    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.long_names.push(name.into());
        self
    }

    /// Tags the option with a mutual-exclusion group.
    pub fn group(mut self, tag: impl Into<String>) -> Self {
        self.group = Some(tag.into());
        self
    }

    /// Makes the option keep consuming value tokens until the next flag.
    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    fn build(self) -> Arc<Parameter> {
        let option = self.is_option.then(|| {
            let switch = self.ty.is::<bool>()
                && self.default.as_deref() == Some("false")
                && !self.greedy
                && !matches!(self.cardinality, Cardinality::Multiple);
            OptionData::new(
                self.short_names,
                self.long_names,
                self.group,
                self.greedy,
                switch,
            )
        });
        Arc::new(Parameter::new(
            self.name,
            self.ty,
            self.cardinality,
            option,
            self.default,
            self.parser,
        ))
    }
}

/// Builder for one command.
pub struct CommandBuilder {
    name: String,
    aliases: Vec<String>,
    parameters: Vec<ParameterBuilder>,
    ignores_extra_arguments: bool,
    priority: i32,
    run_mode: Option<RunMode>,
    cooldowns: Vec<Cooldown>,
    checks: Vec<Arc<dyn Check>>,
    parser: Arc<dyn ArgumentParser>,
    handler: Option<Arc<dyn CommandHandler>>,
}

impl CommandBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            parameters: Vec::new(),
            ignores_extra_arguments: false,
            priority: 0,
            run_mode: None,
            cooldowns: Vec::new(),
            checks: Vec::new(),
            parser: Arc::new(RichArgumentParser),
            handler: None,
        }
    }

    /// Adds an alias segment. An empty alias maps the command at its
    /// module's own path. Without any alias the command name is used.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn parameter(mut self, parameter: ParameterBuilder) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Silently drops surplus value tokens instead of failing the parse.
    pub fn ignore_extra_arguments(mut self) -> Self {
        self.ignores_extra_arguments = true;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn run_mode(mut self, run_mode: RunMode) -> Self {
        self.run_mode = Some(run_mode);
        self
    }

    pub fn cooldown(mut self, cooldown: Cooldown) -> Self {
        self.cooldowns.push(cooldown);
        self
    }

    pub fn check(mut self, check: Arc<dyn Check>) -> Self {
        self.checks.push(check);
        self
    }

    /// Selects the positional-only classic parser for this command.
    pub fn classic_parser(mut self) -> Self {
        self.parser = Arc::new(crate::parse::ClassicArgumentParser);
        self
    }

    /// Selects a custom argument parser variant.
    pub fn argument_parser(mut self, parser: Arc<dyn ArgumentParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn handler(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn build(self) -> Result<Arc<Command>, BuildError> {
        self.build_inheriting(&[])
    }

    pub(crate) fn build_inheriting(
        self,
        inherited_checks: &[Arc<dyn Check>],
    ) -> Result<Arc<Command>, BuildError> {
        let name = self.name;
        let handler = self.handler.ok_or_else(|| BuildError::MissingHandler {
            command: name.clone(),
        })?;

        let parameters: Vec<Arc<Parameter>> =
            self.parameters.into_iter().map(ParameterBuilder::build).collect();
        validate_parameters(&name, &parameters)?;

        let aliases = if self.aliases.is_empty() {
            vec![name.clone()]
        } else {
            self.aliases
        };

        let mut checks = inherited_checks.to_vec();
        checks.extend(self.checks);

        let command = Arc::new(Command::new(
            name,
            aliases,
            parameters,
            self.ignores_extra_arguments,
            self.priority,
            self.run_mode,
            self.cooldowns,
            checks,
            self.parser,
            handler,
        ));
        command.argument_parser().validate(&command)?;
        Ok(command)
    }
}

fn validate_parameters(command: &str, parameters: &[Arc<Parameter>]) -> Result<(), BuildError> {
    // Positionals must form one contiguous block.
    let mut seen_option_after_positional = false;
    let mut seen_positional = false;
    for parameter in parameters {
        if parameter.is_option() {
            seen_option_after_positional = seen_positional;
        } else if seen_option_after_positional {
            return Err(BuildError::NonContiguousPositionals {
                command: command.to_string(),
            });
        } else {
            seen_positional = true;
        }
    }

    // A remainder or multi-value positional must be the last positional.
    let positionals: Vec<&Arc<Parameter>> =
        parameters.iter().filter(|p| !p.is_option()).collect();
    for parameter in positionals.iter().rev().skip(1) {
        if parameter.is_remainder() || parameter.is_multiple() {
            return Err(BuildError::NotLastPositional {
                command: command.to_string(),
                parameter: parameter.name().to_string(),
            });
        }
    }

    // Option names must exist and be unique across the command.
    let mut short_seen = HashSet::new();
    let mut long_seen = HashSet::new();
    for parameter in parameters {
        let Some(option) = parameter.option() else {
            continue;
        };
        if option.short_names().is_empty() && option.long_names().is_empty() {
            return Err(BuildError::UnnamedOption {
                command: command.to_string(),
                parameter: parameter.name().to_string(),
            });
        }
        for &short in option.short_names() {
            if !short_seen.insert(short) {
                return Err(BuildError::DuplicateOptionName {
                    command: command.to_string(),
                    name: short.to_string(),
                });
            }
        }
        for long in option.long_names() {
            if !long_seen.insert(long.clone()) {
                return Err(BuildError::DuplicateOptionName {
                    command: command.to_string(),
                    name: long.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Builder for a module tree.
pub struct ModuleBuilder {
    name: String,
    aliases: Vec<String>,
    checks: Vec<Arc<dyn Check>>,
    commands: Vec<CommandBuilder>,
    submodules: Vec<ModuleBuilder>,
}

impl ModuleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            checks: Vec::new(),
            commands: Vec::new(),
            submodules: Vec::new(),
        }
    }

    /// Adds an alias segment contributed to every nested path. A module
    /// with no aliases adds no prefix at all.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds a check inherited by every command in this module tree.
    pub fn check(mut self, check: Arc<dyn Check>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn command(mut self, command: CommandBuilder) -> Self {
        self.commands.push(command);
        self
    }

    pub fn module(mut self, module: ModuleBuilder) -> Self {
        self.submodules.push(module);
        self
    }

    pub fn build(self) -> Result<Module, BuildError> {
        self.build_inheriting(&[])
    }

    fn build_inheriting(self, inherited: &[Arc<dyn Check>]) -> Result<Module, BuildError> {
        let mut checks = inherited.to_vec();
        checks.extend(self.checks);

        let mut commands = Vec::with_capacity(self.commands.len());
        for builder in self.commands {
            commands.push(builder.build_inheriting(&checks)?);
        }
        let mut submodules = Vec::with_capacity(self.submodules.len());
        for builder in self.submodules {
            submodules.push(builder.build_inheriting(&checks)?);
        }
        Ok(Module::new(self.name, self.aliases, commands, submodules))
    }
}
