//! # Crucible Core
//!
//! The command-matching and argument-parsing core of the Crucible command
//! framework.
//!
//! This crate turns a free-form input string into a concrete command
//! invocation with raw, per-parameter argument fragments. It is fully
//! synchronous and holds no shared mutable state; the async execution
//! pipeline lives in `crucible-framework`.
//!
//! ## Data Flow
//!
//! ```text
//! ┌────────────┐     ┌─────────────┐     ┌──────────────────┐
//! │ input text │────▶│ CommandMap  │────▶│ ranked Matches   │
//! └────────────┘     │  (trie)     │     │ (overload groups)│
//!                    └─────────────┘     └────────┬─────────┘
//!                                                 │ per candidate
//!                    ┌─────────────┐     ┌────────▼─────────┐
//!                    │ Lexer       │◀────│ ArgumentParser   │
//!                    │ (slices,    │     │ (rich / classic) │
//!                    │  tokens)    │     └────────┬─────────┘
//!                    └─────────────┘              ▼
//!                                        RawArguments → binder (framework)
//! ```
//!
//! ## Pieces
//!
//! - **Lexer** ([`lex`]): splits raw argument text into quote-aware slices
//!   and classifies them into value / short-option / long-option tokens.
//! - **Argument parsers** ([`parse`]): the rich token-based parser with
//!   option support, and the positional-only classic parser, behind one
//!   [`ArgumentParser`] trait.
//! - **Command map** ([`map`]): the alias trie with separator- and
//!   case-aware lookup yielding all prefix matches.
//! - **Ranking** ([`ranking`]): orders matches into overload groups.
//! - **Model** ([`command`], [`parameter`], [`module`], [`builder`]): the
//!   immutable command/parameter/module descriptions and their fluent
//!   builders.
//! - **Contracts** ([`typeparse`], [`check`], [`handler`]): the seams the
//!   execution layer plugs application code into.

pub mod args;
pub mod builder;
pub mod check;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod lex;
pub mod map;
pub mod module;
pub mod parameter;
pub mod parse;
pub mod ranking;
pub mod typeparse;

pub use args::{ArgumentValue, Arguments, BoundValue, RawArgument, RawArguments};
pub use builder::{CommandBuilder, ModuleBuilder, ParameterBuilder};
pub use check::{Check, CheckFailure};
pub use command::{Command, Cooldown, Signature};
pub use config::{
    CaseSensitivity, QuotationMarks, RunMode, SeparatorRequirement, ServiceConfig,
};
pub use context::{CommandContext, StateMap};
pub use error::{BuildError, MapError, ParseFailure};
pub use handler::{BoxFuture, CommandHandler, HandlerError, HandlerResult, handler_fn};
pub use map::{CommandMap, Match};
pub use module::Module;
pub use parameter::{Cardinality, OptionData, Parameter, TypeMeta};
pub use parse::{ArgumentParser, ClassicArgumentParser, RichArgumentParser};
pub use ranking::rank_matches;
pub use typeparse::{FromStrParser, TypeParseFailure, TypeParser};
