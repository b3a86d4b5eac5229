//! Failure and error types for the command core.
//!
//! Parse failures are ordinary values: they flow up through the match loop
//! to overload resolution and are never panics. Only registration-time
//! structural conflicts ([`MapError`]) and malformed builder state
//! ([`BuildError`]) are fatal, and even those are returned as `Err` from the
//! registration calls.

use thiserror::Error;

/// A structured argument-parse failure.
///
/// Every variant renders one human-readable diagnostic via `Display` and
/// carries enough detail (offending option name, position, or value) to
/// report precisely without re-deriving parser state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// A quoted slice ran to end of input without its closing character.
    #[error("a quotation mark was left unclosed")]
    UnclosedQuotationMark,

    /// A quotation mark appeared in the middle of an argument
    /// (classic parser only).
    #[error("unexpected quotation mark at position {position}")]
    UnexpectedQuotationMark { position: usize },

    /// An argument started directly after a closing quote without
    /// whitespace in between (classic parser only).
    #[error("expected whitespace between arguments at position {position}")]
    NoWhitespaceBetweenArguments { position: usize },

    /// A flag did not resolve to any declared option parameter.
    #[error("unknown option '{name}'")]
    UnknownOptionName { name: String },

    /// A non-repeatable option appeared more than once.
    #[error("option '{name}' was supplied more than once")]
    DuplicateOptionName { name: String },

    /// Two options from the same mutual-exclusion group were supplied.
    #[error("option '{name}' cannot be combined with '{conflicting}'")]
    MutuallyExclusiveOption { name: String, conflicting: String },

    /// A flag appeared where the pending option's value was expected.
    #[error("option '{name}' expects a value")]
    ExpectedOptionValue { name: String },

    /// A value token arrived with no positional parameter left to take it.
    #[error("no parameter left to take the value '{value}'")]
    TooManyValues { value: String },

    /// A required positional parameter was never reached
    /// (classic parser only).
    #[error("too few arguments: '{parameter}' was not supplied")]
    TooFewArguments { parameter: String },

    /// Text was left over after every declared parameter was satisfied
    /// (classic parser only).
    #[error("too many arguments: '{value}' is left over")]
    TooManyArguments { value: String },
}

/// A registration-time conflict in the command map.
///
/// These abort the insertion; [`add_module`](crate's service layer) treats
/// a whole module as one batch and rolls back on the first error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// A command was mapped with no alias path segments at all.
    #[error("command '{command}' cannot be mapped to an empty alias path")]
    EmptyPath { command: String },

    /// Two commands at the same terminal segment share a parameter-type
    /// signature.
    #[error(
        "command '{command}' collides with '{existing}' at segment '{segment}': \
         overloads must have distinct signatures"
    )]
    DuplicateSignature {
        command: String,
        existing: String,
        segment: String,
    },

    /// Same type sequence, one overload with a trailing remainder — but the
    /// other ignores extra arguments, so both would accept any input.
    #[error(
        "command '{command}' collides with '{existing}' at segment '{segment}': \
         a remainder overload cannot coexist with one that ignores extra arguments"
    )]
    AmbiguousRemainder {
        command: String,
        existing: String,
        segment: String,
    },
}

/// Malformed command or module builder state, reported at build time before
/// any matching ever occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A command was built without a handler.
    #[error("command '{command}' has no handler")]
    MissingHandler { command: String },

    /// A remainder or multi-value positional parameter was not the last
    /// positional parameter.
    #[error("command '{command}': parameter '{parameter}' must be the last positional parameter")]
    NotLastPositional { command: String, parameter: String },

    /// Positional parameters were interrupted by an option parameter and
    /// resumed afterwards.
    #[error("command '{command}': positional parameters must be contiguous")]
    NonContiguousPositionals { command: String },

    /// Two option parameters share a short or long name.
    #[error("command '{command}': option name '{name}' is declared twice")]
    DuplicateOptionName { command: String, name: String },

    /// An option parameter was declared without any short or long name.
    #[error("command '{command}': option parameter '{parameter}' has no names")]
    UnnamedOption { command: String, parameter: String },

    /// The classic parser only supports positional parameters.
    #[error(
        "command '{command}' uses the classic parser but declares option parameter '{parameter}'"
    )]
    OptionWithClassicParser { command: String, parameter: String },
}
