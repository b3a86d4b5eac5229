//! # Crucible
//!
//! A command framework for chat bots: given a free-form message, find the
//! registered command by walking a hierarchical alias trie, parse the rest
//! of the text into typed arguments honoring quoting and option flags, run
//! permission checks and cooldowns, and invoke application code.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ input text │──▶│ CommandMap  │──▶│ Argument     │──▶│ checks,      │
//! │ "ban a -r" │   │ (alias trie)│   │ parser+binder│   │ cooldowns,   │
//! └────────────┘   └─────────────┘   └──────────────┘   │ handler      │
//!                                                       └──────────────┘
//! ```
//!
//! - **crucible-core**: the synchronous matching and parsing core.
//! - **crucible-framework**: the async execution pipeline around it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crucible::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = CommandService::new(ServiceConfig::default());
//!     service.add_module(
//!         ModuleBuilder::new("moderation")
//!             .command(
//!                 CommandBuilder::new("ban")
//!                     .parameter(ParameterBuilder::value::<String>("user"))
//!                     .parameter(
//!                         ParameterBuilder::option::<String>("reason")
//!                             .short('r')
//!                             .long("reason"),
//!                     )
//!                     .handler(handler_fn(|ctx| async move {
//!                         let user: &String = ctx.arguments().get("user").unwrap();
//!                         println!("banning {user}");
//!                         Ok(())
//!                     })),
//!             )
//!             .build()?,
//!     )?;
//!
//!     let outcome = service.execute("ban alice -r spam", StateMap::new()).await;
//!     assert!(outcome.is_success());
//!     Ok(())
//! }
//! ```

pub use crucible_core as core;
pub use crucible_framework as framework;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use crucible::prelude::*;
/// ```
pub mod prelude {
    // Service - main entry point
    pub use crucible_framework::{
        BucketKeyProvider, CommandService, ExecuteRequest, ExecutionFailure, ExecutionOutcome,
    };

    // Registration - builders and handler adapters
    pub use crucible_core::{
        CommandBuilder, Cooldown, ModuleBuilder, ParameterBuilder, handler_fn,
    };

    // Configuration surface
    pub use crucible_core::{
        CaseSensitivity, QuotationMarks, RunMode, SeparatorRequirement, ServiceConfig,
    };

    // Contracts for application code
    pub use crucible_core::{
        Check, CheckFailure, CommandContext, HandlerError, HandlerResult, StateMap, TypeParseFailure,
        TypeParser,
    };

    // Produced surface - matches and failures
    pub use crucible_core::{Match, ParseFailure, RawArgument, RawArguments};
}
