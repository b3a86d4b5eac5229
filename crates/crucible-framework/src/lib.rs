//! # Crucible Framework
//!
//! The execution layer of the Crucible command framework.
//!
//! `crucible-core` turns input text into ranked matches and raw argument
//! fragments; this crate drives the rest of the pipeline:
//!
//! ```text
//! ┌──────────────┐    ┌────────┐    ┌────────┐    ┌───────────┐    ┌─────────┐
//! │ find + rank  │───▶│ parse  │───▶│ bind   │───▶│ checks    │───▶│ handler │
//! │ (core)       │    │ (core) │    │ (types)│    │ cooldowns │    │         │
//! └──────────────┘    └────────┘    └────────┘    └───────────┘    └─────────┘
//!          per overload, first accepted candidate wins ▲
//! ```
//!
//! - [`CommandService`](service::CommandService) owns the configuration
//!   and a copy-on-write snapshot of the command map: lookups run without
//!   a lock, registration swaps in the next version under a writer lock.
//! - The binder runs type parsers per fragment and enforces the
//!   required-parameter completeness the rich parser defers.
//! - Check evaluation: OR within a check group, AND across groups.
//! - [`cooldown`]: fixed-window buckets keyed by a host-supplied
//!   [`BucketKeyProvider`](cooldown::BucketKeyProvider).
//! - `CommandService` implements `tower::Service`, so timeout or
//!   rate-limit layers stack on top like on any middleware chain.

mod bind;
mod checks;

pub mod cooldown;
pub mod error;
pub mod service;

pub use cooldown::{BucketKeyProvider, CooldownGate};
pub use error::ExecutionFailure;
pub use service::{CommandService, ExecuteRequest, ExecutionOutcome};
