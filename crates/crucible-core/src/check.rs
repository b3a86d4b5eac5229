//! The check contract: permission gates evaluated after a command is
//! matched and its arguments bound, before its handler runs.

use async_trait::async_trait;
use thiserror::Error;

use crate::context::CommandContext;

/// Why a check rejected the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct CheckFailure {
    reason: String,
}

impl CheckFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A permission gate attached to a command or inherited from its module.
///
/// Checks sharing a [`group`](Check::group) tag are OR'd — any one of them
/// passing suffices. Checks in distinct groups (and ungrouped checks) are
/// AND'd.
#[async_trait]
pub trait Check: Send + Sync {
    /// Optional OR-group tag.
    fn group(&self) -> Option<&str> {
        None
    }

    async fn check(&self, ctx: &CommandContext) -> Result<(), CheckFailure>;
}
