//! Evaluation of command checks.
//!
//! Ungrouped checks are AND'd and evaluated sequentially — the first
//! rejection wins. Checks sharing a group tag are OR'd: they run
//! concurrently and any one passing satisfies the group.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::trace;

use crucible_core::{Check, CheckFailure, Command, CommandContext};

pub(crate) async fn run_checks(
    command: &Command,
    ctx: &CommandContext,
) -> Result<(), CheckFailure> {
    let mut grouped: HashMap<&str, Vec<&Arc<dyn Check>>> = HashMap::new();
    for check in command.checks() {
        match check.group() {
            None => check.check(ctx).await?,
            Some(tag) => grouped.entry(tag).or_default().push(check),
        }
    }

    for (tag, checks) in grouped {
        let results = join_all(checks.iter().map(|check| check.check(ctx))).await;
        if results.iter().any(Result::is_ok) {
            trace!(group = tag, "check group satisfied");
            continue;
        }
        let reasons: Vec<String> = results
            .into_iter()
            .filter_map(Result::err)
            .map(|failure| failure.reason().to_string())
            .collect();
        return Err(CheckFailure::new(format!(
            "no check in group '{tag}' passed: {}",
            reasons.join("; ")
        )));
    }
    Ok(())
}
