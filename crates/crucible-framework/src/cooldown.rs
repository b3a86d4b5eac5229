//! Cooldown bucket bookkeeping.
//!
//! Commands declare [`Cooldown`](crucible_core::Cooldown)s; the host
//! supplies a [`BucketKeyProvider`] telling the gate what a bucket tag
//! means for a given invocation (per-user, per-channel, global, ...).
//! Buckets use a fixed window: the first use opens the window, and usage
//! resets once the window length has elapsed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

use crucible_core::{Command, CommandContext};

/// Derives the bucket key identifying the caller for a cooldown.
///
/// Returning `None` exempts the invocation from that cooldown.
pub trait BucketKeyProvider: Send + Sync {
    fn key(&self, bucket: &str, ctx: &CommandContext) -> Option<String>;
}

#[derive(Debug)]
struct BucketState {
    window_start: Instant,
    used: u32,
}

/// Tracks cooldown windows for every (command, bucket, caller key).
#[derive(Debug, Default)]
pub struct CooldownGate {
    buckets: Mutex<HashMap<(String, String, String), BucketState>>,
}

impl CooldownGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one use of `command` for the caller identified through
    /// `provider`. Returns the remaining window time when a bucket is
    /// exhausted.
    pub fn hit(
        &self,
        command: &Command,
        ctx: &CommandContext,
        provider: Option<&dyn BucketKeyProvider>,
    ) -> Result<(), Duration> {
        if command.cooldowns().is_empty() {
            return Ok(());
        }
        let Some(provider) = provider else {
            return Ok(());
        };

        let now = Instant::now();
        let mut buckets = self.buckets.lock();
        for cooldown in command.cooldowns() {
            let Some(key) = provider.key(&cooldown.bucket, ctx) else {
                continue;
            };
            let id = (
                command.name().to_string(),
                cooldown.bucket.clone(),
                key,
            );
            let state = buckets.entry(id).or_insert(BucketState {
                window_start: now,
                used: 0,
            });
            let elapsed = now.duration_since(state.window_start);
            if elapsed >= cooldown.per {
                state.window_start = now;
                state.used = 0;
            }
            if state.used >= cooldown.amount {
                let retry_after = cooldown.per.saturating_sub(elapsed);
                trace!(
                    command = command.name(),
                    bucket = %cooldown.bucket,
                    ?retry_after,
                    "cooldown bucket exhausted"
                );
                return Err(retry_after);
            }
            state.used += 1;
        }
        Ok(())
    }
}
