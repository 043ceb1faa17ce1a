//! The uniform fallible-external-call wrapper.
//!
//! Every outbound call in the pipeline — reasoning, embedding, music
//! search, command execution — goes through [`fallible`]: bounded timeout,
//! catch, log, degrade to a typed fallback value. Centralizing this keeps
//! the per-operation fallbacks declarative at the call sites and guarantees
//! no provider failure escapes as a crash.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Run `call` with a bounded timeout, degrading to `fallback` on any
/// failure or expiry.
///
/// `op` names the call site in the warning log.
pub async fn fallible<T, E, F>(op: &'static str, timeout_ms: u64, fallback: T, call: F) -> T
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
        Ok(Ok(value)) => value,
        Ok(Err(error)) => {
            warn!(%error, op, "external call failed, using fallback");
            fallback
        }
        Err(_) => {
            warn!(op, timeout_ms, "external call timed out, using fallback");
            fallback
        }
    }
}
