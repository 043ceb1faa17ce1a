//! # hearth-logging
//!
//! Structured logging with `tracing` for the Hearth assistant.
//!
//! One call to [`init`] from the binary installs a compact subscriber with
//! env-filter support (`RUST_LOG`, defaulting to `info`). Library crates
//! only ever emit `tracing` events and never install subscribers.

#![deny(unsafe_code)]

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Filter resolution: `RUST_LOG` if set, otherwise `info`. Safe to call
/// once per process; later calls are ignored (useful in tests where any
/// test may initialize logging first).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        tracing::info!("logging initialized twice without panicking");
    }
}
