//! Traits implemented by the host platform.
//!
//! The orchestration core never talks to a live platform directly — it
//! consumes these traits, which keeps every pipeline stage testable with
//! hand-written mocks.

use async_trait::async_trait;
use hearth_core::Command;
use thiserror::Error;

use crate::snapshot::EntitySnapshot;

/// Errors from host-platform operations.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The entity registry could not be read.
    #[error("entity source unavailable: {0}")]
    Source(String),
    /// A service call failed or was rejected.
    #[error("command execution failed: {0}")]
    Execution(String),
}

/// Read access to the platform's entity registry.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// List every entity the platform knows about, exposed or not.
    async fn list_entities(&self) -> Result<Vec<EntitySnapshot>, PlatformError>;
}

/// Executes a single device command against the platform.
///
/// The core treats any error as a failed command and never assumes
/// atomicity across multiple commands.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute one command.
    async fn execute(&self, command: &Command) -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            PlatformError::Source("offline".to_string()).to_string(),
            "entity source unavailable: offline"
        );
        assert_eq!(
            PlatformError::Execution("no such service".to_string()).to_string(),
            "command execution failed: no such service"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlatformError>();
    }
}
