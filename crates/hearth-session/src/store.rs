//! The injected session store.
//!
//! Modeled as an explicit object rather than ambient state so it can be
//! mocked in tests and locked per-process in production. The in-memory
//! implementation guards the map with one mutex; individual operations are
//! short read-modify-write cycles, so contention across conversation keys
//! is negligible.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hearth_core::Command;
use parking_lot::Mutex;
use tracing::{debug, info};

/// Lifecycle state of a stored session.
///
/// Only the waiting state is ever stored: the executed/canceled terminal
/// transitions clear the session instead of persisting a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Commands synthesized, awaiting the user's yes/no.
    AwaitingConfirmation,
}

/// A pending command set for one conversation key.
#[derive(Clone, Debug)]
pub struct Session {
    /// Commands to run on confirmation, in synthesis order.
    pub commands: Vec<Command>,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
    /// The originating conversation/device key.
    pub entity_id: String,
}

impl Session {
    /// Open a session stamped now.
    pub fn new(commands: Vec<Command>, entity_id: impl Into<String>) -> Self {
        Self {
            commands,
            status: SessionStatus::AwaitingConfirmation,
            created_at: Utc::now(),
            entity_id: entity_id.into(),
        }
    }

    /// Age of the session relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Keyed storage for pending sessions.
pub trait SessionStore: Send + Sync {
    /// The session for `key`, if one is live.
    fn get(&self, key: &str) -> Option<Session>;

    /// Store a session under `key`, replacing any prior one
    /// (last-write-wins — see DESIGN.md).
    fn put(&self, key: &str, session: Session);

    /// Remove the session for `key`, if any.
    fn delete(&self, key: &str);

    /// Evict every session older than `timeout`, regardless of key.
    /// Returns the number evicted.
    fn sweep(&self, timeout: Duration) -> usize;
}

/// Mutex-guarded in-memory store.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Whether any sessions are live.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<Session> {
        self.sessions.lock().get(key).cloned()
    }

    fn put(&self, key: &str, session: Session) {
        let replaced = self
            .sessions
            .lock()
            .insert(key.to_string(), session)
            .is_some();
        if replaced {
            info!(key, "replaced pending session (last-write-wins)");
        } else {
            debug!(key, "opened pending session");
        }
    }

    fn delete(&self, key: &str) {
        let _ = self.sessions.lock().remove(key);
    }

    fn sweep(&self, timeout: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|key, session| {
            let keep = session.age(now) <= timeout;
            if !keep {
                info!(key, "evicting expired session");
            }
            keep
        });
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(entity_id: &str) -> Command {
        let mut data = serde_json::Map::new();
        let _ = data.insert("entity_id".to_string(), serde_json::json!(entity_id));
        Command {
            service: "light.turn_on".to_string(),
            data,
        }
    }

    fn aged_session(secs: i64) -> Session {
        let mut session = Session::new(vec![command("light.a")], "device-1");
        session.created_at = Utc::now() - chrono::Duration::seconds(secs);
        session
    }

    #[test]
    fn put_get_delete() {
        let store = InMemorySessionStore::new();
        store.put("k1", Session::new(vec![command("light.a")], "k1"));

        let session = store.get("k1").unwrap();
        assert_eq!(session.status, SessionStatus::AwaitingConfirmation);
        assert_eq!(session.commands.len(), 1);

        store.delete("k1");
        assert!(store.get("k1").is_none());
    }

    #[test]
    fn get_unknown_key_is_none() {
        let store = InMemorySessionStore::new();
        assert!(store.get("nope").is_none());
    }

    #[test]
    fn put_overwrites_silently() {
        let store = InMemorySessionStore::new();
        store.put("k1", Session::new(vec![command("light.a")], "k1"));
        store.put("k1", Session::new(vec![command("light.b"), command("light.c")], "k1"));

        let session = store.get("k1").unwrap();
        assert_eq!(session.commands.len(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sweep_evicts_expired_any_key() {
        let store = InMemorySessionStore::new();
        store.put("stale-1", aged_session(400));
        store.put("stale-2", aged_session(301));
        store.put("fresh", aged_session(10));

        let evicted = store.sweep(Duration::from_secs(300));
        assert_eq!(evicted, 2);
        assert!(store.get("stale-1").is_none());
        assert!(store.get("stale-2").is_none());
        assert!(store.get("fresh").is_some());
    }

    #[test]
    fn sweep_empty_store_is_zero() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.sweep(Duration::from_secs(300)), 0);
    }

    #[test]
    fn session_age() {
        let session = aged_session(120);
        let age = session.age(Utc::now());
        assert!(age >= Duration::from_secs(119) && age <= Duration::from_secs(121));
    }

    #[test]
    fn future_created_at_ages_zero() {
        // Clock skew should not underflow.
        let session = aged_session(-60);
        assert_eq!(session.age(Utc::now() - chrono::Duration::seconds(120)), Duration::ZERO);
    }
}
