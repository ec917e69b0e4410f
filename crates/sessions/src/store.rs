//! Session store.
//!
//! Holds the single server-issued session identifier for the lifetime of
//! the process.  Creation is attempted exactly once; a failure is kept as
//! a readable reason so the client can explain why it is disabled.

use std::sync::atomic::{AtomicBool, Ordering};

use dc_client::DocChatBackend;
use dc_domain::trace::TraceEvent;
use parking_lot::RwLock;

/// Where the session stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// `create_session` has not finished yet.
    Pending,
    /// The backend issued this identifier.
    Ready(String),
    /// Creation failed; uploads and chat stay disabled.
    Unavailable { reason: String },
}

impl SessionStatus {
    pub fn session_id(&self) -> Option<&str> {
        match self {
            SessionStatus::Ready(id) => Some(id),
            _ => None,
        }
    }
}

pub struct SessionStore {
    attempted: AtomicBool,
    status: RwLock<SessionStatus>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            attempted: AtomicBool::new(false),
            status: RwLock::new(SessionStatus::Pending),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status.read().clone()
    }

    pub fn session_id(&self) -> Option<String> {
        self.status.read().session_id().map(str::to_owned)
    }

    /// Ask the backend for a session identifier.
    ///
    /// Only the first call reaches the backend; later calls return the
    /// current status unchanged.  There is no retry.
    pub async fn create_session(&self, backend: &dyn DocChatBackend) -> SessionStatus {
        if self.attempted.swap(true, Ordering::AcqRel) {
            return self.status();
        }

        let next = match backend.create_session().await {
            Ok(created) if !created.session_id.trim().is_empty() => {
                TraceEvent::SessionCreated {
                    session_id: created.session_id.clone(),
                }
                .emit();
                SessionStatus::Ready(created.session_id)
            }
            Ok(_) => unavailable("backend returned an empty session id".into()),
            Err(e) => unavailable(e.to_string()),
        };

        *self.status.write() = next.clone();
        next
    }
}

fn unavailable(reason: String) -> SessionStatus {
    tracing::warn!(%reason, "session creation failed; client disabled");
    TraceEvent::SessionUnavailable {
        reason: reason.clone(),
    }
    .emit();
    SessionStatus::Unavailable { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{backend_error, ScriptedBackend};

    #[tokio::test]
    async fn stores_issued_id() {
        let backend = ScriptedBackend::new();
        backend.push_session(Ok("sess-1"));

        let store = SessionStore::new();
        assert_eq!(store.status(), SessionStatus::Pending);

        let status = store.create_session(&backend).await;
        assert_eq!(status, SessionStatus::Ready("sess-1".into()));
        assert_eq!(store.session_id().as_deref(), Some("sess-1"));
    }

    #[tokio::test]
    async fn failure_keeps_reason_and_never_retries() {
        let backend = ScriptedBackend::new();
        backend.push_session(Err(backend_error(500, Some("database down"))));
        backend.push_session(Ok("sess-late"));

        let store = SessionStore::new();
        let status = store.create_session(&backend).await;
        let SessionStatus::Unavailable { reason } = status else {
            panic!("expected unavailable");
        };
        assert!(reason.contains("database down"));
        assert!(store.session_id().is_none());

        // Second call is a no-op: the queued success is never consumed.
        let again = store.create_session(&backend).await;
        assert!(matches!(again, SessionStatus::Unavailable { .. }));
        assert_eq!(backend.session_calls(), 1);
    }

    #[tokio::test]
    async fn blank_id_is_unavailable() {
        let backend = ScriptedBackend::new();
        backend.push_session(Ok("   "));

        let store = SessionStore::new();
        let status = store.create_session(&backend).await;
        assert!(matches!(status, SessionStatus::Unavailable { .. }));
    }
}
