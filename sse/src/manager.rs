use crate::connection::{SessionId, SessionRegistry, Subject};
use log::*;
use std::sync::Arc;

/// Process-wide bookkeeping for stream sessions.
pub struct Manager {
    registry: Arc<SessionRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
        }
    }

    /// Register a new session and return its unique ID
    pub fn register_session(&self, subject: Subject) -> SessionId {
        let session_id = self.registry.register(subject.clone());
        info!(
            "Opened stream session {session_id} on {subject} ({} on subject, {} active)",
            self.registry.sessions_for(&subject),
            self.registry.len()
        );
        session_id
    }

    /// Unregister a session by ID
    pub fn unregister_session(&self, session_id: &SessionId) {
        if let Some(info) = self.registry.unregister(session_id) {
            info!(
                "Closed stream session {session_id} on {} after {:?} ({} active)",
                info.subject,
                info.opened_at.elapsed(),
                self.registry.len()
            );
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.registry.len()
    }

    pub fn subjects(&self) -> Vec<Subject> {
        self.registry.subjects()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
