use dashmap::DashMap;
use log::*;
use std::collections::HashSet;
use std::time::Instant;

pub type Subject = String;

/// Unique identifier for a stream session (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub subject: Subject,
    pub opened_at: Instant,
}

/// Registry of open stream sessions with a secondary index by subject.
///
/// Sessions never share state through the registry; it only exists so the process can
/// report what is currently being streamed.
pub struct SessionRegistry {
    /// Primary storage: lookup by session id for registration/cleanup - O(1)
    sessions: DashMap<SessionId, SessionInfo>,

    /// Secondary index: sessions per subject - O(1)
    subject_index: DashMap<Subject, HashSet<SessionId>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            subject_index: DashMap::new(),
        }
    }

    pub fn register(&self, subject: Subject) -> SessionId {
        let session_id = SessionId::new();

        self.sessions.insert(
            session_id.clone(),
            SessionInfo {
                subject: subject.clone(),
                opened_at: Instant::now(),
            },
        );

        self.subject_index
            .entry(subject)
            .or_default()
            .insert(session_id.clone());

        session_id
    }

    /// Returns the removed session's info so callers can log its lifetime.
    pub fn unregister(&self, session_id: &SessionId) -> Option<SessionInfo> {
        let (_, info) = self.sessions.remove(session_id)?;

        match self.subject_index.get_mut(&info.subject) {
            Some(mut entry) => {
                entry.remove(session_id);
            }
            None => warn!("Session {session_id} missing from subject index"),
        }
        // Another session may have registered on the subject since the lock was released.
        self.subject_index
            .remove_if(&info.subject, |_, ids| ids.is_empty());

        Some(info)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn sessions_for(&self, subject: &str) -> usize {
        self.subject_index
            .get(subject)
            .map(|ids| ids.len())
            .unwrap_or(0)
    }

    /// Subjects with at least one open session, sorted.
    pub fn subjects(&self) -> Vec<Subject> {
        let mut subjects: Vec<Subject> = self
            .subject_index
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        subjects.sort();
        subjects
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
