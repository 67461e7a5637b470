use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::survey::types::SurveySession;

/// Session persistence boundary. The engine only needs atomic per-session
/// load/save consistent with its single-writer stepping; the storage
/// technology behind this trait is deliberately unspecified.
pub trait SessionStore: Send + Sync {
    fn load(&self, session_id: &Uuid) -> Option<SurveySession>;
    fn save(&self, session: &SurveySession);
    fn remove(&self, session_id: &Uuid) -> bool;
}

/// Reference store: a guarded map, suitable for a single-process
/// deployment and for tests.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, SurveySession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Drop sessions idle for longer than `max_age_ms`. Driven by the
    /// background sweep in `main`, not by the engine.
    pub fn reap_idle(&self, max_age_ms: i64) -> usize {
        let cutoff = chrono::Utc::now().timestamp_millis() - max_age_ms;
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| session.updated_at >= cutoff);
        before - sessions.len()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, session_id: &Uuid) -> Option<SurveySession> {
        self.sessions.read().get(session_id).cloned()
    }

    fn save(&self, session: &SurveySession) {
        self.sessions
            .write()
            .insert(session.session_id, session.clone());
    }

    fn remove(&self, session_id: &Uuid) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }
}
