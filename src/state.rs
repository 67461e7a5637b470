use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::store::InMemorySessionStore;
use crate::survey::SurveyEngine;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    engine: Arc<SurveyEngine>,
    store: Arc<InMemorySessionStore>,
}

impl AppState {
    pub fn new(engine: Arc<SurveyEngine>, store: Arc<InMemorySessionStore>) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            engine,
            store,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn engine(&self) -> Arc<SurveyEngine> {
        Arc::clone(&self.engine)
    }

    pub fn store(&self) -> Arc<InMemorySessionStore> {
        Arc::clone(&self.store)
    }
}
