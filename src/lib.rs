pub mod bank;
pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;
pub mod survey;

use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::store::InMemorySessionStore;
use crate::survey::{SurveyConfig, SurveyEngine};

pub fn create_app() -> axum::Router {
    let survey_config = SurveyConfig::from_env();
    let bank = Arc::new(seed::demo_bank(survey_config.max_rank));
    let store = Arc::new(InMemorySessionStore::new());
    let engine = Arc::new(SurveyEngine::new(survey_config, bank, store.clone()));
    let state = AppState::new(engine, store);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
