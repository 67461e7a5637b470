use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use vocab_survey_backend::config::Config;
use vocab_survey_backend::logging;
use vocab_survey_backend::routes;
use vocab_survey_backend::seed;
use vocab_survey_backend::state::AppState;
use vocab_survey_backend::store::InMemorySessionStore;
use vocab_survey_backend::survey::{SurveyConfig, SurveyEngine};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

    let survey_config = SurveyConfig::from_env();
    tracing::info!(
        max_rank = survey_config.max_rank,
        sampler = survey_config.sampler.as_str(),
        "survey engine configured"
    );

    let bank = Arc::new(seed::demo_bank(survey_config.max_rank));
    let store = Arc::new(InMemorySessionStore::new());
    let engine = Arc::new(SurveyEngine::new(survey_config, bank, store.clone()));
    let state = AppState::new(Arc::clone(&engine), Arc::clone(&store));

    // TTL sweep for abandoned sessions lives outside the engine.
    let ttl_ms = (config.session_ttl_minutes * 60 * 1000) as i64;
    let reaper_store = Arc::clone(&store);
    let reaper_engine = Arc::clone(&engine);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let removed = reaper_store.reap_idle(ttl_ms);
            let pruned = reaper_engine.prune_locks();
            if removed > 0 || pruned > 0 {
                tracing::info!(removed, pruned, "reaped idle survey sessions");
            }
        }
    });

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    tracing::info!(%addr, "vocab-survey-backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("graceful shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
