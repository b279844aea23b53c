pub mod config;
pub mod core;
pub mod logging;
pub mod response;
pub mod routes;
pub mod state;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::EngineConfig;
use crate::state::AppState;

pub fn create_app(drift_seed: Option<u64>) -> axum::Router {
    let state = AppState::new(EngineConfig::default(), drift_seed);
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
