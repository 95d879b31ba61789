pub mod api;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod health;
pub mod state;
pub mod store;
pub mod vote;

use axum::Router;
use axum::routing::{get, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::ServerConfig;
use state::AppState;
use store::StoreError;

/// Open the store named by `config` and build the router around it.
pub fn build_app(config: ServerConfig) -> Result<(Router<()>, AppState), StoreError> {
    let state = AppState::new(config)?;
    Ok((router(state.clone()), state))
}

/// Build the Axum router for an already-initialized state.
pub fn router(state: AppState) -> Router<()> {
    let mut api_routes = Router::new()
        .route("/games/top", get(api::top_games))
        .route("/games/random", get(api::random_game))
        .route("/games/{id}", get(api::get_game))
        .route("/games/{id}/vote", put(api::vote));

    if state.config.cors_allow_any_origin {
        api_routes = api_routes.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Seed the store from the configured fixture file, if any.
pub async fn seed_from_config(state: &AppState) -> Result<usize, StoreError> {
    let Some(path) = state.config.fixtures.clone() else {
        return Ok(0);
    };
    state
        .store
        .call(move |store| fixtures::seed_from_file(store, &path))
        .await
}
