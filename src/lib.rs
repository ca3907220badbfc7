pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Full router: public routes plus the gated `/api` surface.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::public::root_get))
        .route("/health", get(handlers::public::health_get))
        .route("/healthz", get(handlers::public::health_get))
        .route("/login", post(handlers::public::login_post))
        // Protected API
        .merge(protected_routes(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected as api;

    Router::new()
        .route("/api/whoami", get(api::whoami_get))
        .route("/api/notes", get(api::notes_get).post(api::notes_post))
        .route(
            "/api/notes/:id",
            get(api::note_get).put(api::note_put).delete(api::note_delete),
        )
        // route_layer: the gate only runs for matched routes, so unknown
        // paths still 404 instead of 401.
        .route_layer(from_fn_with_state(
            state.codec.clone(),
            middleware::require_identity,
        ))
}
