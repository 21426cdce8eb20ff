//! # Server Configuration
//!
//! Router wiring and server startup for Bandstand.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::handlers;

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
}

/// Creates and configures the Axum application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/venues", get(handlers::venues::index))
        .route("/venues/search", post(handlers::venues::search))
        .route(
            "/venues/create",
            get(handlers::venues::create_form).post(handlers::venues::create),
        )
        .route(
            "/venues/{id}",
            get(handlers::venues::detail).delete(handlers::venues::delete),
        )
        .route(
            "/venues/{id}/edit",
            get(handlers::venues::edit_form).post(handlers::venues::edit),
        )
        .route("/artists", get(handlers::artists::index))
        .route("/artists/search", post(handlers::artists::search))
        .route(
            "/artists/create",
            get(handlers::artists::create_form).post(handlers::artists::create),
        )
        .route("/artists/{id}", get(handlers::artists::detail))
        .route(
            "/artists/{id}/edit",
            get(handlers::artists::edit_form).post(handlers::artists::edit),
        )
        .route("/shows", get(handlers::shows::index))
        .route(
            "/shows/create",
            get(handlers::shows::create_form).post(handlers::shows::create),
        )
        .fallback(handlers::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let state = AppState {
        config: Arc::new(config),
        db,
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "bandstand listening");

    axum::serve(listener, app).await?;

    Ok(())
}
