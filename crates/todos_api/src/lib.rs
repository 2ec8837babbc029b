//! HTTP transport for the todos service.
//!
//! # Responsibility
//! - Expose todo CRUD over REST on top of `todos_core`.
//! - Convert typed core errors into status codes and JSON error bodies.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{ConfigError, DbLocation, ServerConfig};
pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use axum::Router;
use log::info;
use tokio::net::TcpListener;

/// Builds the router with all routes and request logging.
pub fn build_router(state: AppState) -> Router {
    routes::api_router()
        .layer(axum::middleware::from_fn(middleware::log_request))
        .with_state(state)
}

/// Serves the router on `listener` until the process stops.
pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    info!(
        "event=server_start module=api status=ok addr={addr} version={}",
        todos_core::core_version()
    );
    axum::serve(listener, build_router(state)).await
}
