//! # checkpoint-api: Axum HTTP Service for the Border Checkpoint
//!
//! Customs officers register crossings, scan documents and authorize exit;
//! administrators manage reported anomalies and toll offices; open
//! endpoints answer reference and traffic queries.
//!
//! ## API Surface
//!
//! | Prefix                    | Module                           |
//! |---------------------------|----------------------------------|
//! | `/api/CrossingInfo*`      | [`routes::crossings`]            |
//! | `/api/Document/*`         | [`routes::documents`]            |
//! | `/api/DocumentAnomaly*`   | [`routes::anomalies`]            |
//! | `/api/Person*`            | [`routes::persons`]              |
//! | `/api/TollOffice*`        | [`routes::toll_offices`]         |
//! | `/api/RequiredDocument`   | [`routes::required_documents`]   |
//! | `/api/Pass`               | [`routes::traffic`]              |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! BodyLimit → TraceLayer → AuthMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Generated via utoipa derive macros, served at `/openapi.json`.

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod views;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health checks (`/health/*`) are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let body_limit = state.config.max_upload_bytes;

    let api = Router::new()
        .merge(routes::crossings::router())
        .merge(routes::documents::router())
        .merge(routes::anomalies::router())
        .merge(routes::persons::router())
        .merge(routes::toll_offices::router())
        .merge(routes::required_documents::router())
        .merge(routes::traffic::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness check: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
