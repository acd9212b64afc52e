//! # polmon-api: Web Shell for the Policy Monitor
//!
//! Server-rendered dashboard over the policy dataset. Pages are plain HTML
//! forms; every action is a `POST` that updates the caller's session and
//! redirects back to `/`.
//!
//! ## Routes
//!
//! | Method | Path                  | Module                  | Effect                         |
//! |--------|-----------------------|-------------------------|--------------------------------|
//! | GET    | `/`                   | [`routes::dashboard`]   | render current view            |
//! | POST   | `/filters`            | [`routes::dashboard`]   | change filter selection        |
//! | POST   | `/page`               | [`routes::dashboard`]   | move the page cursor           |
//! | POST   | `/download`           | [`routes::dashboard`]   | show the export panel          |
//! | POST   | `/download/back`      | [`routes::dashboard`]   | back to the table              |
//! | POST   | `/records/{id}`       | [`routes::detail`]      | open a record                  |
//! | POST   | `/back`               | [`routes::detail`]      | back to the table              |
//! | POST   | `/export`             | [`routes::export`]      | validate, serialize, deliver   |
//! | GET    | `/health/liveness`    | this module             | liveness probe                 |
//! | GET    | `/health/readiness`   | this module             | readiness probe                |
//! | GET    | `/metrics`            | this module             | JSON counters                  |
//!
//! ## Middleware Stack
//!
//! Outermost first: `TraceLayer`, metrics, then (dashboard routes only)
//! session resolution.

pub mod bootstrap;
pub mod error;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Extension, Json, Router};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::metrics::{metrics_middleware, ApiMetrics, MetricsSnapshot};
use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();

    let dashboard = Router::new()
        .merge(routes::dashboard::router())
        .merge(routes::detail::router())
        .merge(routes::export::router())
        .layer(from_fn(session::session_middleware))
        .layer(Extension(state.sessions.clone()))
        .with_state(state);

    let probes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(metrics_json));

    Router::new()
        .merge(probes)
        .merge(dashboard)
        .fallback(not_found)
        .layer(from_fn(metrics_middleware))
        .layer(Extension(metrics))
        .layer(TraceLayer::new_for_http())
}

async fn liveness() -> &'static str {
    "ok"
}

/// The dataset is loaded before the listener binds, so a serving process
/// is always ready.
async fn readiness() -> &'static str {
    "ready"
}

async fn metrics_json(Extension(metrics): Extension<ApiMetrics>) -> Json<MetricsSnapshot> {
    Json(metrics.snapshot())
}

async fn not_found() -> AppError {
    AppError::NotFound("no such page".into())
}
