//! # ranch-api: HTTP Service for the Address Engine
//!
//! | Route | Method | Purpose |
//! |-------|--------|---------|
//! | `/address` | GET | field schema of an empty address (default locale) |
//! | `/address` | POST | apply a `{key: value}` submission, return the resulting schema |
//! | `/address/{country}` | GET | field schema with the country preset |
//! | `/locales` | GET | locales of the loaded rule table |
//! | `/openapi.json` | GET | generated OpenAPI document |
//! | `/metrics` | GET | Prometheus text exposition |
//! | `/health/*` | GET | liveness and readiness probes |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! Handlers hold no business logic: each builds a fresh
//! [`ranch_address::Address`] over the shared rule table and delegates.
//! All errors map to `{"message": ...}` bodies via [`AppError`].

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::address::router())
        .merge(routes::locales::router())
        .merge(openapi::router())
        .route("/metrics", get(render_metrics))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: the rule table is loaded before the server binds.
async fn readiness() -> &'static str {
    "ready"
}

/// GET /metrics: Prometheus text exposition.
async fn render_metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| AppError::Unavailable("metrics recorder is not installed".into()))
}
