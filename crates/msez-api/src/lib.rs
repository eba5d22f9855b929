//! # msez-api — Axum API Services
//!
//! The top-level API service layer for the SEZ Stack, built on Axum/Tower/Tokio.
//! Assembles the domain routers into a single application with shared
//! middleware for authentication, tracing, metrics, and rate limiting.
//!
//! ## Routes
//!
//! - `/v1/corridors/*` — corridor proposal and lifecycle transitions
//! - `/v1/entities/*` — entity registration and lifecycle transitions
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → MetricsLayer → RateLimitLayer → AuthLayer
//!
//! ## Architecture
//!
//! Request/response types are compile-time contracts via serde derive.
//! OpenAPI 3.1 specs are auto-generated from handler types via utoipa.
//! Database queries are compile-time verified via SQLx.
//!
//! ## Crate Policy
//!
//! - Sits at the top of the dependency DAG — depends on all other crates.
//! - No business logic in route handlers — delegates to domain crates.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router over the given shared state.
pub fn app(state: AppState) -> axum::Router {
    axum::Router::new()
        .merge(routes::corridors::router())
        .merge(routes::entities::router())
        .with_state(state)
}
