//! JSON HTTP API for the till data mart.
//!
//! Exposes an axum [`Router`] backed by any [`till_core::store::SalesStore`].
//! Transport and lifecycle concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", till_api::api_router(store.clone()))
//! ```

pub mod analyses;
pub mod error;
pub mod forecast;
pub mod revenue;
pub mod summary;

use std::sync::Arc;

use axum::{Router, routing::get};
use till_core::store::SalesStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type. Every endpoint is read-only; rows
/// arrive through the import pipeline, never over HTTP.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: SalesStore + 'static,
{
  Router::new()
    // Summary
    .route("/summary", get(summary::handler::<S>))
    // Revenue
    .route("/revenue/products", get(revenue::by_product::<S>))
    .route("/revenue/regions", get(revenue::by_region::<S>))
    .route("/revenue/daily", get(revenue::daily::<S>))
    // Analysis log
    .route("/analyses", get(analyses::list::<S>))
    // Forecast
    .route("/forecast", get(forecast::handler::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
