//! Handlers for `/revenue/*` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/revenue/products` | Optional `?limit=N`; descending by total |
//! | `GET`  | `/revenue/regions` | Descending by total |
//! | `GET`  | `/revenue/daily` | Ascending by date |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use till_core::{
  revenue::{DailyRevenue, GroupTotal},
  store::SalesStore,
};

use crate::error::ApiError;

// ─── By product ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProductParams {
  /// Keep only the top N products.
  pub limit: Option<usize>,
}

/// `GET /revenue/products[?limit=N]`
pub async fn by_product<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ProductParams>,
) -> Result<Json<Vec<GroupTotal>>, ApiError>
where
  S: SalesStore + 'static,
{
  let mut groups = store
    .revenue_by_product()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if let Some(limit) = params.limit {
    groups.truncate(limit);
  }
  Ok(Json(groups))
}

// ─── By region ────────────────────────────────────────────────────────────────

/// `GET /revenue/regions`
pub async fn by_region<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<GroupTotal>>, ApiError>
where
  S: SalesStore + 'static,
{
  let groups = store
    .revenue_by_region()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(groups))
}

// ─── Daily series ─────────────────────────────────────────────────────────────

/// `GET /revenue/daily`
pub async fn daily<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<DailyRevenue>>, ApiError>
where
  S: SalesStore + 'static,
{
  let series = store
    .daily_revenue()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(series))
}
