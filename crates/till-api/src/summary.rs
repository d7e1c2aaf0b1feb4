//! Handler for `GET /summary`.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;
use till_core::{revenue::StoreCounts, store::SalesStore};

use crate::error::ApiError;

/// Headline figures for the dashboard: the overall revenue plus row
/// counts across all four tables.
#[derive(Debug, Serialize)]
pub struct Summary {
  pub total_revenue: f64,
  pub counts:        StoreCounts,
}

/// `GET /summary`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Summary>, ApiError>
where
  S: SalesStore + 'static,
{
  let total_revenue = store
    .total_revenue()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let counts = store
    .counts()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(Summary { total_revenue, counts }))
}
