//! Handler for `GET /analyses`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use till_core::{analysis::AnalysisResult, store::SalesStore};

use crate::error::ApiError;

/// Rows returned when `?limit` is absent.
const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// `GET /analyses[?limit=N]` — newest log rows first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<AnalysisResult>>, ApiError>
where
  S: SalesStore + 'static,
{
  let rows = store
    .recent_analyses(params.limit.unwrap_or(DEFAULT_LIMIT))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}
