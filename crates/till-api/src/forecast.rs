//! Handler for `GET /forecast`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use till_core::{revenue::DailyRevenue, store::SalesStore};
use till_forecast::{ForecastOptions, forecast_daily_revenue};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
  /// Days to forecast; defaults to the model's standard horizon.
  pub horizon: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
  pub horizon:       usize,
  pub flat_fallback: bool,
  pub points:        Vec<DailyRevenue>,
}

/// `GET /forecast[?horizon=N]`
///
/// Too little history to fit the model is the caller's problem, not the
/// server's: it maps to 400, with the requirement in the message.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ForecastParams>,
) -> Result<Json<ForecastResponse>, ApiError>
where
  S: SalesStore + 'static,
{
  let mut opts = ForecastOptions::default();
  if let Some(horizon) = params.horizon {
    opts.horizon = horizon;
  }

  let series = store
    .daily_revenue()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let forecast = forecast_daily_revenue(&series, &opts)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  Ok(Json(ForecastResponse {
    horizon:       opts.horizon,
    flat_fallback: forecast.flat_fallback,
    points:        forecast.points,
  }))
}
