//! Autoregression on the differenced daily series.
//!
//! The model is an order-`p` autoregression with intercept, fitted on the
//! `d`-times differenced revenue totals. Predictions iterate the lag
//! recursion and are integrated back to revenue levels by cumulative sums
//! from the last observed values. There is no moving-average term and no
//! randomness; the same series and options always produce the same
//! forecast.

use chrono::Duration;
use nalgebra::{DMatrix, DVector};
use till_core::revenue::DailyRevenue;

use crate::error::{Error, Result};

/// Model shape and forecast length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastOptions {
  /// Number of lagged differences in the regression.
  pub ar_order:   usize,
  /// How many times the series is differenced before fitting.
  pub difference: usize,
  /// Days to forecast past the end of the series.
  pub horizon:    usize,
}

impl Default for ForecastOptions {
  fn default() -> Self {
    Self { ar_order: 5, difference: 1, horizon: 7 }
  }
}

/// Forecast revenue levels, one per day past the end of the series.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
  pub points:        Vec<DailyRevenue>,
  /// Set when the regression had no finite solution and the points are a
  /// flat line at the last observed level.
  pub flat_fallback: bool,
}

/// Forecast `opts.horizon` days of revenue from an ascending daily series.
///
/// The series is used as given; calendar gaps between observations are not
/// filled in. Forecast dates continue day-by-day from the last observed
/// date.
pub fn forecast_daily_revenue(
  series: &[DailyRevenue],
  opts: &ForecastOptions,
) -> Result<Forecast> {
  let needed = opts.ar_order + opts.difference + 1;
  if series.len() < needed {
    return Err(Error::InsufficientData { needed, got: series.len() });
  }
  let last = &series[series.len() - 1];

  // Difference down to the modelled series, remembering the last value of
  // every stage for the integration on the way back up.
  let mut work: Vec<f64> = series.iter().map(|p| p.total).collect();
  let mut stage_tails = Vec::with_capacity(opts.difference);
  for _ in 0..opts.difference {
    stage_tails.push(work[work.len() - 1]);
    work = difference(&work);
  }

  let Some(beta) = fit_ar(&work, opts.ar_order) else {
    return Ok(flat_forecast(last, opts.horizon));
  };

  let mut history = work;
  let mut predicted = Vec::with_capacity(opts.horizon);
  for _ in 0..opts.horizon {
    let mut next = beta[0];
    for lag in 0..opts.ar_order {
      next += beta[lag + 1] * history[history.len() - 1 - lag];
    }
    history.push(next);
    predicted.push(next);
  }

  let points = integrate(predicted, &stage_tails)
    .into_iter()
    .enumerate()
    .map(|(i, total)| DailyRevenue {
      date: last.date + Duration::days(i as i64 + 1),
      total,
    })
    .collect();

  Ok(Forecast { points, flat_fallback: false })
}

fn difference(values: &[f64]) -> Vec<f64> {
  values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Undo each differencing stage by cumulative summation from that stage's
/// last observed value.
fn integrate(mut values: Vec<f64>, stage_tails: &[f64]) -> Vec<f64> {
  for tail in stage_tails.iter().rev() {
    let mut acc = *tail;
    for v in values.iter_mut() {
      acc += *v;
      *v = acc;
    }
  }
  values
}

/// Fit the lagged regression with intercept.
///
/// `None` means the series is not finite or no finite coefficient vector
/// exists; the caller falls back to a flat forecast.
fn fit_ar(diffs: &[f64], order: usize) -> Option<DVector<f64>> {
  if diffs.iter().any(|v| !v.is_finite()) {
    return None;
  }

  let rows = diffs.len() - order;
  let mut x = DMatrix::<f64>::zeros(rows, order + 1);
  let mut y = DVector::<f64>::zeros(rows);
  for (r, i) in (order..diffs.len()).enumerate() {
    x[(r, 0)] = 1.0;
    for lag in 0..order {
      x[(r, lag + 1)] = diffs[i - 1 - lag];
    }
    y[r] = diffs[i];
  }

  solve_least_squares(&x, &y)
}

/// Solve a least-squares problem by SVD, trying progressively looser
/// singular-value tolerances. Lag columns of a slow-moving series are
/// nearly collinear, and the strict tolerance alone rejects too much.
fn solve_least_squares(
  x: &DMatrix<f64>,
  y: &DVector<f64>,
) -> Option<DVector<f64>> {
  let svd = x.clone().svd(true, true);
  for &tol in &[1e-10, 1e-8, 1e-6] {
    if let Ok(beta) = svd.solve(y, tol) {
      if beta.iter().all(|v| v.is_finite()) {
        return Some(beta);
      }
    }
  }
  None
}

fn flat_forecast(last: &DailyRevenue, horizon: usize) -> Forecast {
  let points = (1..=horizon as i64)
    .map(|offset| DailyRevenue {
      date:  last.date + Duration::days(offset),
      total: last.total,
    })
    .collect();
  Forecast { points, flat_fallback: true }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn day(s: &str) -> NaiveDate { s.parse().unwrap() }

  fn series(start: &str, totals: &[f64]) -> Vec<DailyRevenue> {
    let start = day(start);
    totals
      .iter()
      .enumerate()
      .map(|(i, &total)| DailyRevenue {
        date: start + Duration::days(i as i64),
        total,
      })
      .collect()
  }

  #[test]
  fn linear_trend_continues() {
    let history = series(
      "2024-01-01",
      &[
        100.0, 110.0, 120.0, 130.0, 140.0, 150.0, 160.0, 170.0, 180.0, 190.0,
      ],
    );
    let forecast =
      forecast_daily_revenue(&history, &ForecastOptions::default()).unwrap();

    assert!(!forecast.flat_fallback);
    assert_eq!(forecast.points.len(), 7);
    assert_eq!(forecast.points[0].date, day("2024-01-11"));
    assert_eq!(forecast.points[6].date, day("2024-01-17"));
    for (i, point) in forecast.points.iter().enumerate() {
      let expected = 200.0 + 10.0 * i as f64;
      assert!(
        (point.total - expected).abs() < 1e-6,
        "day {i}: expected {expected}, got {}",
        point.total
      );
    }
  }

  #[test]
  fn constant_series_forecasts_flat_without_fallback() {
    let history = series("2024-03-01", &[500.0; 8]);
    let opts = ForecastOptions { horizon: 3, ..Default::default() };
    let forecast = forecast_daily_revenue(&history, &opts).unwrap();

    assert!(!forecast.flat_fallback);
    assert_eq!(forecast.points.len(), 3);
    for point in &forecast.points {
      assert!((point.total - 500.0).abs() < 1e-6);
    }
  }

  #[test]
  fn quadratic_growth_survives_double_differencing() {
    let totals: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
    let history = series("2024-01-01", &totals);
    let opts =
      ForecastOptions { difference: 2, horizon: 3, ..Default::default() };
    let forecast = forecast_daily_revenue(&history, &opts).unwrap();

    assert!(!forecast.flat_fallback);
    let expected = [100.0, 121.0, 144.0];
    for (point, want) in forecast.points.iter().zip(expected) {
      assert!(
        (point.total - want).abs() < 1e-6,
        "expected {want}, got {}",
        point.total
      );
    }
  }

  #[test]
  fn short_history_is_rejected_with_requirements() {
    let history = series("2024-01-01", &[10.0, 20.0, 30.0]);
    let err = forecast_daily_revenue(&history, &ForecastOptions::default())
      .unwrap_err();
    assert_eq!(err, Error::InsufficientData { needed: 7, got: 3 });
  }

  #[test]
  fn non_finite_history_falls_back_flat() {
    let mut history = series(
      "2024-01-01",
      &[100.0, 110.0, 120.0, 130.0, 140.0, 150.0, 160.0, 170.0],
    );
    history[2].total = f64::NAN;

    let forecast =
      forecast_daily_revenue(&history, &ForecastOptions::default()).unwrap();
    assert!(forecast.flat_fallback);
    assert_eq!(forecast.points.len(), 7);
    assert_eq!(forecast.points[0].date, day("2024-01-09"));
    for point in &forecast.points {
      assert!((point.total - 170.0).abs() < 1e-9);
    }
  }

  #[test]
  fn zero_horizon_yields_no_points() {
    let history = series("2024-01-01", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    let opts = ForecastOptions { horizon: 0, ..Default::default() };
    let forecast = forecast_daily_revenue(&history, &opts).unwrap();
    assert!(forecast.points.is_empty());
  }
}
