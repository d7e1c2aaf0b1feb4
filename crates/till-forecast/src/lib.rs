//! Daily revenue forecasting for the till data mart.
//!
//! A deliberately small model family: the [`forecast_daily_revenue`]
//! entry point fits an autoregression on the differenced daily totals and
//! extends the series a configurable number of days. See [`ar`] for the
//! numerics.

pub mod ar;
mod error;

pub use ar::{Forecast, ForecastOptions, forecast_daily_revenue};
pub use error::{Error, Result};
