//! Runtime configuration.
//!
//! Layered lowest-to-highest: built-in defaults, the TOML file
//! (`till.toml` unless `--config` points elsewhere), then `TILL__*`
//! environment variables with `__` separating nested keys
//! (`TILL__FEEDS__PRODUCTS_URL`). Command-line flags are applied on top
//! by `main`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use till_forecast::ForecastOptions;

/// Full runtime configuration, deserialised from `till.toml` and the
/// environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database path.
  #[serde(default = "default_db_path")]
  pub db_path:  PathBuf,
  #[serde(default)]
  pub feeds:    FeedSettings,
  #[serde(default)]
  pub http:     HttpSettings,
  #[serde(default)]
  pub server:   ServerSettings,
  #[serde(default)]
  pub forecast: ForecastSettings,
  #[serde(default)]
  pub report:   ReportSettings,
}

/// Feed URLs. Products and sales are required to import; a missing
/// stores URL just leaves the stores table unfed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedSettings {
  pub products_url: Option<String>,
  pub sales_url:    Option<String>,
  pub stores_url:   Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
  /// Per-request timeout for feed downloads, in seconds.
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSettings {
  #[serde(default = "default_ar_order")]
  pub ar_order:     usize,
  #[serde(default = "default_difference")]
  pub difference:   usize,
  #[serde(default = "default_horizon_days")]
  pub horizon_days: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
  /// Products shown in the dashboard's top-products chart.
  #[serde(default = "default_top_products")]
  pub top_products: usize,
}

impl ForecastSettings {
  pub fn options(&self) -> ForecastOptions {
    ForecastOptions {
      ar_order:   self.ar_order,
      difference: self.difference,
      horizon:    self.horizon_days,
    }
  }
}

impl Default for HttpSettings {
  fn default() -> Self {
    Self { timeout_secs: default_timeout_secs() }
  }
}

impl Default for ServerSettings {
  fn default() -> Self {
    Self { host: default_host(), port: default_port() }
  }
}

impl Default for ForecastSettings {
  fn default() -> Self {
    Self {
      ar_order:     default_ar_order(),
      difference:   default_difference(),
      horizon_days: default_horizon_days(),
    }
  }
}

impl Default for ReportSettings {
  fn default() -> Self {
    Self { top_products: default_top_products() }
  }
}

fn default_db_path() -> PathBuf { PathBuf::from("till.db") }
fn default_timeout_secs() -> u64 { 30 }
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8501 }
fn default_ar_order() -> usize { 5 }
fn default_difference() -> usize { 1 }
fn default_horizon_days() -> usize { 7 }
fn default_top_products() -> usize { 5 }

/// Load configuration from `path` and the environment.
pub fn load(path: &Path) -> Result<Settings> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(
      config::Environment::with_prefix("TILL")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read configuration")?;

  settings
    .try_deserialize()
    .context("failed to deserialise configuration")
}
