//! `till` — command-line front end for the sales data mart.
//!
//! # Usage
//!
//! ```
//! till run                          # import all feeds, analyse, report
//! till --config /etc/till.toml import
//! till forecast --horizon 14
//! till serve --port 8501
//! ```
//!
//! Configuration comes from `till.toml` (or `--config`), overridable with
//! `TILL__*` environment variables and the flags below.

mod chart;
mod config;
mod fetch;
mod pipeline;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use clap::{Parser, Subcommand};
use till_core::{
  analysis::run_revenue_analysis,
  revenue::RevenueReport,
  store::SalesStore,
};
use till_forecast::forecast_daily_revenue;
use till_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{
  config::Settings,
  fetch::Fetcher,
  pipeline::{import_feeds, run_pipeline},
};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "till", version, about = "Sales data mart pipeline")]
struct Args {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "till.toml")]
  config: PathBuf,

  /// SQLite database path (overrides the config file).
  #[arg(long, value_name = "FILE")]
  db: Option<PathBuf>,

  /// Products feed URL (overrides the config file).
  #[arg(long, value_name = "URL")]
  products_url: Option<String>,

  /// Sales feed URL (overrides the config file).
  #[arg(long, value_name = "URL")]
  sales_url: Option<String>,

  /// Stores feed URL (overrides the config file).
  #[arg(long, value_name = "URL")]
  stores_url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create the database file and its schema, then exit.
  Init,
  /// Fetch the configured feeds and append their rows.
  Import,
  /// Run the revenue aggregations and record the total in the log.
  Analyze,
  /// Import, analyse and print the closing summary in one pass.
  Run,
  /// Print the revenue report without recording anything.
  Report,
  /// Print headline figures and revenue charts.
  Dashboard {
    /// How many products to chart.
    #[arg(long)]
    top: Option<usize>,
  },
  /// Predict the next days of revenue from the daily series.
  Forecast {
    /// How many days ahead to predict.
    #[arg(long)]
    horizon: Option<usize>,
  },
  /// Serve the JSON API over HTTP.
  Serve {
    /// Interface to bind (overrides the config file).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides the config file).
    #[arg(long)]
    port: Option<u16>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let mut settings = config::load(&args.config)?;
  if let Some(db) = args.db {
    settings.db_path = db;
  }
  if let Some(url) = args.products_url {
    settings.feeds.products_url = Some(url);
  }
  if let Some(url) = args.sales_url {
    settings.feeds.sales_url = Some(url);
  }
  if let Some(url) = args.stores_url {
    settings.feeds.stores_url = Some(url);
  }

  match args.command {
    Command::Init => cmd_init(&settings).await,
    Command::Import => cmd_import(&settings).await,
    Command::Analyze => cmd_analyze(&settings).await,
    Command::Run => cmd_run(&settings).await,
    Command::Report => cmd_report(&settings).await,
    Command::Dashboard { top } => cmd_dashboard(&settings, top).await,
    Command::Forecast { horizon } => cmd_forecast(&settings, horizon).await,
    Command::Serve { host, port } => cmd_serve(&settings, host, port).await,
  }
}

async fn open_store(settings: &Settings) -> Result<SqliteStore> {
  SqliteStore::open(&settings.db_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.db_path))
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn cmd_init(settings: &Settings) -> Result<()> {
  open_store(settings).await?;
  println!("database ready at {}", settings.db_path.display());
  Ok(())
}

async fn cmd_import(settings: &Settings) -> Result<()> {
  let store = open_store(settings).await?;
  let fetcher = Fetcher::new(settings.http.timeout_secs)?;

  let summary = import_feeds(&store, &fetcher, &settings.feeds).await?;
  print!("{}", render::import_summary(&summary));
  Ok(())
}

async fn cmd_analyze(settings: &Settings) -> Result<()> {
  let store = open_store(settings).await?;

  let (report, recorded) = run_revenue_analysis(&store).await?;
  tracing::info!(id = recorded.id, "analysis recorded");
  print!("{}", render::revenue_report(&report));
  Ok(())
}

async fn cmd_run(settings: &Settings) -> Result<()> {
  let store = open_store(settings).await?;
  let fetcher = Fetcher::new(settings.http.timeout_secs)?;

  let outcome = run_pipeline(&store, &fetcher, &settings.feeds).await?;
  print!("{}", render::run_summary(&outcome));
  Ok(())
}

async fn cmd_report(settings: &Settings) -> Result<()> {
  let store = open_store(settings).await?;

  let report = RevenueReport {
    total:      store.total_revenue().await?,
    by_product: store.revenue_by_product().await?,
    by_region:  store.revenue_by_region().await?,
  };
  print!("{}", render::revenue_report(&report));
  Ok(())
}

async fn cmd_dashboard(settings: &Settings, top: Option<usize>) -> Result<()> {
  let store = open_store(settings).await?;

  let report = RevenueReport {
    total:      store.total_revenue().await?,
    by_product: store.revenue_by_product().await?,
    by_region:  store.revenue_by_region().await?,
  };
  let counts = store.counts().await?;
  let top = top.unwrap_or(settings.report.top_products);

  print!("{}", render::dashboard(&report, &counts, top));
  Ok(())
}

async fn cmd_forecast(
  settings: &Settings,
  horizon: Option<usize>,
) -> Result<()> {
  let store = open_store(settings).await?;

  let series = store.daily_revenue().await?;
  let mut opts = settings.forecast.options();
  if let Some(horizon) = horizon {
    opts.horizon = horizon;
  }

  let fit = forecast_daily_revenue(&series, &opts)?;
  if fit.flat_fallback {
    tracing::warn!("degenerate fit, holding the last observed level");
  }
  print!("{}", render::forecast(&series, &fit));
  Ok(())
}

async fn cmd_serve(
  settings: &Settings,
  host: Option<String>,
  port: Option<u16>,
) -> Result<()> {
  let store = open_store(settings).await?;

  let app = Router::new()
    .nest("/api", till_api::api_router(Arc::new(store)))
    .layer(TraceLayer::new_for_http());

  let host = host.unwrap_or_else(|| settings.server.host.clone());
  let port = port.unwrap_or(settings.server.port);
  let address = format!("{host}:{port}");

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
