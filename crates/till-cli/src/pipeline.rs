//! The linear import-and-analyse pipeline.
//!
//! Mirrors the run order of the feeds themselves: products and stores
//! land before sales so a sale's references precede it. Any failure
//! (network, parse, database) aborts the run; there are no retries and no
//! partial-failure recovery.

use anyhow::{Context, Result, bail};
use till_core::{
  analysis::{AnalysisResult, run_revenue_analysis},
  revenue::{ImportOutcome, RevenueReport},
  store::SalesStore,
};
use till_store_sqlite::SqliteStore;
use uuid::Uuid;

use crate::{config::FeedSettings, fetch::Fetcher};

// ─── Outcomes ─────────────────────────────────────────────────────────────────

/// Per-feed row counts from one import pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportSummary {
  pub products: ImportOutcome,
  pub stores:   ImportOutcome,
  pub sales:    ImportOutcome,
}

impl ImportSummary {
  /// All three feeds folded together.
  pub fn combined(&self) -> ImportOutcome {
    let mut all = self.products;
    all.merge(self.stores);
    all.merge(self.sales);
    all
  }
}

/// Everything `till run` produces, for the closing summary.
#[derive(Debug, Clone)]
pub struct RunOutcome {
  pub run_id:   Uuid,
  pub imported: ImportSummary,
  pub report:   RevenueReport,
  pub recorded: AnalysisResult,
}

// ─── Steps ────────────────────────────────────────────────────────────────────

/// Fetch and append every configured feed.
///
/// Products and sales URLs are required; a stores URL is optional and its
/// absence only leaves the region breakdown empty.
pub async fn import_feeds(
  store: &SqliteStore,
  fetcher: &Fetcher,
  feeds: &FeedSettings,
) -> Result<ImportSummary> {
  let Some(products_url) = &feeds.products_url else {
    bail!("feeds.products_url is not configured");
  };
  let Some(sales_url) = &feeds.sales_url else {
    bail!("feeds.sales_url is not configured");
  };

  let mut summary = ImportSummary::default();

  let (body, format) = fetcher.fetch(products_url).await?;
  let rows =
    till_feed::parse_products(&body, format).context("parsing products feed")?;
  summary.products = store.add_products(rows).await?;
  tracing::info!(
    inserted = summary.products.inserted,
    skipped = summary.products.skipped,
    "products feed imported"
  );

  match &feeds.stores_url {
    Some(stores_url) => {
      let (body, format) = fetcher.fetch(stores_url).await?;
      let rows =
        till_feed::parse_stores(&body, format).context("parsing stores feed")?;
      summary.stores = store.add_stores(rows).await?;
      tracing::info!(
        inserted = summary.stores.inserted,
        skipped = summary.stores.skipped,
        "stores feed imported"
      );
    }
    None => tracing::info!("no stores feed configured, skipping"),
  }

  let (body, format) = fetcher.fetch(sales_url).await?;
  let rows =
    till_feed::parse_sales(&body, format).context("parsing sales feed")?;
  summary.sales = store.add_sales(rows).await?;
  tracing::info!(
    inserted = summary.sales.inserted,
    skipped = summary.sales.skipped,
    "sales feed imported"
  );

  Ok(summary)
}

/// The full pipeline: import, analyse, report back. One run id tags the
/// whole pass in the logs.
pub async fn run_pipeline(
  store: &SqliteStore,
  fetcher: &Fetcher,
  feeds: &FeedSettings,
) -> Result<RunOutcome> {
  let run_id = Uuid::new_v4();
  tracing::info!(%run_id, "pipeline started");

  let imported = import_feeds(store, fetcher, feeds).await?;
  let (report, recorded) = run_revenue_analysis(store).await?;

  tracing::info!(%run_id, total = report.total, "pipeline finished");
  Ok(RunOutcome { run_id, imported, report, recorded })
}
