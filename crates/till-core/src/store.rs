//! The `SalesStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `till-store-sqlite`).
//! Higher layers (`till-api`, `till-cli`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  analysis::{AnalysisResult, NewAnalysis},
  record::{Product, Sale, Store},
  revenue::{DailyRevenue, GroupTotal, ImportOutcome, StoreCounts},
};

/// Abstraction over a sales data mart backend.
///
/// Writes are append-only with identifier-based deduplication: a record
/// whose id is already present is skipped, never updated or reconciled,
/// so upstream corrections to an existing id are silently ignored. The
/// analysis log is strictly additive.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SalesStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Imports — dedup append ────────────────────────────────────────────

  /// Append products not yet present by id. First occurrence wins within
  /// the batch; everything dropped by the filter counts as skipped.
  fn add_products(
    &self,
    rows: Vec<Product>,
  ) -> impl Future<Output = Result<ImportOutcome, Self::Error>> + Send + '_;

  /// Append stores not yet present by id.
  fn add_stores(
    &self,
    rows: Vec<Store>,
  ) -> impl Future<Output = Result<ImportOutcome, Self::Error>> + Send + '_;

  /// Append sales not yet present by id.
  fn add_sales(
    &self,
    rows: Vec<Sale>,
  ) -> impl Future<Output = Result<ImportOutcome, Self::Error>> + Send + '_;

  // ── Aggregations ──────────────────────────────────────────────────────

  /// The sum of every sale amount. An empty sales table yields 0.0.
  fn total_revenue(
    &self,
  ) -> impl Future<Output = Result<f64, Self::Error>> + Send + '_;

  /// Summed amount per product name, descending by total.
  fn revenue_by_product(
    &self,
  ) -> impl Future<Output = Result<Vec<GroupTotal>, Self::Error>> + Send + '_;

  /// Summed amount per store region, descending by total.
  fn revenue_by_region(
    &self,
  ) -> impl Future<Output = Result<Vec<GroupTotal>, Self::Error>> + Send + '_;

  /// Summed amount per sale date, ascending by date. This is the forecast
  /// input series; dates without sales are absent, not zero.
  fn daily_revenue(
    &self,
  ) -> impl Future<Output = Result<Vec<DailyRevenue>, Self::Error>> + Send + '_;

  // ── Analysis log ──────────────────────────────────────────────────────

  /// Append a computed summary to the analysis log and return the row as
  /// persisted. The id and `created_at` timestamp are set by the store.
  fn record_analysis(
    &self,
    input: NewAnalysis,
  ) -> impl Future<Output = Result<AnalysisResult, Self::Error>> + Send + '_;

  /// The newest `limit` analysis log rows, newest first.
  fn recent_analyses(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<AnalysisResult>, Self::Error>> + Send + '_;

  // ── Bookkeeping ───────────────────────────────────────────────────────

  /// Row counts for all four tables.
  fn counts(
    &self,
  ) -> impl Future<Output = Result<StoreCounts, Self::Error>> + Send + '_;
}
