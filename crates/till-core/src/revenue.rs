//! Revenue aggregation outputs and import bookkeeping.
//!
//! These are the shapes the store's read side produces. Grouped results
//! arrive ordered descending by total; ties between equal totals carry no
//! guaranteed mutual order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One bucket of a grouped revenue query — a product name or a region,
/// with the summed sale amount for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
  pub label: String,
  pub total: f64,
}

/// Summed sale amount for one calendar date. The daily series is the
/// forecast input; dates with no sales simply have no entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
  pub date:  NaiveDate,
  pub total: f64,
}

/// The full output of one analysis pass: the overall total plus both
/// grouped breakdowns. Each breakdown partitions `total` exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueReport {
  pub total:      f64,
  pub by_product: Vec<GroupTotal>,
  pub by_region:  Vec<GroupTotal>,
}

// ─── Import bookkeeping ──────────────────────────────────────────────────────

/// Outcome of appending one batch of records.
///
/// `skipped` counts rows dropped by the deduplication filter, whether the
/// id was already in the database or repeated within the batch itself.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct ImportOutcome {
  pub inserted: usize,
  pub skipped:  usize,
}

impl ImportOutcome {
  /// Fold another batch's outcome into a running total for the whole run.
  pub fn merge(&mut self, other: ImportOutcome) {
    self.inserted += other.inserted;
    self.skipped += other.skipped;
  }
}

/// Row counts across all four tables, for summaries and idempotence checks.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct StoreCounts {
  pub products: usize,
  pub stores:   usize,
  pub sales:    usize,
  pub analyses: usize,
}
