//! The analysis log and the revenue analysis pass itself.
//!
//! Computed summaries land in an append-only log: rows are only ever
//! added, never revised, so the log doubles as a history of every analysis
//! run against the database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  error::Error,
  revenue::RevenueReport,
  store::SalesStore,
};

/// Detail text recorded alongside the persisted total-revenue figure.
pub const OVERALL_REVENUE_DETAIL: &str = "Overall revenue";

// ─── AnalysisKind ────────────────────────────────────────────────────────────

/// The kind of computed summary a log row holds. The label doubles as the
/// `analysis_type` column value and must stay stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
  TotalRevenue,
  RevenueByProduct,
  RevenueByRegion,
}

impl AnalysisKind {
  /// The stable string stored in the `analysis_type` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn label(&self) -> &'static str {
    match self {
      Self::TotalRevenue => "total_revenue",
      Self::RevenueByProduct => "revenue_by_product",
      Self::RevenueByRegion => "revenue_by_region",
    }
  }

  pub fn from_label(label: &str) -> Result<Self> {
    match label {
      "total_revenue" => Ok(Self::TotalRevenue),
      "revenue_by_product" => Ok(Self::RevenueByProduct),
      "revenue_by_region" => Ok(Self::RevenueByRegion),
      other => Err(Error::UnknownAnalysisKind(other.to_string())),
    }
  }
}

// ─── Log rows ────────────────────────────────────────────────────────────────

/// Input to [`SalesStore::record_analysis`]. The row id and `created_at`
/// are always assigned by the store; they are not accepted from callers.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalysis {
  pub kind:   AnalysisKind,
  pub value:  f64,
  pub detail: String,
}

/// A persisted analysis log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
  pub id:         i64,
  pub kind:       AnalysisKind,
  pub value:      f64,
  pub detail:     String,
  pub created_at: DateTime<Utc>,
}

// ─── The analysis pass ───────────────────────────────────────────────────────

/// Run the three fixed revenue aggregations and persist the overall total
/// to the analysis log.
///
/// The grouped breakdowns are returned in-memory only; the single log row
/// written per pass is the total-revenue figure. Returns the full report
/// together with the row as persisted (id and timestamp filled in).
pub async fn run_revenue_analysis<S: SalesStore>(
  store: &S,
) -> Result<(RevenueReport, AnalysisResult), S::Error> {
  let total = store.total_revenue().await?;
  let by_product = store.revenue_by_product().await?;
  let by_region = store.revenue_by_region().await?;

  let recorded = store
    .record_analysis(NewAnalysis {
      kind:   AnalysisKind::TotalRevenue,
      value:  total,
      detail: OVERALL_REVENUE_DETAIL.to_string(),
    })
    .await?;

  let report = RevenueReport { total, by_product, by_region };
  Ok((report, recorded))
}
