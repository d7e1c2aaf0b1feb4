//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Sale dates are stored as `YYYY-MM-DD` strings so the daily grouping key
//! sorts lexicographically in date order. Timestamps are RFC 3339 strings.

use chrono::{DateTime, NaiveDate, Utc};
use till_core::analysis::{AnalysisKind, AnalysisResult};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `analysis_results` row.
pub struct RawAnalysis {
  pub id:             i64,
  pub analysis_type:  String,
  pub result_value:   f64,
  pub result_details: String,
  pub created_at:     String,
}

impl RawAnalysis {
  pub fn into_result(self) -> Result<AnalysisResult> {
    Ok(AnalysisResult {
      id:         self.id,
      kind:       AnalysisKind::from_label(&self.analysis_type)?,
      value:      self.result_value,
      detail:     self.result_details,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
