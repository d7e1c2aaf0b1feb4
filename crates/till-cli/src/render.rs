//! Plain-text rendering for every command's output.
//!
//! All user-facing text is assembled here so the command handlers stay
//! thin and the exact shape can be pinned by tests. Everything is
//! deterministic for a given input.

use till_core::revenue::{DailyRevenue, GroupTotal, RevenueReport, StoreCounts};
use till_forecast::Forecast;

use crate::{
  chart::{bar_chart, format_eur},
  pipeline::{ImportSummary, RunOutcome},
};

/// Bar width for the dashboard charts.
const CHART_WIDTH: usize = 40;

/// How many trailing history days the forecast view shows.
const FORECAST_TAIL: usize = 10;

/// The `report` and `analyze` view: overall total plus both breakdowns.
pub fn revenue_report(report: &RevenueReport) -> String {
  let mut out = String::new();
  out.push_str("=== Revenue report ===\n");
  out.push_str(&format!("Total revenue: {}\n", format_eur(report.total)));
  out.push('\n');
  out.push_str("=== By product ===\n");
  out.push_str(&totals_table(&report.by_product));
  out.push('\n');
  out.push_str("=== By region ===\n");
  out.push_str(&totals_table(&report.by_region));
  out
}

/// The `dashboard` view: headline figures, then charts. Only the top
/// `top` products are drawn; regions are few enough to show whole.
pub fn dashboard(
  report: &RevenueReport,
  counts: &StoreCounts,
  top: usize,
) -> String {
  let shown = top.min(report.by_product.len());

  let mut out = String::new();
  out.push_str("=== till dashboard ===\n");
  out.push_str(&format!("Total revenue: {}\n", format_eur(report.total)));
  out.push_str(&format!(
    "Rows: {} products | {} stores | {} sales | {} analyses\n",
    counts.products, counts.stores, counts.sales, counts.analyses,
  ));
  out.push('\n');
  out.push_str("=== Top products ===\n");
  out.push_str(&bar_chart(&report.by_product[..shown], CHART_WIDTH));
  out.push('\n');
  out.push_str("=== Revenue by region ===\n");
  out.push_str(&bar_chart(&report.by_region, CHART_WIDTH));
  out
}

/// The `forecast` view: recent observed days, then the predicted ones.
pub fn forecast(history: &[DailyRevenue], fit: &Forecast) -> String {
  let start = history.len().saturating_sub(FORECAST_TAIL);
  let tail = &history[start..];

  let mut out = String::new();
  out.push_str(&format!("=== Daily revenue (last {} days) ===\n", tail.len()));
  out.push_str(&daily_table(tail));
  out.push('\n');
  out.push_str(&format!("=== Forecast (next {} days) ===\n", fit.points.len()));
  out.push_str(&daily_table(&fit.points));
  if fit.flat_fallback {
    out.push_str("  (degenerate fit; holding the last observed level)\n");
  }
  out
}

/// Per-feed insert/skip counts, closed by the folded total.
pub fn import_summary(summary: &ImportSummary) -> String {
  let rows = [
    ("products", summary.products),
    ("stores", summary.stores),
    ("sales", summary.sales),
    ("total", summary.combined()),
  ];
  let count_width = rows
    .iter()
    .map(|(_, outcome)| outcome.inserted.to_string().chars().count())
    .max()
    .unwrap_or(1);

  let mut out = String::new();
  out.push_str("=== Import summary ===\n");
  for (label, outcome) in rows {
    out.push_str(&format!(
      "  {:<8}  {:>count_width$} inserted, {} skipped\n",
      label, outcome.inserted, outcome.skipped,
    ));
  }
  out
}

/// The `run` view: the import counts, the fresh report, and where the
/// pass landed in the analysis log.
pub fn run_summary(outcome: &RunOutcome) -> String {
  let mut out = String::new();
  out.push_str(&import_summary(&outcome.imported));
  out.push('\n');
  out.push_str(&revenue_report(&outcome.report));
  out.push('\n');
  out.push_str(&format!(
    "Run {} recorded analysis #{} at {}\n",
    outcome.run_id,
    outcome.recorded.id,
    outcome.recorded.created_at.to_rfc3339(),
  ));
  out
}

// ─── Tables ───────────────────────────────────────────────────────────────────

fn totals_table(groups: &[GroupTotal]) -> String {
  if groups.is_empty() {
    return "  (no data)\n".to_string();
  }
  let label_width = groups
    .iter()
    .map(|g| g.label.chars().count())
    .max()
    .unwrap_or(0);
  let amounts: Vec<String> =
    groups.iter().map(|g| format_eur(g.total)).collect();
  let amount_width =
    amounts.iter().map(|a| a.chars().count()).max().unwrap_or(0);

  let mut out = String::new();
  for (group, amount) in groups.iter().zip(&amounts) {
    out.push_str(&format!(
      "  {:<label_width$}  {:>amount_width$}\n",
      group.label, amount,
    ));
  }
  out
}

fn daily_table(rows: &[DailyRevenue]) -> String {
  if rows.is_empty() {
    return "  (no data)\n".to_string();
  }
  let amounts: Vec<String> =
    rows.iter().map(|r| format_eur(r.total)).collect();
  let amount_width =
    amounts.iter().map(|a| a.chars().count()).max().unwrap_or(0);

  let mut out = String::new();
  for (row, amount) in rows.iter().zip(&amounts) {
    out.push_str(&format!("  {}  {:>amount_width$}\n", row.date, amount));
  }
  out
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, TimeZone, Utc};
  use till_core::{
    analysis::{AnalysisKind, AnalysisResult},
    revenue::ImportOutcome,
  };
  use uuid::Uuid;

  use super::*;

  fn group(label: &str, total: f64) -> GroupTotal {
    GroupTotal { label: label.to_string(), total }
  }

  fn day(date: &str, total: f64) -> DailyRevenue {
    DailyRevenue { date: date.parse::<NaiveDate>().unwrap(), total }
  }

  #[test]
  fn revenue_report_lists_breakdowns() {
    let report = RevenueReport {
      total:      600.0,
      by_product: vec![group("Laptop", 500.0), group("Mouse", 100.0)],
      by_region:  vec![group("Île-de-France", 600.0)],
    };
    let expected = concat!(
      "=== Revenue report ===\n",
      "Total revenue: 600.00 EUR\n",
      "\n",
      "=== By product ===\n",
      "  Laptop  500.00 EUR\n",
      "  Mouse   100.00 EUR\n",
      "\n",
      "=== By region ===\n",
      "  Île-de-France  600.00 EUR\n",
    );
    assert_eq!(revenue_report(&report), expected);
  }

  #[test]
  fn empty_breakdowns_print_placeholders() {
    let report =
      RevenueReport { total: 0.0, by_product: vec![], by_region: vec![] };
    let expected = concat!(
      "=== Revenue report ===\n",
      "Total revenue: 0.00 EUR\n",
      "\n",
      "=== By product ===\n",
      "  (no data)\n",
      "\n",
      "=== By region ===\n",
      "  (no data)\n",
    );
    assert_eq!(revenue_report(&report), expected);
  }

  #[test]
  fn forecast_shows_recent_history_then_predictions() {
    let history = vec![day("2024-01-01", 100.0), day("2024-01-02", 110.0)];
    let fit = Forecast {
      points:        vec![day("2024-01-03", 120.0)],
      flat_fallback: false,
    };
    let expected = concat!(
      "=== Daily revenue (last 2 days) ===\n",
      "  2024-01-01  100.00 EUR\n",
      "  2024-01-02  110.00 EUR\n",
      "\n",
      "=== Forecast (next 1 days) ===\n",
      "  2024-01-03  120.00 EUR\n",
    );
    assert_eq!(forecast(&history, &fit), expected);
  }

  #[test]
  fn history_is_trimmed_to_the_tail() {
    let history: Vec<DailyRevenue> = (1..=12)
      .map(|i| day(&format!("2024-01-{i:02}"), 100.0))
      .collect();
    let fit = Forecast { points: vec![], flat_fallback: false };

    let text = forecast(&history, &fit);
    assert!(text.starts_with("=== Daily revenue (last 10 days) ===\n"));
    assert!(!text.contains("2024-01-02"));
    assert!(text.contains("2024-01-03"));
  }

  #[test]
  fn degenerate_fit_is_called_out() {
    let fit = Forecast {
      points:        vec![day("2024-01-03", 120.0)],
      flat_fallback: true,
    };
    let text = forecast(&[], &fit);
    assert!(text.contains("holding the last observed level"));
    assert!(text.contains("(no data)"));
  }

  #[test]
  fn import_summary_totals_the_feeds() {
    let summary = ImportSummary {
      products: ImportOutcome { inserted: 12, skipped: 0 },
      stores:   ImportOutcome { inserted: 3, skipped: 0 },
      sales:    ImportOutcome { inserted: 40, skipped: 2 },
    };
    let expected = concat!(
      "=== Import summary ===\n",
      "  products  12 inserted, 0 skipped\n",
      "  stores     3 inserted, 0 skipped\n",
      "  sales     40 inserted, 2 skipped\n",
      "  total     55 inserted, 2 skipped\n",
    );
    assert_eq!(import_summary(&summary), expected);
  }

  #[test]
  fn dashboard_caps_the_product_chart() {
    let report = RevenueReport {
      total:      600.0,
      by_product: vec![group("Laptop", 500.0), group("Mouse", 100.0)],
      by_region:  vec![],
    };
    let counts =
      StoreCounts { products: 2, stores: 1, sales: 3, analyses: 1 };

    let text = dashboard(&report, &counts, 1);
    assert!(text.contains("Rows: 2 products | 1 stores | 3 sales | 1 analyses"));
    assert!(text.contains("Laptop"));
    assert!(!text.contains("Mouse"));
  }

  #[test]
  fn run_summary_closes_with_the_log_row() {
    let outcome = RunOutcome {
      run_id:   Uuid::nil(),
      imported: ImportSummary::default(),
      report:   RevenueReport {
        total:      0.0,
        by_product: vec![],
        by_region:  vec![],
      },
      recorded: AnalysisResult {
        id:         7,
        kind:       AnalysisKind::TotalRevenue,
        value:      0.0,
        detail:     "Overall revenue".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 2, 1, 8, 30, 0).unwrap(),
      },
    };

    let text = run_summary(&outcome);
    assert!(text.contains("=== Import summary ==="));
    assert!(text.contains("=== Revenue report ==="));
    assert!(text.contains(
      "Run 00000000-0000-0000-0000-000000000000 \
       recorded analysis #7 at 2024-02-01T08:30:00+00:00"
    ));
  }
}
