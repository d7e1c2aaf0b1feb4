//! [`SqliteStore`] — the SQLite implementation of [`SalesStore`].

use std::{collections::HashSet, path::Path};

use chrono::Utc;
use till_core::{
  analysis::{AnalysisResult, NewAnalysis},
  record::{Product, Sale, Store},
  revenue::{DailyRevenue, GroupTotal, ImportOutcome, StoreCounts},
  store::SalesStore,
};

use crate::{
  Error, Result,
  encode::{RawAnalysis, decode_date, encode_date, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A till sales data mart backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Low-level helpers ───────────────────────────────────────────────────────

/// The id set already present in `table`; the deduplication filter seed.
fn existing_ids(
  conn: &rusqlite::Connection,
  table: &str,
) -> rusqlite::Result<HashSet<i64>> {
  let mut stmt = conn.prepare(&format!("SELECT id FROM {table}"))?;
  let ids = stmt
    .query_map([], |row| row.get::<_, i64>(0))?
    .collect::<rusqlite::Result<HashSet<i64>>>()?;
  Ok(ids)
}

fn count_rows(
  conn: &rusqlite::Connection,
  table: &str,
) -> rusqlite::Result<usize> {
  conn
    .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
      row.get::<_, i64>(0)
    })
    .map(|n| n as usize)
}

// ─── SalesStore impl ─────────────────────────────────────────────────────────

impl SalesStore for SqliteStore {
  type Error = Error;

  // ── Imports — dedup append ────────────────────────────────────────────────

  async fn add_products(&self, rows: Vec<Product>) -> Result<ImportOutcome> {
    let total = rows.len();
    let outcome = self
      .conn
      .call(move |conn| {
        // Seeding the filter from the table and then inserting into the
        // same set makes "already in the database" and "repeated within
        // the batch" one mechanism: first occurrence wins.
        let mut seen = existing_ids(conn, "products")?;
        let tx = conn.transaction()?;
        let mut inserted = 0usize;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO products (id, name, price, category)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for p in &rows {
            if !seen.insert(p.id) {
              continue;
            }
            stmt.execute(rusqlite::params![p.id, p.name, p.price, p.category])?;
            inserted += 1;
          }
        }
        tx.commit()?;
        Ok(ImportOutcome { inserted, skipped: total - inserted })
      })
      .await?;
    Ok(outcome)
  }

  async fn add_stores(&self, rows: Vec<Store>) -> Result<ImportOutcome> {
    let total = rows.len();
    let outcome = self
      .conn
      .call(move |conn| {
        let mut seen = existing_ids(conn, "stores")?;
        let tx = conn.transaction()?;
        let mut inserted = 0usize;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO stores (id, city, region, address)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for s in &rows {
            if !seen.insert(s.id) {
              continue;
            }
            stmt.execute(rusqlite::params![s.id, s.city, s.region, s.address])?;
            inserted += 1;
          }
        }
        tx.commit()?;
        Ok(ImportOutcome { inserted, skipped: total - inserted })
      })
      .await?;
    Ok(outcome)
  }

  async fn add_sales(&self, rows: Vec<Sale>) -> Result<ImportOutcome> {
    let total = rows.len();
    let outcome = self
      .conn
      .call(move |conn| {
        let mut seen = existing_ids(conn, "sales")?;
        let tx = conn.transaction()?;
        let mut inserted = 0usize;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO sales
               (id, product_id, store_id, sale_date, quantity, amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for s in &rows {
            if !seen.insert(s.id) {
              continue;
            }
            stmt.execute(rusqlite::params![
              s.id,
              s.product_id,
              s.store_id,
              encode_date(s.sale_date),
              s.quantity,
              s.amount,
            ])?;
            inserted += 1;
          }
        }
        tx.commit()?;
        Ok(ImportOutcome { inserted, skipped: total - inserted })
      })
      .await?;
    Ok(outcome)
  }

  // ── Aggregations ──────────────────────────────────────────────────────────

  async fn total_revenue(&self) -> Result<f64> {
    let total = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COALESCE(SUM(amount), 0.0) FROM sales",
          [],
          |row| row.get::<_, f64>(0),
        )?)
      })
      .await?;
    Ok(total)
  }

  async fn revenue_by_product(&self) -> Result<Vec<GroupTotal>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT p.name, SUM(s.amount) AS total
           FROM sales s
           JOIN products p ON s.product_id = p.id
           GROUP BY p.name
           ORDER BY total DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(GroupTotal {
              label: row.get(0)?,
              total: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn revenue_by_region(&self) -> Result<Vec<GroupTotal>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT st.region, SUM(s.amount) AS total
           FROM sales s
           JOIN stores st ON s.store_id = st.id
           GROUP BY st.region
           ORDER BY total DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(GroupTotal {
              label: row.get(0)?,
              total: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn daily_revenue(&self) -> Result<Vec<DailyRevenue>> {
    let raws: Vec<(String, f64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT sale_date, SUM(amount) AS total
           FROM sales
           GROUP BY sale_date
           ORDER BY sale_date",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(date, total)| {
        Ok(DailyRevenue { date: decode_date(&date)?, total })
      })
      .collect()
  }

  // ── Analysis log ──────────────────────────────────────────────────────────

  async fn record_analysis(&self, input: NewAnalysis) -> Result<AnalysisResult> {
    let created_at = Utc::now();

    let kind_label = input.kind.label().to_owned();
    let value = input.value;
    let detail = input.detail.clone();
    let at_str = encode_dt(created_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO analysis_results
             (analysis_type, result_value, result_details, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![kind_label, value, detail, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(AnalysisResult {
      id,
      kind: input.kind,
      value: input.value,
      detail: input.detail,
      created_at,
    })
  }

  async fn recent_analyses(&self, limit: usize) -> Result<Vec<AnalysisResult>> {
    let limit = limit as i64;
    let raws: Vec<RawAnalysis> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, analysis_type, result_value, result_details, created_at
           FROM analysis_results
           ORDER BY id DESC
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit], |row| {
            Ok(RawAnalysis {
              id:             row.get(0)?,
              analysis_type:  row.get(1)?,
              result_value:   row.get(2)?,
              result_details: row.get(3)?,
              created_at:     row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAnalysis::into_result).collect()
  }

  // ── Bookkeeping ───────────────────────────────────────────────────────────

  async fn counts(&self) -> Result<StoreCounts> {
    let counts = self
      .conn
      .call(|conn| {
        Ok(StoreCounts {
          products: count_rows(conn, "products")?,
          stores:   count_rows(conn, "stores")?,
          sales:    count_rows(conn, "sales")?,
          analyses: count_rows(conn, "analysis_results")?,
        })
      })
      .await?;
    Ok(counts)
  }
}
