//! Imported records — the three row types fed from upstream.
//!
//! Records carry the natural identifiers assigned by the source feed; the
//! store never invents keys for them. Once imported, a record is never
//! updated or deleted, so every field here is the final word for that id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A catalogue entry from the products feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id:       i64,
  pub name:     String,
  pub price:    f64,
  pub category: String,
}

/// A sales outlet from the stores feed. `region` is the grouping key for
/// the regional revenue breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
  pub id:      i64,
  pub city:    String,
  pub region:  String,
  pub address: String,
}

/// One line of sale from the sales feed.
///
/// `product_id` and `store_id` reference [`Product`] and [`Store`] rows;
/// the references are declarative only — an orphan sale is accepted and
/// simply falls out of the joined breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
  pub id:         i64,
  pub product_id: i64,
  pub store_id:   i64,
  /// Normalised calendar date of the sale; feeds may carry datetimes or
  /// alternative date spellings, the codec reduces them all to this.
  pub sale_date:  NaiveDate,
  pub quantity:   i64,
  pub amount:     f64,
}
