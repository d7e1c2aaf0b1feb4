//! CSV / JSON feed codec for till.
//!
//! Converts feed payloads into [`till_core`] record types. Pure
//! synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```
//! use till_feed::{FeedFormat, parse_products};
//!
//! let csv = "id,name,price,category\n1,Laptop,999.90,Computers\n";
//! let products = parse_products(csv, Some(FeedFormat::Csv)).unwrap();
//! assert_eq!(products[0].name, "Laptop");
//! ```

mod csv;
mod date;
pub mod error;
mod json;

pub use error::{Error, Result};
use till_core::record::{Product, Sale, Store};

// ─── Format selection ────────────────────────────────────────────────────────

/// The wire format of a feed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
  Csv,
  Json,
}

/// Guess the payload format from its first non-whitespace byte.
///
/// JSON feeds open with `[` (or `{` for a malformed-but-JSON payload,
/// which then fails with a JSON error rather than a CSV one); everything
/// else is treated as CSV.
pub fn sniff_format(input: &str) -> FeedFormat {
  match input.trim_start().as_bytes().first() {
    Some(b'[') | Some(b'{') => FeedFormat::Json,
    _ => FeedFormat::Csv,
  }
}

fn resolved(input: &str, format: Option<FeedFormat>) -> FeedFormat {
  format.unwrap_or_else(|| sniff_format(input))
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse a products feed. `format` comes from a `Content-Type` hint when
/// the caller has one; `None` sniffs the payload.
pub fn parse_products(
  input: &str,
  format: Option<FeedFormat>,
) -> Result<Vec<Product>> {
  match resolved(input, format) {
    FeedFormat::Csv => csv::products(input),
    FeedFormat::Json => json::products(input),
  }
}

/// Parse a stores feed.
pub fn parse_stores(
  input: &str,
  format: Option<FeedFormat>,
) -> Result<Vec<Store>> {
  match resolved(input, format) {
    FeedFormat::Csv => csv::stores(input),
    FeedFormat::Json => json::stores(input),
  }
}

/// Parse a sales feed. Sale dates are normalised to calendar dates
/// regardless of format.
pub fn parse_sales(
  input: &str,
  format: Option<FeedFormat>,
) -> Result<Vec<Sale>> {
  match resolved(input, format) {
    FeedFormat::Csv => csv::sales(input),
    FeedFormat::Json => json::sales(input),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
