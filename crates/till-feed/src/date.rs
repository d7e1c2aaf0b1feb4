//! Sale-date normalization.
//!
//! Upstream feeds are loose about dates: some carry full datetimes, some
//! plain dates in a handful of spellings. Everything is reduced to a
//! calendar date so the daily grouping key is uniform across feeds.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// Plain-date spellings accepted after the datetime forms are ruled out.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Normalise a feed date value to a [`NaiveDate`].
///
/// Accepted inputs, tried in order: RFC 3339 datetimes (offset kept, date
/// part taken as-is), `T`- or space-separated naive datetimes, then the
/// plain-date spellings in [`DATE_FORMATS`].
pub(crate) fn normalize_date(value: &str) -> Result<NaiveDate> {
  let v = value.trim();

  if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
    return Ok(dt.date_naive());
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M:%S") {
    return Ok(dt.date());
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(v, "%Y-%m-%d %H:%M:%S") {
    return Ok(dt.date());
  }
  for fmt in DATE_FORMATS {
    if let Ok(d) = NaiveDate::parse_from_str(v, fmt) {
      return Ok(d);
    }
  }

  Err(Error::InvalidDate { value: value.to_string() })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ok(value: &str) -> String { normalize_date(value).unwrap().to_string() }

  #[test]
  fn plain_iso_date() {
    assert_eq!(ok("2024-01-05"), "2024-01-05");
  }

  #[test]
  fn slashed_dates() {
    assert_eq!(ok("2024/01/05"), "2024-01-05");
    assert_eq!(ok("01/05/2024"), "2024-01-05");
  }

  #[test]
  fn datetime_forms_reduce_to_date() {
    assert_eq!(ok("2024-01-05T12:30:00"), "2024-01-05");
    assert_eq!(ok("2024-01-05 12:30:00"), "2024-01-05");
    assert_eq!(ok("2024-01-05T12:30:00+02:00"), "2024-01-05");
  }

  #[test]
  fn surrounding_whitespace_tolerated() {
    assert_eq!(ok("  2024-01-05 "), "2024-01-05");
  }

  #[test]
  fn garbage_is_rejected() {
    assert!(matches!(
      normalize_date("fifth of january"),
      Err(Error::InvalidDate { .. })
    ));
    assert!(normalize_date("2024-13-40").is_err());
    assert!(normalize_date("").is_err());
  }
}
