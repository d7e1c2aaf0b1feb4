//! JSON feed decoding.
//!
//! A JSON feed is a top-level array of flat objects whose keys match the
//! CSV column names. Unknown keys are ignored, wrong types are fatal.

use serde::Deserialize;
use till_core::record::{Product, Sale, Store};

use crate::{date::normalize_date, error::Result};

pub(crate) fn products(input: &str) -> Result<Vec<Product>> {
  Ok(serde_json::from_str(input)?)
}

pub(crate) fn stores(input: &str) -> Result<Vec<Store>> {
  Ok(serde_json::from_str(input)?)
}

/// Sales take a detour through this row type because `sale_date` arrives
/// as a string in any of the accepted spellings, not a ready-made date.
#[derive(Debug, Deserialize)]
struct SaleRow {
  id:         i64,
  product_id: i64,
  store_id:   i64,
  sale_date:  String,
  quantity:   i64,
  amount:     f64,
}

pub(crate) fn sales(input: &str) -> Result<Vec<Sale>> {
  let rows: Vec<SaleRow> = serde_json::from_str(input)?;
  rows
    .into_iter()
    .map(|r| {
      Ok(Sale {
        id:         r.id,
        product_id: r.product_id,
        store_id:   r.store_id,
        sale_date:  normalize_date(&r.sale_date)?,
        quantity:   r.quantity,
        amount:     r.amount,
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use crate::error::Error;

  use super::*;

  #[test]
  fn product_array_decodes() {
    let input = r#"[
      {"id": 1, "name": "Laptop", "price": 999.90, "category": "Computers"},
      {"id": 2, "name": "Mouse", "price": 19.90, "category": "Accessories"}
    ]"#;
    let rows = products(input).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].name, "Mouse");
  }

  #[test]
  fn unknown_keys_ignored() {
    let input =
      r#"[{"id": 1, "name": "Laptop", "price": 999.90, "category": "Computers", "ean": "4006381"}]"#;
    assert_eq!(products(input).unwrap().len(), 1);
  }

  #[test]
  fn integer_price_widens_to_float() {
    let input =
      r#"[{"id": 1, "name": "Laptop", "price": 999, "category": "Computers"}]"#;
    assert_eq!(products(input).unwrap()[0].price, 999.0);
  }

  #[test]
  fn missing_key_is_fatal() {
    let input = r#"[{"id": 1, "name": "Laptop", "price": 999.90}]"#;
    assert!(matches!(products(input), Err(Error::Json(_))));
  }

  #[test]
  fn sale_dates_normalized() {
    let input = r#"[
      {"id": 1, "product_id": 1, "store_id": 1,
       "sale_date": "2024-01-05T12:30:00", "quantity": 2, "amount": 199.80},
      {"id": 2, "product_id": 1, "store_id": 1,
       "sale_date": "2024/01/06", "quantity": 1, "amount": 99.90}
    ]"#;
    let rows = sales(input).unwrap();
    assert_eq!(rows[0].sale_date.to_string(), "2024-01-05");
    assert_eq!(rows[1].sale_date.to_string(), "2024-01-06");
  }

  #[test]
  fn bad_sale_date_is_fatal() {
    let input = r#"[{"id": 1, "product_id": 1, "store_id": 1,
      "sale_date": "someday", "quantity": 2, "amount": 199.80}]"#;
    assert!(matches!(sales(input), Err(Error::InvalidDate { .. })));
  }

  #[test]
  fn truncated_payload_is_fatal() {
    let input = r#"[{"id": 1, "name": "Lap"#;
    assert!(matches!(products(input), Err(Error::Json(_))));
  }
}
