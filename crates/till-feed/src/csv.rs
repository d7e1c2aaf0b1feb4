//! RFC 4180-subset CSV reader for the three feed shapes.
//!
//! Pipeline:
//!   raw &str
//!     └─ split_records()     → Vec<RawRecord> (quote-aware)
//!          └─ resolve_columns() → header-name → index mapping
//!               └─ typed field extraction → Vec<Product|Store|Sale>
//!
//! Quoting rules: `"` opens a field, `""` escapes a literal quote, and
//! separators, CR, and LF inside quotes are taken verbatim. Records are
//! matched to columns by header name, so column order is free and unknown
//! extra columns are ignored.

use till_core::record::{Product, Sale, Store};

use crate::{
  date::normalize_date,
  error::{Error, Result},
};

// ─── Record splitting ────────────────────────────────────────────────────────

/// One CSV record with the 1-based line number it starts on.
pub(crate) struct RawRecord {
  pub line:   usize,
  pub fields: Vec<String>,
}

/// Split `input` into records, honouring quoting. Blank lines (including
/// the customary trailing one) produce no record.
pub(crate) fn split_records(input: &str) -> Result<Vec<RawRecord>> {
  let mut records: Vec<RawRecord> = Vec::new();
  let mut fields: Vec<String> = Vec::new();
  let mut field = String::new();
  let mut in_quotes = false;
  let mut line = 1usize;
  let mut record_line = 1usize;

  let mut chars = input.chars().peekable();
  while let Some(c) = chars.next() {
    match c {
      '"' if in_quotes => {
        if chars.peek() == Some(&'"') {
          chars.next();
          field.push('"');
        } else {
          in_quotes = false;
        }
      }
      '"' if field.is_empty() => in_quotes = true,
      // A quote after field text is not an opener; keep it literal.
      '"' => field.push('"'),
      ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
      '\r' if !in_quotes => {} // CRLF ends the record at the LF
      '\n' if !in_quotes => {
        line += 1;
        fields.push(std::mem::take(&mut field));
        flush_record(&mut records, &mut fields, record_line);
        record_line = line;
      }
      '\n' => {
        line += 1;
        field.push('\n');
      }
      _ => field.push(c),
    }
  }

  if in_quotes {
    return Err(Error::UnclosedQuote { line: record_line });
  }
  if !field.is_empty() || !fields.is_empty() {
    fields.push(field);
    flush_record(&mut records, &mut fields, record_line);
  }

  Ok(records)
}

fn flush_record(
  records: &mut Vec<RawRecord>,
  fields: &mut Vec<String>,
  line: usize,
) {
  if fields.len() == 1 && fields[0].is_empty() {
    fields.clear(); // blank line
    return;
  }
  records.push(RawRecord {
    line,
    fields: std::mem::take(fields),
  });
}

// ─── Header resolution ───────────────────────────────────────────────────────

/// Column indexes for one feed shape, in the order the caller asked for.
struct Columns {
  indexes: Vec<usize>,
  /// Every data record must carry exactly this many fields.
  width:   usize,
}

impl Columns {
  fn check_width(&self, row: &RawRecord) -> Result<()> {
    if row.fields.len() != self.width {
      return Err(Error::FieldCount {
        line:     row.line,
        expected: self.width,
        got:      row.fields.len(),
      });
    }
    Ok(())
  }
}

fn resolve_columns(
  header: &RawRecord,
  required: &[&str],
  feed: &str,
) -> Result<Columns> {
  let names: Vec<&str> = header
    .fields
    .iter()
    .enumerate()
    .map(|(i, f)| {
      let f = f.trim();
      // Tolerate a UTF-8 BOM glued to the first header cell.
      if i == 0 { f.trim_start_matches('\u{feff}') } else { f }
    })
    .collect();

  let mut indexes = Vec::with_capacity(required.len());
  for column in required {
    let Some(idx) = names.iter().position(|n| n == column) else {
      return Err(Error::MissingColumn {
        feed:   feed.to_string(),
        column: column.to_string(),
      });
    };
    indexes.push(idx);
  }

  Ok(Columns {
    indexes,
    width: header.fields.len(),
  })
}

// ─── Typed field extraction ──────────────────────────────────────────────────

fn int_field(row: &RawRecord, idx: usize, column: &str) -> Result<i64> {
  let raw = row.fields[idx].trim();
  raw.parse().map_err(|_| Error::InvalidField {
    line:   row.line,
    column: column.to_string(),
    value:  raw.to_string(),
  })
}

fn float_field(row: &RawRecord, idx: usize, column: &str) -> Result<f64> {
  let raw = row.fields[idx].trim();
  raw.parse().map_err(|_| Error::InvalidField {
    line:   row.line,
    column: column.to_string(),
    value:  raw.to_string(),
  })
}

/// Text fields are taken verbatim; quoting already decided what belongs to
/// the field, so leading and trailing spaces are intentional content.
fn text_field(row: &RawRecord, idx: usize) -> String {
  row.fields[idx].clone()
}

// ─── Feed parsers ────────────────────────────────────────────────────────────

pub(crate) fn products(input: &str) -> Result<Vec<Product>> {
  let records = split_records(input)?;
  let Some((header, rows)) = records.split_first() else {
    return Err(Error::EmptyPayload);
  };
  let cols =
    resolve_columns(header, &["id", "name", "price", "category"], "products")?;

  let mut out = Vec::with_capacity(rows.len());
  for row in rows {
    cols.check_width(row)?;
    out.push(Product {
      id:       int_field(row, cols.indexes[0], "id")?,
      name:     text_field(row, cols.indexes[1]),
      price:    float_field(row, cols.indexes[2], "price")?,
      category: text_field(row, cols.indexes[3]),
    });
  }
  Ok(out)
}

pub(crate) fn stores(input: &str) -> Result<Vec<Store>> {
  let records = split_records(input)?;
  let Some((header, rows)) = records.split_first() else {
    return Err(Error::EmptyPayload);
  };
  let cols =
    resolve_columns(header, &["id", "city", "region", "address"], "stores")?;

  let mut out = Vec::with_capacity(rows.len());
  for row in rows {
    cols.check_width(row)?;
    out.push(Store {
      id:      int_field(row, cols.indexes[0], "id")?,
      city:    text_field(row, cols.indexes[1]),
      region:  text_field(row, cols.indexes[2]),
      address: text_field(row, cols.indexes[3]),
    });
  }
  Ok(out)
}

pub(crate) fn sales(input: &str) -> Result<Vec<Sale>> {
  let records = split_records(input)?;
  let Some((header, rows)) = records.split_first() else {
    return Err(Error::EmptyPayload);
  };
  let cols = resolve_columns(
    header,
    &["id", "product_id", "store_id", "sale_date", "quantity", "amount"],
    "sales",
  )?;

  let mut out = Vec::with_capacity(rows.len());
  for row in rows {
    cols.check_width(row)?;
    out.push(Sale {
      id:         int_field(row, cols.indexes[0], "id")?,
      product_id: int_field(row, cols.indexes[1], "product_id")?,
      store_id:   int_field(row, cols.indexes[2], "store_id")?,
      sale_date:  normalize_date(&row.fields[cols.indexes[3]])?,
      quantity:   int_field(row, cols.indexes[4], "quantity")?,
      amount:     float_field(row, cols.indexes[5], "amount")?,
    });
  }
  Ok(out)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  // ── Record splitting ────────────────────────────────────────────────────

  #[test]
  fn plain_records_split_on_commas_and_newlines() {
    let recs = split_records("a,b\nc,d\n").unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].fields, vec!["a", "b"]);
    assert_eq!(recs[1].fields, vec!["c", "d"]);
    assert_eq!(recs[1].line, 2);
  }

  #[test]
  fn crlf_records_accepted() {
    let recs = split_records("a,b\r\nc,d\r\n").unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].fields, vec!["a", "b"]);
  }

  #[test]
  fn quoted_separator_stays_in_field() {
    let recs = split_records("1,\"Laptop, 15 inch\",999\n").unwrap();
    assert_eq!(recs[0].fields, vec!["1", "Laptop, 15 inch", "999"]);
  }

  #[test]
  fn doubled_quote_escapes_a_quote() {
    let recs = split_records("1,\"15\"\" screen\"\n").unwrap();
    assert_eq!(recs[0].fields, vec!["1", "15\" screen"]);
  }

  #[test]
  fn newline_inside_quotes_is_literal() {
    let recs = split_records("1,\"two\nlines\"\n2,after\n").unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].fields[1], "two\nlines");
    // The second record starts after the embedded newline.
    assert_eq!(recs[1].line, 3);
  }

  #[test]
  fn blank_lines_and_missing_final_newline() {
    let recs = split_records("a,b\n\nc,d").unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[1].fields, vec!["c", "d"]);
  }

  #[test]
  fn unclosed_quote_is_an_error() {
    let r = split_records("a,\"unterminated\n");
    assert!(matches!(r, Err(Error::UnclosedQuote { line: 1 })));
  }

  // ── Header handling ─────────────────────────────────────────────────────

  #[test]
  fn columns_matched_by_name_in_any_order() {
    let input = "name,category,id,price\nLaptop,Computers,1,999.90\n";
    let rows = products(input).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[0].name, "Laptop");
    assert_eq!(rows[0].price, 999.90);
    assert_eq!(rows[0].category, "Computers");
  }

  #[test]
  fn unknown_extra_columns_ignored() {
    let input = "id,name,price,category,ean\n1,Laptop,999.90,Computers,400638\n";
    let rows = products(input).unwrap();
    assert_eq!(rows[0].name, "Laptop");
  }

  #[test]
  fn missing_column_names_itself() {
    let input = "id,name,category\n1,Laptop,Computers\n";
    let Err(Error::MissingColumn { feed, column }) = products(input) else {
      panic!("expected MissingColumn");
    };
    assert_eq!(feed, "products");
    assert_eq!(column, "price");
  }

  #[test]
  fn bom_on_first_header_cell_tolerated() {
    let input = "\u{feff}id,name,price,category\n1,Laptop,999.90,Computers\n";
    assert_eq!(products(input).unwrap().len(), 1);
  }

  #[test]
  fn empty_payload_is_an_error() {
    assert!(matches!(products(""), Err(Error::EmptyPayload)));
  }

  #[test]
  fn header_only_yields_no_rows() {
    assert!(products("id,name,price,category\n").unwrap().is_empty());
  }

  // ── Field validation ────────────────────────────────────────────────────

  #[test]
  fn short_row_reports_field_count_and_line() {
    let input = "id,name,price,category\n1,Laptop,999.90\n";
    let Err(Error::FieldCount { line, expected, got }) = products(input) else {
      panic!("expected FieldCount");
    };
    assert_eq!((line, expected, got), (2, 4, 3));
  }

  #[test]
  fn bad_number_reports_column_and_value() {
    let input = "id,name,price,category\n1,Laptop,cheap,Computers\n";
    let Err(Error::InvalidField { line, column, value }) = products(input)
    else {
      panic!("expected InvalidField");
    };
    assert_eq!(line, 2);
    assert_eq!(column, "price");
    assert_eq!(value, "cheap");
  }

  #[test]
  fn numeric_fields_tolerate_padding() {
    let input = "id,name,price,category\n 1 ,Laptop, 999.90 ,Computers\n";
    let rows = products(input).unwrap();
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[0].price, 999.90);
  }

  // ── Stores and sales ────────────────────────────────────────────────────

  #[test]
  fn stores_feed_parses() {
    let input = "id,city,region,address\n1,Lyon,Auvergne-Rhône-Alpes,\"12 rue \
                 de la République\"\n";
    let rows = stores(input).unwrap();
    assert_eq!(rows[0].city, "Lyon");
    assert_eq!(rows[0].region, "Auvergne-Rhône-Alpes");
  }

  #[test]
  fn sales_feed_normalizes_dates() {
    let input = "id,product_id,store_id,sale_date,quantity,amount\n\
                 1,1,1,2024-01-05T12:30:00,2,199.80\n\
                 2,1,1,2024/01/06,1,99.90\n";
    let rows = sales(input).unwrap();
    assert_eq!(rows[0].sale_date.to_string(), "2024-01-05");
    assert_eq!(rows[1].sale_date.to_string(), "2024-01-06");
    assert_eq!(rows[0].amount, 199.80);
  }

  #[test]
  fn sales_bad_date_is_fatal() {
    let input = "id,product_id,store_id,sale_date,quantity,amount\n\
                 1,1,1,someday,2,199.80\n";
    assert!(matches!(sales(input), Err(Error::InvalidDate { .. })));
  }
}
