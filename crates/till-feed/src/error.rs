//! Error types for the till-feed codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("empty payload: no header record")]
  EmptyPayload,

  #[error("{feed} feed is missing required column {column:?}")]
  MissingColumn { feed: String, column: String },

  #[error("line {line}: expected {expected} fields, got {got}")]
  FieldCount {
    line:     usize,
    expected: usize,
    got:      usize,
  },

  #[error("line {line}: unclosed quoted field")]
  UnclosedQuote { line: usize },

  #[error("line {line}: invalid {column} value {value:?}")]
  InvalidField {
    line:   usize,
    column: String,
    value:  String,
  },

  #[error("invalid sale date: {value:?}")]
  InvalidDate { value: String },

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
