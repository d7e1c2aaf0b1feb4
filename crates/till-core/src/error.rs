//! Error types for `till-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown analysis kind label: {0:?}")]
  UnknownAnalysisKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
