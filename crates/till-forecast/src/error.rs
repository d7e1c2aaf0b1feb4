use thiserror::Error;

/// Errors produced while fitting the revenue model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// The series is shorter than the lag structure requires.
  #[error("need {needed} daily totals to fit, got {got}")]
  InsufficientData { needed: usize, got: usize },
}

/// Convenience alias for forecast results.
pub type Result<T, E = Error> = std::result::Result<T, E>;
