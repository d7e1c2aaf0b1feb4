//! Core types and trait definitions for the till sales data mart.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod analysis;
pub mod error;
pub mod record;
pub mod revenue;
pub mod store;

pub use error::{Error, Result};
