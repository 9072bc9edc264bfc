//! # Price Math
//!
//! Numeric building blocks for price forecasting.
//! This crate provides an ordinary least-squares line fit and summary
//! statistics over plain `f64` slices. It knows nothing about commodities,
//! markets or calendars.

use thiserror::Error;

pub mod regression;
pub mod statistics;

pub use regression::LinearFit;
pub use statistics::SummaryStats;

/// Errors that can occur in price calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for price math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Round a value to a fixed number of decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}
