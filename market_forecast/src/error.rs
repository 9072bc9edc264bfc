//! Error types for the market_forecast crate

use crate::data::MarketKey;
use price_math::MathError;
use thiserror::Error;

/// Custom error types for the market_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// No trend model exists for the requested key
    #[error("No model available for {0}")]
    NotFound(MarketKey),

    /// A price series was too short to fit a trend model
    #[error("Insufficient data for {key}: {observations} observations, need at least {required}")]
    InsufficientData {
        key: MarketKey,
        observations: usize,
        required: usize,
    },

    /// A date could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from reading CSV data
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from parsing a configuration file
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
