//! Forecast configuration
//!
//! Every threshold used by the fitter and the forecast engine lives here with
//! its historical default. A TOML file may override any subset of them:
//!
//! ```toml
//! min_observations = 5
//! trend_threshold = 5.0
//! sell_window_days = 15
//! month_window_days = 30
//! price_precision = 2
//! date_format = "%d-%m-%Y"
//! ```

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Minimum observations a (commodity, market) group needs to be modelled
pub const MIN_OBSERVATIONS: usize = 5;

/// Slope in price units per day above which a trend is `up` (below its negation, `down`)
pub const TREND_THRESHOLD: f64 = 5.0;

/// Number of daily points scanned for the best sell window, today included
pub const SELL_WINDOW_DAYS: usize = 15;

/// Trailing window, in days, for the monthly average comparison
pub const MONTH_WINDOW_DAYS: i64 = 30;

/// Decimal places prices and slopes are rounded to
pub const PRICE_PRECISION: u32 = 2;

/// Upper bounds accepted by [`ForecastConfig::validate`]
pub const MAX_SELL_WINDOW_DAYS: usize = 366;
pub const MAX_MONTH_WINDOW_DAYS: i64 = 3650;
pub const MAX_PRICE_PRECISION: u32 = 10;

/// Arrival date format of the market CSV
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Tunable parameters of model fitting and forecasting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub min_observations: usize,
    pub trend_threshold: f64,
    pub sell_window_days: usize,
    pub month_window_days: i64,
    pub price_precision: u32,
    pub date_format: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_observations: MIN_OBSERVATIONS,
            trend_threshold: TREND_THRESHOLD,
            sell_window_days: SELL_WINDOW_DAYS,
            month_window_days: MONTH_WINDOW_DAYS,
            price_precision: PRICE_PRECISION,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl ForecastConfig {
    /// Load and validate a configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        if self.min_observations < 2 {
            return Err(ForecastError::InvalidParameter(
                "min_observations must be at least 2".to_string(),
            ));
        }
        if !self.trend_threshold.is_finite() || self.trend_threshold < 0.0 {
            return Err(ForecastError::InvalidParameter(
                "trend_threshold must be a finite, non-negative number".to_string(),
            ));
        }
        if self.sell_window_days == 0 || self.sell_window_days > MAX_SELL_WINDOW_DAYS {
            return Err(ForecastError::InvalidParameter(format!(
                "sell_window_days must be between 1 and {}",
                MAX_SELL_WINDOW_DAYS
            )));
        }
        if !(0..=MAX_MONTH_WINDOW_DAYS).contains(&self.month_window_days) {
            return Err(ForecastError::InvalidParameter(format!(
                "month_window_days must be between 0 and {}",
                MAX_MONTH_WINDOW_DAYS
            )));
        }
        if self.price_precision > MAX_PRICE_PRECISION {
            return Err(ForecastError::InvalidParameter(format!(
                "price_precision must be at most {}",
                MAX_PRICE_PRECISION
            )));
        }
        if self.date_format.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "date_format must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
