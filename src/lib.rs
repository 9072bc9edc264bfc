//! # Farm Advisory
//!
//! Market side of the farm advisory service: commodity price history, trend
//! models and short-range sell recommendations.
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use farm_advisory_workspace::market_forecast::{build_models, load_price_history};
//! use farm_advisory_workspace::market_forecast::{MarketAdvice, MatchPolicy, PriceObservation};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let rows = [2100.0, 2080.0, 2040.0, 2010.0, 1990.0, 1950.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(day, &price)| {
//!         PriceObservation::new("Mustard", "Jhansi", start + chrono::Duration::days(day as i64), price)
//!     });
//!
//! let models = build_models(load_price_history(rows));
//! let found = models.lookup("jhansi", "mustard", MatchPolicy::Strict).unwrap();
//! let outlook = models.forecast(&found.key, start + chrono::Duration::days(6)).unwrap();
//! let advice = MarketAdvice::from_forecast(&outlook);
//!
//! assert_eq!(outlook.best_sell_window_days, 0);
//! assert!(advice.message.starts_with("Sell immediately"));
//! ```

pub use market_forecast;
pub use price_math;

pub use market_forecast::{
    build_models, forecast, load_price_history, resolve_key, ForecastError, ForecastResult,
    MarketKey, ModelSet, PriceTrend,
};
