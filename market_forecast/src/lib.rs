//! # Market Forecast
//!
//! Short-range price outlooks for agricultural commodities, built from
//! historical mandi price reports.
//!
//! ## Features
//!
//! - Price history grouped by (commodity, market)
//! - One least-squares trend model per group, fitted once at startup
//! - Forecasts with trend classification, 3-day delta, monthly-average
//!   comparison and best sell window
//! - Case-insensitive resolution of free-text place and crop names
//! - Configurable thresholds, CSV loading and atomic model reloads
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use market_forecast::{build_models, forecast, load_price_history, resolve_key};
//! use market_forecast::{PriceObservation, PriceTrend};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let rows = (0..5).map(|day| {
//!     PriceObservation::new(
//!         "Wheat",
//!         "Agra",
//!         start + chrono::Duration::days(day),
//!         2000.0 + 10.0 * day as f64,
//!     )
//! });
//!
//! let models = build_models(load_price_history(rows));
//! let key = resolve_key(&models, "agra", "WHEAT", false)?;
//! let outlook = forecast(&models, &key.commodity, &key.market, start)?;
//!
//! assert_eq!(outlook.price_today, 2000.0);
//! assert_eq!(outlook.price_trend, PriceTrend::Up);
//! assert_eq!(outlook.best_sell_window_days, 14);
//! # Ok::<(), market_forecast::ForecastError>(())
//! ```

pub mod advice;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod loader;
pub mod lookup;
pub mod models;
pub mod snapshot;

// Re-export commonly used types
pub use crate::advice::MarketAdvice;
pub use crate::config::ForecastConfig;
pub use crate::data::{load_price_history, MarketKey, PriceHistoryStore, PriceObservation, PriceSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::forecast::{forecast, ForecastResult, PriceTrend};
pub use crate::loader::PriceHistoryLoader;
pub use crate::lookup::{resolve_key, KeyMatch, MatchKind, MatchPolicy};
pub use crate::models::{
    build_models, build_models_with, LinearTrend, ModelSet, PriceModel, TrainedPriceModel,
    TrendModel,
};
pub use crate::snapshot::SnapshotCell;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
