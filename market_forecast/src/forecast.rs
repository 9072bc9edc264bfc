//! Point forecasts, trend classification and sell-window search

use crate::config::ForecastConfig;
use crate::data::{MarketKey, PriceObservation};
use crate::error::Result;
use crate::models::{ModelSet, TrainedPriceModel};
use chrono::{Duration, NaiveDate};
use price_math::{round_to, statistics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the predicted price movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Up,
    Down,
    Stable,
}

impl PriceTrend {
    /// Classify a daily slope. Both bounds are strict, so a slope of exactly
    /// `threshold` or `-threshold` is `Stable`.
    pub fn classify(slope_per_day: f64, threshold: f64) -> Self {
        if slope_per_day > threshold {
            PriceTrend::Up
        } else if slope_per_day < -threshold {
            PriceTrend::Down
        } else {
            PriceTrend::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTrend::Up => "up",
            PriceTrend::Down => "down",
            PriceTrend::Stable => "stable",
        }
    }
}

impl fmt::Display for PriceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market outlook for one commodity at one market on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub price_today: f64,
    pub price_trend: PriceTrend,
    /// Average predicted change per day over the next 7 days
    pub price_trend_slope_7d: f64,
    /// Predicted change between today and 3 days from now
    pub expected_price_delta_3d: f64,
    pub price_above_month_avg_flag: bool,
    /// Days from today to the highest predicted price in the lookahead window
    pub best_sell_window_days: usize,
}

/// Forecast `commodity` at `market` for `target_date`.
///
/// Fails with `NotFound` when no model was fitted for the pair, including
/// pairs that had too little history.
pub fn forecast(
    model_set: &ModelSet,
    commodity: &str,
    market: &str,
    target_date: NaiveDate,
) -> Result<ForecastResult> {
    model_set.forecast(&MarketKey::new(commodity, market), target_date)
}

impl ModelSet {
    /// Forecast the series identified by `key` for `target_date`
    pub fn forecast(&self, key: &MarketKey, target_date: NaiveDate) -> Result<ForecastResult> {
        let model = self.model_for(key)?;
        let config = self.config();

        let window_start = Duration::try_days(config.month_window_days)
            .and_then(|window| target_date.checked_sub_signed(window))
            .unwrap_or(NaiveDate::MIN);
        let recent = self
            .store()
            .observations_between(key, window_start, target_date);

        Ok(project(model, recent, target_date, config))
    }
}

/// Derive a forecast from a trained model and the observations of the
/// trailing month window.
pub fn project<M: TrainedPriceModel + ?Sized>(
    model: &M,
    recent: &[PriceObservation],
    target_date: NaiveDate,
    config: &ForecastConfig,
) -> ForecastResult {
    let days = model.days_since_start(target_date);

    let price_today = model.predict(days);
    let slope_7d = (model.predict(days + 7) - price_today) / 7.0;
    let delta_3d = model.predict(days + 3) - price_today;

    let recent_prices: Vec<f64> = recent.iter().map(|obs| obs.modal_price).collect();
    let month_average = statistics::mean(&recent_prices).unwrap_or(price_today);

    ForecastResult {
        price_today: round_to(price_today, config.price_precision),
        price_trend: PriceTrend::classify(slope_7d, config.trend_threshold),
        price_trend_slope_7d: round_to(slope_7d, config.price_precision),
        expected_price_delta_3d: round_to(delta_3d, config.price_precision),
        price_above_month_avg_flag: price_today > month_average,
        best_sell_window_days: best_sell_window(model, days, config.sell_window_days),
    }
}

/// Offset, relative to `days_since_start`, of the highest predicted price
/// among the next `window_days` days (today included). Ties resolve to the
/// earliest day.
pub fn best_sell_window<M: TrainedPriceModel + ?Sized>(
    model: &M,
    days_since_start: i64,
    window_days: usize,
) -> usize {
    let mut best_offset = 0;
    let mut best_price = f64::NEG_INFINITY;

    for offset in 0..window_days {
        let price = model.predict(days_since_start + offset as i64);
        if price > best_price {
            best_offset = offset;
            best_price = price;
        }
    }

    best_offset
}
