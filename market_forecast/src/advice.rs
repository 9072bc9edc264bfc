//! Sell recommendations derived from a forecast

use crate::forecast::{ForecastResult, PriceTrend};
use serde::Serialize;

/// Human-readable selling advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketAdvice {
    pub price_trend: PriceTrend,
    pub sell_in_days: usize,
    pub message: String,
}

impl MarketAdvice {
    pub fn from_forecast(forecast: &ForecastResult) -> Self {
        let sell_in_days = forecast.best_sell_window_days;
        let message = match forecast.price_trend {
            PriceTrend::Up if sell_in_days > 0 => {
                format!("Consider selling in {} days for higher profit", sell_in_days)
            }
            PriceTrend::Up => "Sell now for maximum profit".to_string(),
            PriceTrend::Down => "Sell immediately after harvest to avoid price drop".to_string(),
            PriceTrend::Stable => {
                "Price is stable. Sell within harvest window as convenient".to_string()
            }
        };

        Self {
            price_trend: forecast.price_trend,
            sell_in_days,
            message,
        }
    }
}
