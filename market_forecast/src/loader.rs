//! CSV loading for market price reports
//!
//! Expects the columns `Commodity`, `Market`, `Arrival_Date`, `Min Price`,
//! `Max Price` and `Modal Price`; any other columns are ignored. Prices that
//! do not parse are treated as missing, and rows without a valid arrival date
//! or modal price are dropped.

use crate::config::DEFAULT_DATE_FORMAT;
use crate::data::{load_price_history, PriceHistoryStore, PriceObservation};
use crate::error::Result;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// A CSV row before cleaning
#[derive(Debug, Deserialize)]
struct RawPriceRecord {
    #[serde(rename = "Commodity")]
    commodity: String,
    #[serde(rename = "Market")]
    market: String,
    #[serde(rename = "Arrival_Date")]
    arrival_date: Option<String>,
    #[serde(rename = "Min Price")]
    min_price: Option<String>,
    #[serde(rename = "Max Price")]
    max_price: Option<String>,
    #[serde(rename = "Modal Price")]
    modal_price: Option<String>,
}

impl RawPriceRecord {
    fn into_observation(self, date_format: &str) -> Option<PriceObservation> {
        let arrival_date = self
            .arrival_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), date_format).ok())?;
        let modal_price = parse_price(self.modal_price.as_deref())?;

        Some(
            PriceObservation::new(self.commodity, self.market, arrival_date, modal_price)
                .with_range(
                    parse_price(self.min_price.as_deref()),
                    parse_price(self.max_price.as_deref()),
                ),
        )
    }
}

fn parse_price(field: Option<&str>) -> Option<f64> {
    field
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Loader for market price CSV files
#[derive(Debug, Clone)]
pub struct PriceHistoryLoader {
    date_format: String,
}

impl Default for PriceHistoryLoader {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl PriceHistoryLoader {
    /// Create a loader that parses arrival dates with `date_format`
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Load price history from a CSV file
    pub fn load_csv<P: AsRef<Path>>(&self, path: P) -> Result<PriceHistoryStore> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let store = self.load_reader(file)?;
        info!(
            path = %path.display(),
            observations = store.len(),
            keys = store.key_count(),
            "loaded price history"
        );
        Ok(store)
    }

    /// Load price history from any CSV source
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<PriceHistoryStore> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        let mut unparseable = 0usize;

        for record in csv_reader.deserialize::<RawPriceRecord>() {
            match record?.into_observation(&self.date_format) {
                Some(observation) => rows.push(observation),
                None => unparseable += 1,
            }
        }

        if unparseable > 0 {
            debug!(unparseable, "dropped rows without a valid date or modal price");
        }

        Ok(load_price_history(rows))
    }
}
