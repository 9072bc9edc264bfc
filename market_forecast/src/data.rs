//! Historical price observations grouped by commodity and market

use crate::error::Result;
use chrono::NaiveDate;
use price_math::SummaryStats;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// Identifies one price series: a commodity traded at a market
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MarketKey {
    pub commodity: String,
    pub market: String,
}

impl MarketKey {
    pub fn new(commodity: impl Into<String>, market: impl Into<String>) -> Self {
        Self {
            commodity: commodity.into(),
            market: market.into(),
        }
    }
}

impl fmt::Display for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.commodity, self.market)
    }
}

/// One day's reported prices for a commodity at a market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub commodity: String,
    pub market: String,
    pub arrival_date: NaiveDate,
    /// Most frequently observed transaction price of the day
    pub modal_price: f64,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl PriceObservation {
    pub fn new(
        commodity: impl Into<String>,
        market: impl Into<String>,
        arrival_date: NaiveDate,
        modal_price: f64,
    ) -> Self {
        Self {
            commodity: commodity.into(),
            market: market.into(),
            arrival_date,
            modal_price,
            min_price: None,
            max_price: None,
        }
    }

    /// Attach the day's minimum and maximum prices
    pub fn with_range(mut self, min_price: Option<f64>, max_price: Option<f64>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn key(&self) -> MarketKey {
        MarketKey::new(self.commodity.clone(), self.market.clone())
    }

    fn is_valid(&self) -> bool {
        self.modal_price.is_finite()
            && !self.commodity.trim().is_empty()
            && !self.market.trim().is_empty()
    }
}

/// Borrowed view of the observations for one key, ordered by arrival date
#[derive(Debug, Clone, Copy)]
pub struct PriceSeries<'a> {
    key: &'a MarketKey,
    observations: &'a [PriceObservation],
}

impl<'a> PriceSeries<'a> {
    pub fn key(&self) -> &'a MarketKey {
        self.key
    }

    pub fn observations(&self) -> &'a [PriceObservation] {
        self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Earliest arrival date, the origin of the day offsets
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|obs| obs.arrival_date)
    }

    /// `(days since start_date, modal price)` for every observation
    pub fn day_offsets(&self) -> Vec<(i64, f64)> {
        let Some(start) = self.start_date() else {
            return Vec::new();
        };

        self.observations
            .iter()
            .map(|obs| ((obs.arrival_date - start).num_days(), obs.modal_price))
            .collect()
    }

    pub fn modal_prices(&self) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.modal_price).collect()
    }

    /// Summary statistics of the modal prices
    pub fn summary(&self) -> Result<SummaryStats> {
        Ok(SummaryStats::from_values(&self.modal_prices())?)
    }
}

/// In-memory table of cleaned price history, grouped by key
#[derive(Debug, Clone, Default)]
pub struct PriceHistoryStore {
    groups: BTreeMap<MarketKey, Vec<PriceObservation>>,
    dropped: usize,
}

/// Build a store from already-typed rows.
///
/// Rows without a finite modal price or with a blank commodity or market are
/// excluded. Each group is ordered by arrival date; rows sharing a date keep
/// their input order.
pub fn load_price_history<I>(rows: I) -> PriceHistoryStore
where
    I: IntoIterator<Item = PriceObservation>,
{
    let mut groups: BTreeMap<MarketKey, Vec<PriceObservation>> = BTreeMap::new();
    let mut dropped = 0;

    for row in rows {
        if !row.is_valid() {
            dropped += 1;
            continue;
        }
        groups.entry(row.key()).or_default().push(row);
    }

    for observations in groups.values_mut() {
        observations.sort_by_key(|obs| obs.arrival_date);
    }

    if dropped > 0 {
        debug!(dropped, "excluded invalid price rows");
    }

    PriceHistoryStore { groups, dropped }
}

impl PriceHistoryStore {
    /// Observations for a key in arrival order; empty for unknown keys
    pub fn observations_for(&self, commodity: &str, market: &str) -> &[PriceObservation] {
        self.groups
            .get(&MarketKey::new(commodity, market))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Observations for `key` whose arrival date lies in `[from, to]`
    pub fn observations_between(
        &self,
        key: &MarketKey,
        from: NaiveDate,
        to: NaiveDate,
    ) -> &[PriceObservation] {
        let Some(observations) = self.groups.get(key) else {
            return &[];
        };

        let start = observations.partition_point(|obs| obs.arrival_date < from);
        let end = observations.partition_point(|obs| obs.arrival_date <= to);
        if start >= end {
            &[]
        } else {
            &observations[start..end]
        }
    }

    pub fn all_keys(&self) -> BTreeSet<MarketKey> {
        self.groups.keys().cloned().collect()
    }

    pub fn series(&self, key: &MarketKey) -> Option<PriceSeries<'_>> {
        self.groups
            .get_key_value(key)
            .map(|(key, observations)| PriceSeries { key, observations })
    }

    /// Every series, in key order
    pub fn iter_series(&self) -> impl Iterator<Item = PriceSeries<'_>> {
        self.groups
            .iter()
            .map(|(key, observations)| PriceSeries { key, observations })
    }

    /// Sorted, de-duplicated commodity names
    pub fn available_commodities(&self) -> Vec<String> {
        self.groups
            .keys()
            .map(|key| key.commodity.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted, de-duplicated market names
    pub fn available_markets(&self) -> Vec<String> {
        self.groups
            .keys()
            .map(|key| key.market.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of groups
    pub fn key_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of stored observations across all groups
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Rows excluded as invalid when the store was built
    pub fn dropped_rows(&self) -> usize {
        self.dropped
    }
}
