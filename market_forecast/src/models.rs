//! Trend models fitted per (commodity, market) price series

use crate::config::{ForecastConfig, MIN_OBSERVATIONS};
use crate::data::{MarketKey, PriceHistoryStore, PriceSeries};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use price_math::LinearFit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A fitted model that extrapolates price from days elapsed since its start date
pub trait TrainedPriceModel: Debug + Send + Sync {
    /// Predicted price `days_since_start` days after the start date.
    /// Negative offsets extrapolate backwards.
    fn predict(&self, days_since_start: i64) -> f64;

    /// Day zero of the model's time axis
    fn start_date(&self) -> NaiveDate;

    /// Whole days from the start date to `date`
    fn days_since_start(&self, date: NaiveDate) -> i64 {
        (date - self.start_date()).num_days()
    }
}

/// A model that can be fitted to a price series
pub trait PriceModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedPriceModel;

    /// Fit the model to one series
    fn fit(&self, series: &PriceSeries<'_>) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Ordinary least-squares trend of modal price against day offset
#[derive(Debug, Clone)]
pub struct LinearTrend {
    name: String,
    min_observations: usize,
}

/// Fitted linear trend plus descriptive statistics of the series it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    /// Price change per day
    pub slope: f64,
    /// Price at day zero
    pub intercept: f64,
    pub start_date: NaiveDate,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    /// Sample standard deviation of the modal prices
    pub price_volatility: f64,
    pub observations: usize,
}

impl LinearTrend {
    /// Create a fitter requiring at least `min_observations` points per series
    pub fn new(min_observations: usize) -> Result<Self> {
        if min_observations < 2 {
            return Err(ForecastError::InvalidParameter(
                "A linear trend needs at least 2 observations".to_string(),
            ));
        }

        Ok(Self::named(min_observations))
    }

    fn named(min_observations: usize) -> Self {
        Self {
            name: format!("Linear Trend (min_observations={})", min_observations),
            min_observations,
        }
    }

    pub fn min_observations(&self) -> usize {
        self.min_observations
    }
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self::named(MIN_OBSERVATIONS)
    }
}

impl PriceModel for LinearTrend {
    type Trained = TrendModel;

    fn fit(&self, series: &PriceSeries<'_>) -> Result<TrendModel> {
        if series.len() < self.min_observations {
            return Err(ForecastError::InsufficientData {
                key: series.key().clone(),
                observations: series.len(),
                required: self.min_observations,
            });
        }

        let Some(start_date) = series.start_date() else {
            return Err(ForecastError::DataError(format!(
                "Empty price series for {}",
                series.key()
            )));
        };

        let points: Vec<(f64, f64)> = series
            .day_offsets()
            .into_iter()
            .map(|(days, price)| (days as f64, price))
            .collect();

        let fit = LinearFit::fit(&points)?;
        let stats = series.summary()?;

        Ok(TrendModel {
            slope: fit.slope,
            intercept: fit.intercept,
            start_date,
            min_price: stats.min,
            max_price: stats.max,
            avg_price: stats.mean,
            price_volatility: stats.std_dev,
            observations: stats.count,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedPriceModel for TrendModel {
    fn predict(&self, days_since_start: i64) -> f64 {
        self.intercept + self.slope * days_since_start as f64
    }

    fn start_date(&self) -> NaiveDate {
        self.start_date
    }
}

/// Immutable set of trend models together with the history they were fitted on
#[derive(Debug, Clone)]
pub struct ModelSet {
    store: Arc<PriceHistoryStore>,
    models: BTreeMap<MarketKey, TrendModel>,
    skipped: BTreeMap<MarketKey, usize>,
    config: ForecastConfig,
}

/// Fit one trend model per eligible series using the default thresholds
pub fn build_models(store: impl Into<Arc<PriceHistoryStore>>) -> ModelSet {
    fit_all(store.into(), ForecastConfig::default())
}

/// Fit one trend model per eligible series using `config`
pub fn build_models_with(
    store: impl Into<Arc<PriceHistoryStore>>,
    config: &ForecastConfig,
) -> Result<ModelSet> {
    config.validate()?;
    Ok(fit_all(store.into(), config.clone()))
}

fn fit_all(store: Arc<PriceHistoryStore>, config: ForecastConfig) -> ModelSet {
    let fitter = LinearTrend::named(config.min_observations);

    let mut models = BTreeMap::new();
    let mut skipped = BTreeMap::new();

    for series in store.iter_series() {
        match fitter.fit(&series) {
            Ok(model) => {
                models.insert(series.key().clone(), model);
            }
            Err(ForecastError::InsufficientData { observations, .. }) => {
                debug!(key = %series.key(), observations, "skipping short price series");
                skipped.insert(series.key().clone(), observations);
            }
            Err(e) => {
                warn!(key = %series.key(), error = %e, "failed to fit price series");
                skipped.insert(series.key().clone(), series.len());
            }
        }
    }

    info!(
        model = fitter.name(),
        models = models.len(),
        skipped = skipped.len(),
        "built trend models"
    );

    ModelSet {
        store,
        models,
        skipped,
        config,
    }
}

impl ModelSet {
    pub fn model(&self, key: &MarketKey) -> Option<&TrendModel> {
        self.models.get(key)
    }

    /// The model for `key`, or `NotFound` when none was fitted
    pub fn model_for(&self, key: &MarketKey) -> Result<&TrendModel> {
        self.models
            .get(key)
            .ok_or_else(|| ForecastError::NotFound(key.clone()))
    }

    pub fn contains(&self, key: &MarketKey) -> bool {
        self.models.contains_key(key)
    }

    /// Modelled keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &MarketKey> {
        self.models.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MarketKey, &TrendModel)> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Keys left out of the model set, with their observation counts
    pub fn skipped(&self) -> &BTreeMap<MarketKey, usize> {
        &self.skipped
    }

    pub fn store(&self) -> &PriceHistoryStore {
        &self.store
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }
}
