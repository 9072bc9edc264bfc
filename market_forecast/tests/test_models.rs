use assert_approx_eq::assert_approx_eq;
use chrono::{Duration, NaiveDate};
use market_forecast::config::{ForecastConfig, MIN_OBSERVATIONS};
use market_forecast::models::{build_models, build_models_with, LinearTrend, PriceModel};
use market_forecast::{load_price_history, ForecastError, MarketKey, PriceObservation, TrainedPriceModel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
}

fn observations(commodity: &str, market: &str, points: &[(i64, f64)]) -> Vec<PriceObservation> {
    points
        .iter()
        .map(|&(offset, price)| PriceObservation::new(commodity, market, day(offset), price))
        .collect()
}

fn random_series(seed: u64, count: usize) -> Vec<PriceObservation> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let offset: i64 = rng.gen_range(0..200);
            let price: f64 = rng.gen_range(800.0..1200.0);
            PriceObservation::new("Tomato", "Kanpur", day(offset), price)
        })
        .collect()
}

#[test]
fn test_fit_recovers_exact_line() {
    let rows = observations(
        "Wheat",
        "Agra",
        &[(0, 1000.0), (2, 1020.0), (5, 1050.0), (8, 1080.0), (10, 1100.0)],
    );
    let models = build_models(load_price_history(rows));
    let model = models.model(&MarketKey::new("Wheat", "Agra")).unwrap();

    assert_eq!(model.slope, 10.0);
    assert_eq!(model.intercept, 1000.0);
    assert_eq!(model.start_date, day(0));
    assert_eq!(model.observations, 5);
    assert_eq!(model.min_price, 1000.0);
    assert_eq!(model.max_price, 1100.0);
    assert_approx_eq!(model.avg_price, 1050.0);
    assert!(model.price_volatility > 0.0);
}

#[test]
fn test_start_date_is_earliest_observation() {
    // Input order must not matter
    let rows = observations(
        "Wheat",
        "Agra",
        &[(9, 1090.0), (3, 1030.0), (0, 1000.0), (6, 1060.0), (12, 1120.0)],
    );
    let models = build_models(load_price_history(rows));
    let model = models.model(&MarketKey::new("Wheat", "Agra")).unwrap();

    assert_eq!(model.start_date, day(0));
    assert_approx_eq!(model.slope, 10.0, 1e-9);
    assert_approx_eq!(model.intercept, 1000.0, 1e-9);
}

#[test]
fn test_fitting_is_deterministic() {
    let first = build_models(load_price_history(random_series(7, 40)));
    let second = build_models(load_price_history(random_series(7, 40)));

    let key = MarketKey::new("Tomato", "Kanpur");
    let a = first.model(&key).unwrap();
    let b = second.model(&key).unwrap();

    assert_eq!(a.slope, b.slope);
    assert_eq!(a.intercept, b.intercept);
    assert_eq!(a, b);
}

#[test]
fn test_short_groups_are_excluded() {
    let mut rows = observations(
        "Onion",
        "Agra",
        &[(0, 900.0), (1, 910.0), (2, 920.0), (3, 930.0)],
    );
    rows.extend(observations(
        "Wheat",
        "Agra",
        &[(0, 1000.0), (1, 1010.0), (2, 1020.0), (3, 1030.0), (4, 1040.0)],
    ));

    let models = build_models(load_price_history(rows));
    let onion = MarketKey::new("Onion", "Agra");

    assert_eq!(models.len(), 1);
    assert!(!models.contains(&onion));
    assert!(models.contains(&MarketKey::new("Wheat", "Agra")));
    assert_eq!(models.skipped().get(&onion), Some(&4));
    assert!(matches!(models.model_for(&onion), Err(ForecastError::NotFound(key)) if key == onion));
}

#[test]
fn test_custom_minimum_observations() {
    let rows = observations("Onion", "Agra", &[(0, 900.0), (1, 910.0), (2, 920.0)]);
    let config = ForecastConfig {
        min_observations: 3,
        ..ForecastConfig::default()
    };

    let models = build_models_with(load_price_history(rows.clone()), &config).unwrap();
    assert_eq!(models.len(), 1);

    let strict = build_models(load_price_history(rows));
    assert!(strict.is_empty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = ForecastConfig {
        min_observations: 1,
        ..ForecastConfig::default()
    };
    let result = build_models_with(load_price_history(Vec::new()), &config);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_linear_trend_reports_insufficient_data() {
    let store = load_price_history(observations("Onion", "Agra", &[(0, 900.0), (1, 910.0)]));
    let series = store.series(&MarketKey::new("Onion", "Agra")).unwrap();

    let fitter = LinearTrend::default();
    assert_eq!(fitter.min_observations(), MIN_OBSERVATIONS);

    match fitter.fit(&series) {
        Err(ForecastError::InsufficientData {
            observations,
            required,
            ..
        }) => {
            assert_eq!(observations, 2);
            assert_eq!(required, MIN_OBSERVATIONS);
        }
        other => panic!("Expected InsufficientData, got {:?}", other),
    }

    assert!(LinearTrend::new(1).is_err());
}

#[test]
fn test_same_day_observations_fit_flat_line() {
    let rows = observations(
        "Potato",
        "Etawah",
        &[(0, 600.0), (0, 700.0), (0, 800.0), (0, 650.0), (0, 750.0)],
    );
    let models = build_models(load_price_history(rows));
    let model = models.model(&MarketKey::new("Potato", "Etawah")).unwrap();

    assert_eq!(model.slope, 0.0);
    assert_approx_eq!(model.intercept, 700.0);
    assert_approx_eq!(model.predict(30), 700.0);
}

#[test]
fn test_prediction_extrapolates_both_ways() {
    let rows = observations(
        "Wheat",
        "Agra",
        &[(0, 1000.0), (2, 1020.0), (5, 1050.0), (8, 1080.0), (10, 1100.0)],
    );
    let models = build_models(load_price_history(rows));
    let model = models.model(&MarketKey::new("Wheat", "Agra")).unwrap();

    assert_eq!(model.predict(0), model.intercept);
    assert_eq!(model.predict(365), 4650.0);
    assert_eq!(model.predict(-10), 900.0);
    assert_eq!(model.days_since_start(day(-3)), -3);
}
