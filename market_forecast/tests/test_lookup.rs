use chrono::{Duration, NaiveDate};
use market_forecast::{
    build_models, load_price_history, resolve_key, ForecastError, KeyMatch, MarketKey, MatchKind,
    MatchPolicy, ModelSet, PriceObservation,
};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

fn series(commodity: &str, market: &str, count: i64) -> Vec<PriceObservation> {
    let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    (0..count)
        .map(|d| PriceObservation::new(commodity, market, start + Duration::days(d), 700.0 + d as f64))
        .collect()
}

#[fixture]
fn models() -> ModelSet {
    let mut rows = series("Potato", "Agra", 6);
    rows.extend(series("Potato", "Agra Cantt", 6));
    rows.extend(series("Wheat", "Etawah", 6));
    rows.extend(series("Cucumbar(Kheera)", "Etawah", 6));
    // Too short to model
    rows.extend(series("Onion", "Lucknow", 4));
    build_models(load_price_history(rows))
}

#[rstest]
fn test_exact_match_beats_partial(models: ModelSet) {
    // "Agra Cantt" also contains "Agra", which sorts first
    let key = resolve_key(&models, "Agra Cantt", "Potato", false).unwrap();
    assert_eq!(key, MarketKey::new("Potato", "Agra Cantt"));
}

#[rstest]
#[case("agra cantt", "POTATO")]
#[case("  AGRA CANTT ", "potato")]
fn test_exact_match_ignores_case(models: ModelSet, #[case] place: &str, #[case] crop: &str) {
    let found = models.lookup(place, crop, MatchPolicy::Strict).unwrap();
    assert_eq!(
        found,
        KeyMatch {
            key: MarketKey::new("Potato", "Agra Cantt"),
            kind: MatchKind::Exact,
        }
    );
}

#[rstest]
#[case("Etawah", "Cucumbar", MarketKey::new("Cucumbar(Kheera)", "Etawah"))]
#[case("Etawah Mandi", "wheat", MarketKey::new("Wheat", "Etawah"))]
#[case("AGRA", "pot", MarketKey::new("Potato", "Agra"))]
fn test_partial_match(
    models: ModelSet,
    #[case] place: &str,
    #[case] crop: &str,
    #[case] expected: MarketKey,
) {
    let found = models.lookup(place, crop, MatchPolicy::Strict).unwrap();
    assert_eq!(found.key, expected);
    assert_eq!(found.kind, MatchKind::Partial);
}

#[rstest]
fn test_partial_match_needs_both_names(models: ModelSet) {
    // Crop matches, place does not
    assert!(matches!(
        resolve_key(&models, "Kanpur", "Potato", false),
        Err(ForecastError::NotFound(_))
    ));
    // Place matches, crop does not
    assert!(matches!(
        resolve_key(&models, "Agra", "Rice", false),
        Err(ForecastError::NotFound(_))
    ));
}

#[rstest]
fn test_no_fallback_by_default(models: ModelSet) {
    match resolve_key(&models, "Jhansi", "Mustard", false) {
        Err(ForecastError::NotFound(key)) => {
            assert_eq!(key, MarketKey::new("Mustard", "Jhansi"));
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
    assert_eq!(MatchPolicy::default(), MatchPolicy::Strict);
}

#[rstest]
fn test_fallback_is_opt_in(models: ModelSet) {
    let key = resolve_key(&models, "Jhansi", "Mustard", true).unwrap();
    assert_eq!(key, MarketKey::new("Cucumbar(Kheera)", "Etawah"));

    let found = models
        .lookup("Jhansi", "Mustard", MatchPolicy::AllowFallback)
        .unwrap();
    assert_eq!(found.kind, MatchKind::Fallback);
}

#[rstest]
fn test_fallback_does_not_override_a_match(models: ModelSet) {
    let found = models
        .lookup("Agra", "Potato", MatchPolicy::AllowFallback)
        .unwrap();
    assert_eq!(found.kind, MatchKind::Exact);
    assert_eq!(found.key, MarketKey::new("Potato", "Agra"));
}

#[rstest]
fn test_unmodelled_keys_never_match(models: ModelSet) {
    assert!(matches!(
        resolve_key(&models, "Lucknow", "Onion", false),
        Err(ForecastError::NotFound(_))
    ));
}

#[test]
fn test_fallback_on_empty_model_set() {
    let models = build_models(load_price_history(Vec::new()));
    assert!(matches!(
        resolve_key(&models, "Agra", "Wheat", true),
        Err(ForecastError::NotFound(_))
    ));
}

#[rstest]
#[case("", "Wheat")]
#[case("Agra", "   ")]
fn test_blank_names_are_rejected(models: ModelSet, #[case] place: &str, #[case] crop: &str) {
    assert!(matches!(
        resolve_key(&models, place, crop, true),
        Err(ForecastError::InvalidParameter(_))
    ));
}
