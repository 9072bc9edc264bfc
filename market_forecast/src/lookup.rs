//! Resolving free-text place and crop names to a modelled key
//!
//! Rules are tried in order and the first hit wins:
//!
//! 1. exact, case-insensitive match of both crop and place
//! 2. crop and commodity contain one another, and place and market contain
//!    one another
//! 3. only under [`MatchPolicy::AllowFallback`], the first modelled key
//!
//! Keys are scanned in sorted order, so every rule is deterministic.

use crate::data::MarketKey;
use crate::error::{ForecastError, Result};
use crate::models::ModelSet;
use serde::Serialize;
use tracing::warn;

/// Whether an unmatched lookup may fall back to an unrelated key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    #[default]
    Strict,
    /// Degraded mode: answer with some key rather than none
    AllowFallback,
}

impl From<bool> for MatchPolicy {
    fn from(allow_fallback: bool) -> Self {
        if allow_fallback {
            MatchPolicy::AllowFallback
        } else {
            MatchPolicy::Strict
        }
    }
}

/// Which rule produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Partial,
    Fallback,
}

/// A resolved key and how it was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyMatch {
    pub key: MarketKey,
    pub kind: MatchKind,
}

/// Resolve `place` and `crop` to a modelled key
pub fn resolve_key(
    model_set: &ModelSet,
    place: &str,
    crop: &str,
    allow_fallback: bool,
) -> Result<MarketKey> {
    model_set
        .lookup(place, crop, MatchPolicy::from(allow_fallback))
        .map(|found| found.key)
}

fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

impl ModelSet {
    /// Find the key best matching `place` and `crop` under `policy`
    pub fn lookup(&self, place: &str, crop: &str, policy: MatchPolicy) -> Result<KeyMatch> {
        let place = place.trim();
        let crop = crop.trim();
        if place.is_empty() || crop.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "place and crop must not be blank".to_string(),
            ));
        }

        let place_lower = place.to_lowercase();
        let crop_lower = crop.to_lowercase();

        let candidates: Vec<(&MarketKey, String, String)> = self
            .keys()
            .map(|key| (key, key.commodity.to_lowercase(), key.market.to_lowercase()))
            .collect();

        if let Some((key, _, _)) = candidates
            .iter()
            .find(|(_, commodity, market)| *commodity == crop_lower && *market == place_lower)
        {
            return Ok(KeyMatch {
                key: (*key).clone(),
                kind: MatchKind::Exact,
            });
        }

        if let Some((key, _, _)) = candidates.iter().find(|(_, commodity, market)| {
            overlaps(commodity, &crop_lower) && overlaps(market, &place_lower)
        }) {
            return Ok(KeyMatch {
                key: (*key).clone(),
                kind: MatchKind::Partial,
            });
        }

        if policy == MatchPolicy::AllowFallback {
            if let Some(key) = self.keys().next() {
                warn!(place, crop, fallback = %key, "no market data matched, using fallback key");
                return Ok(KeyMatch {
                    key: key.clone(),
                    kind: MatchKind::Fallback,
                });
            }
        }

        Err(ForecastError::NotFound(MarketKey::new(crop, place)))
    }
}
