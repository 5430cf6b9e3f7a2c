use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the current price sits relative to fair value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuationZone {
    Attractive,
    Reasonable,
    Expensive,
}

impl ValuationZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationZone::Attractive => "Attractive",
            ValuationZone::Reasonable => "Reasonable",
            ValuationZone::Expensive => "Expensive",
        }
    }
}

impl fmt::Display for ValuationZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PE-based fair value. `upside_pct` and `zone` are only present together
/// with a usable price, and all three are absent when earnings are unusable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FairValueEstimate {
    pub fair_value: Option<f64>,
    pub upside_pct: Option<f64>,
    pub zone: Option<ValuationZone>,
}

impl FairValueEstimate {
    pub fn is_empty(&self) -> bool {
        self.fair_value.is_none()
    }
}

/// Price at or below this fraction of fair value is Attractive
const ATTRACTIVE_DISCOUNT: f64 = 0.85;

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Assumed sustainable multiple, capped at 25 for already-rich stocks.
pub fn fair_pe(pe: f64) -> f64 {
    if pe <= 15.0 {
        18.0
    } else if pe <= 25.0 {
        22.0
    } else {
        25.0
    }
}

pub fn estimate_fair_value(eps: Option<f64>, pe: Option<f64>, price: Option<f64>) -> FairValueEstimate {
    let (eps, pe) = match (finite(eps), finite(pe)) {
        (Some(eps), Some(pe)) if eps > 0.0 => (eps, pe),
        _ => return FairValueEstimate::default(),
    };

    let fair_value = round_to(eps * fair_pe(pe), 2);

    let price = match finite(price) {
        Some(p) if p > 0.0 => p,
        _ => {
            return FairValueEstimate {
                fair_value: Some(fair_value),
                ..FairValueEstimate::default()
            }
        }
    };

    let upside_pct = round_to((fair_value - price) / price * 100.0, 1);
    let zone = if price <= ATTRACTIVE_DISCOUNT * fair_value {
        ValuationZone::Attractive
    } else if price <= fair_value {
        ValuationZone::Reasonable
    } else {
        ValuationZone::Expensive
    };

    FairValueEstimate {
        fair_value: Some(fair_value),
        upside_pct: Some(upside_pct),
        zone: Some(zone),
    }
}
