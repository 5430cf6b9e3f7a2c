//! Entry timing from margin of safety, adjusted for market regime,
//! volatility, risk tolerance, confidence and the base recommendation.

use analysis_core::{ConfidenceLabel, Recommendation, RiskTolerance};
use market_regime_detector::{MarketConditions, VolatilityLevel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Margin of safety a Conservative investor needs before an outright buy
const CONSERVATIVE_MIN_MOS: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryAction {
    BuyAggressively,
    Buy,
    Accumulate,
    AccumulateSlowly,
    AccumulateInPhases,
    WaitForBetterPrice,
    Wait,
    AvoidWait,
    InsufficientData,
}

impl EntryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryAction::BuyAggressively => "BUY AGGRESSIVELY",
            EntryAction::Buy => "BUY",
            EntryAction::Accumulate => "ACCUMULATE",
            EntryAction::AccumulateSlowly => "ACCUMULATE SLOWLY",
            EntryAction::AccumulateInPhases => "ACCUMULATE IN PHASES",
            EntryAction::WaitForBetterPrice => "WAIT FOR BETTER PRICE",
            EntryAction::Wait => "WAIT / AVOID",
            EntryAction::AvoidWait => "AVOID / WAIT",
            EntryAction::InsufficientData => "INSUFFICIENT DATA",
        }
    }

    fn is_buy(&self) -> bool {
        matches!(self, EntryAction::BuyAggressively | EntryAction::Buy)
    }
}

impl fmt::Display for EntryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySignal {
    /// (fair − price) / fair × 100, 2 dp
    pub margin_of_safety: Option<f64>,
    pub action: EntryAction,
    pub reason: String,
}

pub fn margin_of_safety(price: f64, fair_value: f64) -> f64 {
    ((fair_value - price) / fair_value * 100.0 * 100.0).round() / 100.0
}

pub fn entry_timing(
    price: Option<f64>,
    fair_value: Option<f64>,
    recommendation: Recommendation,
    market: &MarketConditions,
    confidence: ConfidenceLabel,
    tolerance: RiskTolerance,
) -> EntrySignal {
    let (price, fair_value) = match (price, fair_value) {
        (Some(p), Some(f)) if p.is_finite() && f.is_finite() && f > 0.0 => (p, f),
        _ => {
            return EntrySignal {
                margin_of_safety: None,
                action: EntryAction::InsufficientData,
                reason: "Current price or fair value is unavailable".to_string(),
            }
        }
    };

    let mos = margin_of_safety(price, fair_value);
    let mut notes: Vec<&str> = Vec::new();

    let mut action = if mos >= 30.0 {
        notes.push("Very high margin of safety");
        EntryAction::BuyAggressively
    } else if mos >= 20.0 {
        notes.push("High margin of safety");
        EntryAction::Buy
    } else if mos >= 10.0 {
        notes.push("Moderate margin of safety");
        EntryAction::Accumulate
    } else if mos >= 0.0 {
        notes.push("Limited margin of safety");
        EntryAction::AccumulateSlowly
    } else {
        notes.push("Stock trading above fair value");
        EntryAction::Wait
    };

    if market.regime.is_defensive() {
        if action.is_buy() {
            action = EntryAction::AccumulateInPhases;
            notes.push("Defensive market regime");
        }
    } else if market.regime.is_risk_on() {
        notes.push("Supportive market regime");
    }

    if market.volatility == VolatilityLevel::High && action.is_buy() {
        action = EntryAction::AccumulateInPhases;
        notes.push("High volatility environment");
    }

    match tolerance {
        RiskTolerance::Conservative if action.is_buy() && mos < CONSERVATIVE_MIN_MOS => {
            action = EntryAction::WaitForBetterPrice;
            notes.push("Conservative profile requires higher safety margin");
        }
        RiskTolerance::Aggressive if mos >= 10.0 => {
            notes.push("Aggressive profile allows earlier entry");
        }
        _ => {}
    }

    if confidence == ConfidenceLabel::Low && action.is_buy() {
        action = EntryAction::AccumulateSlowly;
        notes.push("Low confidence suggests staggered entry");
    }
    if confidence == ConfidenceLabel::High && mos >= 20.0 {
        notes.push("High conviction supports stronger entry");
    }

    if recommendation == Recommendation::Avoid {
        action = EntryAction::AvoidWait;
        notes.push("Base recommendation is AVOID");
    }

    EntrySignal {
        margin_of_safety: Some(mos),
        action,
        reason: format!(
            "MoS: {}% | Market: {} | Volatility: {} | {}",
            mos,
            market.regime.name(),
            market.volatility.as_str(),
            notes.join("; ")
        ),
    }
}
