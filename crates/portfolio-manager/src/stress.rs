//! Portfolio stress testing.
//!
//! Two views: named macro scenarios shift the portfolio risk score
//! (higher is worse), and sector-beta drawdowns estimate capital loss.

use analysis_core::PortfolioEntry;
use market_regime_detector::MarketRegime;

use crate::models::*;

/// Index correction used for the mild drawdown estimate
const CORRECTION_IMPACT: f64 = 0.10;
/// Index fall used for the bear-market drawdown estimate
const BEAR_IMPACT: f64 = 0.25;

/// Heuristic sensitivity of a sector to an index move
pub fn sector_beta(sector: &str) -> f64 {
    match sector {
        "IT" => 1.10,
        "Finance" => 1.00,
        "Energy" => 0.90,
        "FMCG" => 0.60,
        "Pharma" => 0.70,
        "Metals" => 1.20,
        "Auto" => 1.10,
        "Infrastructure" => 1.15,
        _ => 1.00,
    }
}

/// Apply a named scenario to a portfolio risk score.
pub fn stress_test_portfolio(result: &PortfolioResult, scenario: StressScenario) -> ScenarioResult {
    let (impact, bias, warning) = match scenario {
        StressScenario::MarketCrash => (
            25,
            ActionBias::Reduce,
            "Sharp market drawdown impacts all equities.",
        ),
        StressScenario::InterestRateHike => (
            15,
            ActionBias::Hold,
            "Rate-sensitive sectors may underperform.",
        ),
        StressScenario::CommoditySpike => (
            10,
            ActionBias::SelectiveBuy,
            "Input cost pressure may compress margins.",
        ),
        StressScenario::GlobalRiskOff => (
            20,
            ActionBias::Reduce,
            "Global risk-off may compress valuation multiples.",
        ),
        StressScenario::BullRun => (
            -10,
            ActionBias::Buy,
            "Momentum-driven upside possible across equities.",
        ),
    };

    let stressed = (i32::from(result.risk_score) + impact).clamp(0, 100) as u8;

    ScenarioResult {
        scenario,
        stressed_score: stressed,
        action_bias: bias,
        warnings: vec![warning.to_string()],
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Weighted sector-beta drawdowns under a correction and a bear market.
/// Defensive regimes escalate the rating by one notch.
pub fn sector_drawdown_stress(entries: &[PortfolioEntry], regime: Option<MarketRegime>) -> DrawdownStress {
    if entries.is_empty() {
        return DrawdownStress {
            correction_drawdown_pct: 0.0,
            bear_drawdown_pct: 0.0,
            rating: StressRating::Unknown,
        };
    }

    let (correction, bear) = entries
        .iter()
        .filter(|e| e.allocation_pct.is_finite())
        .fold((0.0, 0.0), |(c, b), e| {
            let exposure = e.allocation_pct / 100.0 * sector_beta(&e.sector);
            (c + exposure * CORRECTION_IMPACT, b + exposure * BEAR_IMPACT)
        });

    let correction_pct = round1(correction * 100.0);
    let bear_pct = round1(bear * 100.0);

    let mut rating = if bear_pct < 15.0 {
        StressRating::Low
    } else if bear_pct < 25.0 {
        StressRating::Medium
    } else {
        StressRating::High
    };
    if regime.map_or(false, |r| r.is_defensive()) {
        rating = rating.escalate();
    }

    DrawdownStress {
        correction_drawdown_pct: correction_pct,
        bear_drawdown_pct: bear_pct,
        rating,
    }
}
