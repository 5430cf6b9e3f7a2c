use analysis_core::ConfidenceLabel;
use market_regime_detector::MarketRegime;

use crate::models::*;

/// Risk score at which a rebalance is due
const REBALANCE_RISK_SCORE: u8 = 60;
/// Number of structural warnings at which a rebalance is due
const REBALANCE_WARNING_COUNT: usize = 2;

/// Decide whether the portfolio needs rebalancing now, monitoring, or nothing.
///
/// Structural problems escalate straight to a rebalance; a deteriorating
/// market or low confidence only asks for monitoring.
pub fn rebalancing_signal(
    result: &PortfolioResult,
    regime: MarketRegime,
    confidence: ConfidenceLabel,
) -> RebalanceSignal {
    let mut action = RebalanceAction::NoAction;
    let mut reasons = Vec::new();

    if result.risk_score >= REBALANCE_RISK_SCORE {
        action = RebalanceAction::RebalanceNow;
        reasons.push("Portfolio risk score is elevated.".to_string());
    }

    if result.warnings.len() >= REBALANCE_WARNING_COUNT {
        action = RebalanceAction::RebalanceNow;
        reasons.push("Multiple portfolio-level warnings detected.".to_string());
    }

    if regime.is_defensive() || regime == MarketRegime::HighVolatility {
        if action != RebalanceAction::RebalanceNow {
            action = RebalanceAction::Monitor;
        }
        reasons.push("Market regime has turned defensive.".to_string());
    }

    if confidence == ConfidenceLabel::Low {
        if action == RebalanceAction::NoAction {
            action = RebalanceAction::Monitor;
        }
        reasons.push("Low confidence band suggests caution.".to_string());
    }

    if reasons.is_empty() {
        reasons.push("Portfolio remains aligned with risk and market conditions.".to_string());
    }

    RebalanceSignal { action, reasons }
}
