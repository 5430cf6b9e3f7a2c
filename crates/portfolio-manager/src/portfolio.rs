use analysis_core::{ConfidenceLabel, PortfolioEntry, RiskTolerance, StockInfo};
use market_regime_detector::MarketRegime;
use tracing::{debug, warn};

use crate::models::*;

pub const EMPTY_PORTFOLIO_SCORE: u8 = 100;

/// Rule-based portfolio risk analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct PortfolioAnalyzer;

impl PortfolioAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score allocation sanity, sector concentration and profile fit.
    ///
    /// Sectors are reported in first-seen order.
    pub fn analyze(&self, entries: &[PortfolioEntry], tolerance: RiskTolerance) -> PortfolioResult {
        if entries.is_empty() {
            return PortfolioResult {
                risk_score: EMPTY_PORTFOLIO_SCORE,
                warnings: vec!["Empty portfolio".to_string()],
                insights: vec!["No stocks selected".to_string()],
            };
        }

        let mut risk_score: i32 = 0;
        let mut warnings = Vec::new();
        let mut insights = Vec::new();

        let mut total = 0.0;
        let mut sectors: Vec<(&str, f64)> = Vec::new();
        for entry in entries {
            let pct = if entry.allocation_pct.is_finite() {
                entry.allocation_pct
            } else {
                warn!("Ignoring non-finite allocation for {}", entry.stock);
                0.0
            };
            total += pct;

            match sectors.iter_mut().find(|(s, _)| *s == entry.sector) {
                Some((_, sum)) => *sum += pct,
                None => sectors.push((entry.sector.as_str(), pct)),
            }
        }

        if total > 100.0 {
            warnings.push("Total allocation exceeds 100%".to_string());
            risk_score += 10;
        }
        if total < 50.0 {
            warnings.push("Very low capital deployment".to_string());
            risk_score += 5;
        }

        for (sector, alloc) in &sectors {
            if *alloc > 50.0 {
                warnings.push(format!("High concentration in {} sector ({:.1}%)", sector, alloc));
                risk_score += 15;
            } else if *alloc > 35.0 {
                warnings.push(format!("Moderate concentration in {} sector ({:.1}%)", sector, alloc));
                risk_score += 8;
            }
        }

        match tolerance {
            RiskTolerance::Conservative if total > 65.0 => {
                warnings.push("Equity exposure high for conservative profile".to_string());
                risk_score += 15;
            }
            RiskTolerance::Aggressive if total < 50.0 => {
                insights.push("Aggressive profile with low equity exposure".to_string());
            }
            _ => {}
        }

        let risk_score = risk_score.clamp(0, 100) as u8;

        insights.push(
            if risk_score <= 25 {
                "Portfolio risk is well controlled"
            } else if risk_score <= 50 {
                "Portfolio risk is moderate and manageable"
            } else {
                "Portfolio risk is elevated and needs attention"
            }
            .to_string(),
        );

        debug!(
            "Portfolio of {} entries ({:.1}% deployed): risk {} with {} warnings",
            entries.len(),
            total,
            risk_score,
            warnings.len()
        );

        PortfolioResult {
            risk_score,
            warnings,
            insights,
        }
    }
}

/// Equal weight across the selected stocks, 2 dp.
pub fn build_equal_weight_portfolio(selected: &[StockInfo]) -> Vec<PortfolioEntry> {
    if selected.is_empty() {
        return Vec::new();
    }

    let weight = (100.0 / selected.len() as f64 * 100.0).round() / 100.0;
    selected
        .iter()
        .map(|s| PortfolioEntry::new(s.symbol.clone(), s.sector.clone(), weight))
        .collect()
}

pub fn portfolio_action(risk_score: u8) -> PortfolioAction {
    match risk_score {
        0..=30 => PortfolioAction::Buy,
        31..=55 => PortfolioAction::Hold,
        _ => PortfolioAction::Reduce,
    }
}

pub fn portfolio_confidence(risk_score: u8, warning_count: usize) -> ConfidenceLabel {
    if risk_score <= 30 && warning_count == 0 {
        ConfidenceLabel::High
    } else if risk_score <= 55 && warning_count <= 2 {
        ConfidenceLabel::Medium
    } else {
        ConfidenceLabel::Low
    }
}

pub fn adjust_for_market_regime(action: PortfolioAction, regime: MarketRegime) -> PortfolioStance {
    match action {
        PortfolioAction::Buy if regime.is_defensive() => PortfolioStance::HoldSelectiveBuy,
        PortfolioAction::Hold if regime.is_risk_on() => PortfolioStance::BuyOnDips,
        other => PortfolioStance::Action(other),
    }
}

pub fn portfolio_risk_triggers(result: &PortfolioResult, regime: MarketRegime) -> Vec<String> {
    let mut triggers = Vec::new();

    if result.risk_score >= 60 {
        triggers.push("Portfolio risk score is elevated".to_string());
    }
    triggers.extend(result.warnings.iter().cloned());
    if regime.is_defensive() {
        triggers.push("Market regime has turned defensive".to_string());
    }

    if triggers.is_empty() {
        triggers.push("No major portfolio-level downside risks detected".to_string());
    }
    triggers
}
