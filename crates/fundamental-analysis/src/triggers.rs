//! Conditions that would invalidate a stock thesis if they appeared or
//! persisted.

use analysis_core::{FundamentalsRecord, RiskTolerance};
use market_regime_detector::MarketRegime;

pub const NO_TRIGGERS: &str = "No immediate thesis invalidation signals detected";

/// Thesis invalidation triggers, in a fixed order. Never empty: a single
/// [`NO_TRIGGERS`] line is returned when nothing fires.
pub fn thesis_triggers(
    fund: &FundamentalsRecord,
    score: u8,
    regime: Option<MarketRegime>,
    tolerance: Option<RiskTolerance>,
) -> Vec<String> {
    let mut triggers: Vec<&str> = Vec::new();

    // Growth
    if fund.revenue_growth.map_or(false, |g| g < 0.08) {
        triggers.push("Revenue growth weakens below 8%");
    }
    if fund.eps_growth.map_or(false, |g| g < 0.10) {
        triggers.push("Earnings growth falls below 10%");
    }

    // Balance sheet
    if fund.debt_equity.map_or(false, |d| d > 1.5) {
        triggers.push("Debt-to-equity rises beyond comfortable levels");
    }
    if fund.interest_cover.map_or(false, |c| c < 2.0) {
        triggers.push("Interest coverage weakens below 2x");
    }

    // Returns and margins
    if fund.roce.map_or(false, |r| r < 0.12) {
        triggers.push("Return on capital drops below 12%");
    }
    if fund.net_margin.map_or(false, |m| m < 0.08) {
        triggers.push("Net profit margin compresses below 8%");
    }

    if fund.pe.map_or(false, |pe| pe > 40.0) {
        triggers.push("Valuation expands beyond reasonable PE levels");
    }

    if score < 50 {
        triggers.push("Overall stock score deteriorates below 50");
    }

    if regime.map_or(false, |r| r.is_defensive()) {
        triggers.push("Market regime turns risk-off or bearish");
    }

    if tolerance == Some(RiskTolerance::Conservative) && fund.pe.map_or(false, |pe| pe > 30.0) {
        triggers.push("Valuation exceeds conservative comfort zone");
    }

    if triggers.is_empty() {
        triggers.push(NO_TRIGGERS);
    }

    triggers.into_iter().map(String::from).collect()
}
