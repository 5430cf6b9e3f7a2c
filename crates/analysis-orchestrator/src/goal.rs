//! Goal-based stock selection: re-rank scored candidates for a specific
//! horizon and risk tolerance, then split the capital equally.

use analysis_core::{
    FundamentalsRecord, InvestorProfile, NewsSummary, Recommendation, RiskTolerance, ScoreResult,
    SentimentBias, StockInfo, TimeHorizon,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum adjusted score for a stock to be suggested
pub const MIN_GOAL_SCORE: i32 = 65;
/// Reasons carried over from the base score
const MAX_REASONS: usize = 3;

/// A scored stock eligible for goal ranking
#[derive(Debug, Clone)]
pub struct GoalCandidate {
    pub stock: StockInfo,
    /// Normalized fundamentals the base score was computed from
    pub fundamentals: FundamentalsRecord,
    pub news: Option<NewsSummary>,
    pub score: ScoreResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecommendation {
    pub stock: String,
    pub company: String,
    pub sector: String,
    pub goal_score: u8,
    pub base_score: u8,
    pub recommendation: Recommendation,
    pub reasons: Vec<String>,
    pub allocation_pct: f64,
    pub allocation_amount: Decimal,
}

/// Number of positions the capital can reasonably support
pub fn max_positions(capital: Decimal) -> usize {
    if capital < Decimal::from(100_000) {
        3
    } else if capital < Decimal::from(300_000) {
        5
    } else {
        7
    }
}

fn exceeds(value: Option<f64>, threshold: f64) -> bool {
    value.map_or(false, |v| v > threshold)
}

fn at_least(value: Option<f64>, threshold: f64) -> bool {
    value.map_or(false, |v| v >= threshold)
}

/// Base score adjusted for the investor's horizon and risk tolerance.
pub fn goal_score(candidate: &GoalCandidate, tolerance: RiskTolerance, horizon: TimeHorizon) -> u8 {
    let fund = &candidate.fundamentals;
    let mut score = i32::from(candidate.score.score);

    match horizon {
        TimeHorizon::Short => {
            if exceeds(fund.pe, 30.0) {
                score -= 10;
            }
            if candidate.news.map_or(false, |n| n.overall == SentimentBias::Negative) {
                score -= 8;
            }
        }
        TimeHorizon::Medium => {
            if at_least(fund.roe, 0.15) {
                score += 6;
            }
            if exceeds(fund.debt_equity, 1.5) {
                score -= 6;
            }
        }
        TimeHorizon::Long => {
            if at_least(fund.roe, 0.18) {
                score += 8;
            }
            if at_least(fund.revenue_growth, 0.12) {
                score += 6;
            }
        }
    }

    match tolerance {
        RiskTolerance::Conservative if exceeds(fund.debt_equity, 1.0) => score -= 10,
        RiskTolerance::Aggressive if at_least(fund.revenue_growth, 0.15) => score += 5,
        _ => {}
    }

    score.clamp(0, 100) as u8
}

/// Rank candidates for the investor's goal.
///
/// Keeps those with a goal score of at least 65, best first (ties keep input
/// order), limited by [`max_positions`], each with an equal share of capital.
pub fn recommend_for_goal(candidates: &[GoalCandidate], profile: &InvestorProfile) -> Vec<GoalRecommendation> {
    let mut ranked: Vec<(u8, &GoalCandidate)> = candidates
        .iter()
        .map(|c| (goal_score(c, profile.risk_tolerance, profile.time_horizon), c))
        .filter(|(score, _)| i32::from(*score) >= MIN_GOAL_SCORE)
        .collect();

    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.truncate(max_positions(profile.capital));

    if ranked.is_empty() {
        debug!("No candidates met the goal threshold out of {}", candidates.len());
        return Vec::new();
    }

    let allocation_pct = (100.0 / ranked.len() as f64 * 10.0).round() / 10.0;
    let allocation_amount = position_sizer::amount_for(profile.capital, allocation_pct);

    ranked
        .into_iter()
        .map(|(goal_score, c)| GoalRecommendation {
            stock: c.stock.symbol.clone(),
            company: c.stock.company.clone(),
            sector: c.stock.sector.clone(),
            goal_score,
            base_score: c.score.score,
            recommendation: c.score.recommendation,
            reasons: c.score.reasons.iter().take(MAX_REASONS).cloned().collect(),
            allocation_pct,
            allocation_amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::Metric;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn candidate(symbol: &str, score: u8, fundamentals: FundamentalsRecord) -> GoalCandidate {
        GoalCandidate {
            stock: StockInfo {
                symbol: symbol.to_string(),
                company: format!("{} Ltd", symbol),
                sector: "IT".to_string(),
            },
            fundamentals,
            news: None,
            score: ScoreResult {
                score,
                recommendation: Recommendation::Buy,
                reasons: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            },
        }
    }

    fn profile(tolerance: RiskTolerance, horizon: TimeHorizon, capital: Decimal) -> InvestorProfile {
        InvestorProfile::new(tolerance, horizon, capital).unwrap()
    }

    #[test]
    fn test_capital_limits_positions() {
        assert_eq!(max_positions(dec!(99999)), 3);
        assert_eq!(max_positions(dec!(100000)), 5);
        assert_eq!(max_positions(dec!(300000)), 7);
    }

    #[test]
    fn test_long_horizon_rewards_quality_growth() {
        let fund = FundamentalsRecord::new()
            .with(Metric::Roe, 0.20)
            .with(Metric::RevenueGrowth, 0.15);
        let c = candidate("TCS", 60, fund);

        assert_eq!(goal_score(&c, RiskTolerance::Moderate, TimeHorizon::Long), 74);
        assert_eq!(goal_score(&c, RiskTolerance::Aggressive, TimeHorizon::Long), 79);
        assert_eq!(goal_score(&c, RiskTolerance::Moderate, TimeHorizon::Medium), 66);
    }

    #[test]
    fn test_short_horizon_penalizes_expensive_and_negative_news() {
        let mut c = candidate("ZOMATO", 80, FundamentalsRecord::new().with(Metric::Pe, 45.0));
        c.news = Some(NewsSummary {
            positive: 0,
            neutral: 1,
            negative: 3,
            overall: SentimentBias::Negative,
        });
        assert_eq!(goal_score(&c, RiskTolerance::Moderate, TimeHorizon::Short), 62);
    }

    #[test]
    fn test_conservative_leverage_penalty() {
        let c = candidate("TATASTEEL", 72, FundamentalsRecord::new().with(Metric::DebtEquity, 1.2));
        assert_eq!(goal_score(&c, RiskTolerance::Conservative, TimeHorizon::Long), 62);
    }

    #[test]
    fn test_ranking_filters_and_splits_capital() {
        let candidates = vec![
            candidate("A", 70, FundamentalsRecord::new()),
            candidate("B", 90, FundamentalsRecord::new()),
            candidate("C", 64, FundamentalsRecord::new()),
            candidate("D", 80, FundamentalsRecord::new()),
            candidate("E", 75, FundamentalsRecord::new()),
        ];
        let picks = recommend_for_goal(
            &candidates,
            &profile(RiskTolerance::Moderate, TimeHorizon::Short, dec!(50000)),
        );

        let symbols: Vec<&str> = picks.iter().map(|p| p.stock.as_str()).collect();
        assert_eq!(symbols, vec!["B", "D", "E"]);
        assert_relative_eq!(picks[0].allocation_pct, 33.3);
        assert_eq!(picks[0].allocation_amount, dec!(16650));
        assert_eq!(picks[0].reasons.len(), 3);
    }

    #[test]
    fn test_no_candidates_qualify() {
        let candidates = vec![candidate("A", 40, FundamentalsRecord::new())];
        let picks = recommend_for_goal(
            &candidates,
            &profile(RiskTolerance::Moderate, TimeHorizon::Medium, dec!(500000)),
        );
        assert!(picks.is_empty());
    }
}
