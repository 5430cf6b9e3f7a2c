use analysis_core::{
    AnalysisError, FundamentalsRecord, NewsSummary, Recommendation, RiskTolerance, ScoreResult,
    SentimentBias,
};
use sentiment_analysis::{ReportScanner, DEFAULT_REPORT_RISK_KEYWORDS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::flags::{detect_profile_mismatch, detect_red_flags, ProfileMismatch, RedFlag};

/// Starting point before any adjustment
pub const BASE_SCORE: i32 = 50;
/// Largest configurable bonus, penalty or cap: one full score range
pub const MAX_WEIGHT: i32 = 100;

/// Cut-points and penalty weights for the additive scorer.
///
/// The per-metric rule table is fixed; this carries the knobs that sit on
/// top of it. Deserialised configs fill missing fields from `Default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub buy_threshold: u8,
    pub hold_threshold: u8,
    pub red_flag_penalty: i32,
    pub red_flag_penalty_cap: i32,
    pub mismatch_penalty: i32,
    pub mismatch_penalty_cap: i32,
    pub positive_news_bonus: i32,
    pub negative_news_penalty: i32,
    pub report_risk_penalty: i32,
    pub report_risk_keywords: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            buy_threshold: 70,
            hold_threshold: 50,
            red_flag_penalty: 5,
            red_flag_penalty_cap: 15,
            mismatch_penalty: 3,
            mismatch_penalty_cap: 10,
            positive_news_bonus: 3,
            negative_news_penalty: 4,
            report_risk_penalty: 4,
            report_risk_keywords: DEFAULT_REPORT_RISK_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.buy_threshold > 100 || self.hold_threshold > 100 {
            return Err(AnalysisError::invalid_input(
                "thresholds",
                "cut-points must lie within 0..=100",
            ));
        }
        if self.buy_threshold < self.hold_threshold {
            return Err(AnalysisError::invalid_input(
                "buy_threshold",
                format!(
                    "BUY cut-point {} is below HOLD cut-point {}",
                    self.buy_threshold, self.hold_threshold
                ),
            ));
        }

        let weights = [
            ("red_flag_penalty", self.red_flag_penalty),
            ("red_flag_penalty_cap", self.red_flag_penalty_cap),
            ("mismatch_penalty", self.mismatch_penalty),
            ("mismatch_penalty_cap", self.mismatch_penalty_cap),
            ("positive_news_bonus", self.positive_news_bonus),
            ("negative_news_penalty", self.negative_news_penalty),
            ("report_risk_penalty", self.report_risk_penalty),
        ];
        for (field, value) in weights {
            if !(0..=MAX_WEIGHT).contains(&value) {
                return Err(AnalysisError::invalid_input(
                    field,
                    format!("must lie within 0..={}, got {}", MAX_WEIGHT, value),
                ));
            }
        }
        Ok(())
    }

    pub fn recommendation_for(&self, score: u8) -> Recommendation {
        if score >= self.buy_threshold {
            Recommendation::Buy
        } else if score >= self.hold_threshold {
            Recommendation::Hold
        } else {
            Recommendation::Avoid
        }
    }

    pub fn report_scanner(&self) -> ReportScanner {
        ReportScanner::with_keywords(self.report_risk_keywords.iter().cloned())
    }
}

/// Score plus the detector output that fed it, so callers can band
/// confidence without re-running the detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub result: ScoreResult,
    pub red_flags: Vec<RedFlag>,
    pub mismatches: Vec<ProfileMismatch>,
    pub report_risk_hits: Vec<String>,
}

/// Fixed per-metric rules, in evaluation order
fn metric_signals(fund: &FundamentalsRecord) -> Vec<(&'static str, i32)> {
    let mut signals: Vec<(&'static str, i32)> = Vec::new();

    if let Some(pe) = fund.pe {
        if pe > 0.0 && pe <= 25.0 {
            signals.push(("Reasonable valuation", 4));
        } else if pe > 40.0 {
            signals.push(("Expensive valuation", -7));
        }
    }

    if let Some(roe) = fund.roe {
        if roe >= 0.18 {
            signals.push(("Strong return on equity", 8));
        } else if roe < 0.10 {
            signals.push(("Weak return on equity", -6));
        }
    }

    if let Some(de) = fund.debt_equity {
        if de <= 1.0 {
            signals.push(("Low leverage", 6));
        } else if de > 2.0 {
            signals.push(("High leverage risk", -8));
        }
    }

    if let Some(margin) = fund.net_margin {
        if margin >= 0.15 {
            signals.push(("Healthy net margins", 3));
        } else if margin < 0.05 {
            signals.push(("Thin net margins", -5));
        }
    }

    if let Some(growth) = fund.revenue_growth {
        if growth >= 0.10 {
            signals.push(("Healthy revenue growth", 5));
        } else if growth < 0.0 {
            signals.push(("Revenue contraction", -6));
        }
    }

    if let Some(growth) = fund.eps_growth {
        if growth >= 0.10 {
            signals.push(("Strong earnings growth", 5));
        } else if growth < 0.0 {
            signals.push(("Earnings decline", -6));
        }
    }

    if let Some(cover) = fund.interest_cover {
        if cover >= 3.0 {
            signals.push(("Comfortable interest coverage", 4));
        } else if cover < 1.5 {
            signals.push(("Debt servicing risk", -7));
        }
    }

    signals
}

/// Additive score over already-normalised fundamentals.
///
/// Reasons are appended in the order adjustments are applied: metric rules,
/// news, report text, red flags, profile mismatches.
pub fn score_stock(
    fund: &FundamentalsRecord,
    news: Option<&NewsSummary>,
    report_text: Option<&str>,
    tolerance: RiskTolerance,
    config: &ScoringConfig,
    scanner: &ReportScanner,
) -> ScoreBreakdown {
    let mut score = BASE_SCORE;
    let mut reasons: Vec<String> = Vec::new();

    for (reason, delta) in metric_signals(fund) {
        debug!("Metric rule {:+}: {}", delta, reason);
        score += delta;
        reasons.push(reason.to_string());
    }

    if let Some(summary) = news {
        match summary.overall {
            SentimentBias::Positive => {
                score += config.positive_news_bonus;
                reasons.push("Positive news sentiment".to_string());
            }
            SentimentBias::Negative => {
                score -= config.negative_news_penalty;
                reasons.push("Negative news sentiment".to_string());
            }
            SentimentBias::Neutral => {}
        }
    }

    let report_risk_hits = report_text
        .map(|text| scanner.risk_hits(text))
        .unwrap_or_default();
    if !report_risk_hits.is_empty() {
        score -= config.report_risk_penalty;
        reasons.push("Risk disclosures noted in report text".to_string());
    }

    let red_flags = detect_red_flags(fund);
    if !red_flags.is_empty() {
        let penalty = (config.red_flag_penalty * red_flags.len() as i32).min(config.red_flag_penalty_cap);
        score -= penalty;
        for flag in &red_flags {
            reasons.push(format!("Red flag: {}", flag));
        }
    }

    let mismatches = detect_profile_mismatch(fund, tolerance);
    if !mismatches.is_empty() {
        let penalty = (config.mismatch_penalty * mismatches.len() as i32).min(config.mismatch_penalty_cap);
        score -= penalty;
        for warning in &mismatches {
            reasons.push(format!("Profile mismatch: {}", warning));
        }
    }

    let score = score.clamp(0, 100) as u8;
    let recommendation = config.recommendation_for(score);

    debug!(
        "Scored {} ({}) with {} red flags and {} mismatches",
        score,
        recommendation,
        red_flags.len(),
        mismatches.len()
    );

    ScoreBreakdown {
        result: ScoreResult {
            score,
            recommendation,
            reasons,
        },
        red_flags,
        mismatches,
        report_risk_hits,
    }
}
