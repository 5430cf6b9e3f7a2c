//! Rule-based fundamental analysis: proxy normalisation, red flags, profile
//! suitability, additive scoring and PE-based fair value.

pub mod flags;
pub mod health;
pub mod normalizer;
pub mod scoring;
pub mod triggers;
pub mod valuation;

pub use flags::{detect_profile_mismatch, detect_red_flags, ProfileMismatch, RedFlag};
pub use health::{evaluate_metric, metric_health_table, MetricHealth};
pub use normalizer::apply_fallbacks;
pub use scoring::{score_stock, ScoreBreakdown, ScoringConfig};
pub use triggers::{thesis_triggers, NO_TRIGGERS};
pub use valuation::{estimate_fair_value, fair_pe, FairValueEstimate, ValuationZone};

use analysis_core::{AnalysisError, FundamentalsRecord, NewsSummary, RiskTolerance};
use sentiment_analysis::ReportScanner;

/// Scoring engine bound to one validated [`ScoringConfig`].
pub struct FundamentalAnalysisEngine {
    config: ScoringConfig,
    scanner: ReportScanner,
}

impl FundamentalAnalysisEngine {
    pub fn new() -> Self {
        let config = ScoringConfig::default();
        let scanner = config.report_scanner();
        Self { config, scanner }
    }

    pub fn with_config(config: ScoringConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let scanner = config.report_scanner();
        Ok(Self { config, scanner })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Fill proxy values for missing metrics.
    pub fn normalize(&self, raw: &FundamentalsRecord) -> FundamentalsRecord {
        apply_fallbacks(raw)
    }

    /// Normalise, then score. Rejects non-finite metric values.
    pub fn analyze(
        &self,
        raw: &FundamentalsRecord,
        news: Option<&NewsSummary>,
        report_text: Option<&str>,
        tolerance: RiskTolerance,
    ) -> Result<ScoreBreakdown, AnalysisError> {
        raw.validate()?;
        let fund = apply_fallbacks(raw);
        Ok(self.score_normalized(&fund, news, report_text, tolerance))
    }

    /// Score fundamentals that have already been through [`apply_fallbacks`].
    pub fn score_normalized(
        &self,
        fund: &FundamentalsRecord,
        news: Option<&NewsSummary>,
        report_text: Option<&str>,
        tolerance: RiskTolerance,
    ) -> ScoreBreakdown {
        score_stock(fund, news, report_text, tolerance, &self.config, &self.scanner)
    }
}

impl Default for FundamentalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{Metric, Recommendation};

    #[test]
    fn test_analyze_applies_fallbacks_before_scoring() {
        let engine = FundamentalAnalysisEngine::new();
        let raw = FundamentalsRecord::new()
            .with(Metric::Pe, 20.0)
            .with(Metric::Roe, 0.20)
            .with(Metric::DebtEquity, 0.5)
            .with(Metric::RevenueGrowth, 0.12)
            .with(Metric::EpsGrowth, 0.12);

        let out = engine.analyze(&raw, None, None, RiskTolerance::Moderate).unwrap();
        // Proxied interest cover of 4.0 earns the coverage bonus
        assert_eq!(out.result.score, 82);
        assert_eq!(out.result.recommendation, Recommendation::Buy);
        assert!(out.red_flags.is_empty());
    }

    #[test]
    fn test_analyze_rejects_non_finite_input() {
        let engine = FundamentalAnalysisEngine::new();
        let raw = FundamentalsRecord::new().with(Metric::Pe, f64::INFINITY);
        assert!(engine.analyze(&raw, None, None, RiskTolerance::Moderate).is_err());
    }

    #[test]
    fn test_with_config_validates() {
        let bad = ScoringConfig {
            buy_threshold: 30,
            ..ScoringConfig::default()
        };
        assert!(FundamentalAnalysisEngine::with_config(bad).is_err());

        let strict = ScoringConfig {
            buy_threshold: 90,
            ..ScoringConfig::default()
        };
        let engine = FundamentalAnalysisEngine::with_config(strict).unwrap();
        let raw = FundamentalsRecord::new()
            .with(Metric::Pe, 20.0)
            .with(Metric::Roe, 0.20)
            .with(Metric::DebtEquity, 0.5)
            .with(Metric::RevenueGrowth, 0.12)
            .with(Metric::EpsGrowth, 0.12);
        let out = engine.analyze(&raw, None, None, RiskTolerance::Moderate).unwrap();
        assert_eq!(out.result.recommendation, Recommendation::Hold);
    }
}
