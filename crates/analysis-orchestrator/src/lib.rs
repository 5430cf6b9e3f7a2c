//! Advisory pipeline: wires normalisation, scoring, valuation, confidence,
//! sizing and explanation into single-stock and portfolio advice.
//!
//! The free functions are the stable core contract. [`StockAdvisor`] and
//! [`review_portfolio`] run the full pipelines on top of them.

pub mod config;
pub mod explanation;
pub mod goal;
pub mod market_data;
pub mod plan;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use config::AdvisorConfig;
pub use explanation::{render_explanation, DISCLAIMER};
pub use goal::{recommend_for_goal, GoalCandidate, GoalRecommendation};
pub use market_data::{CacheTtls, DataProviders, MarketDataService, StockInputs, TtlCache};
pub use plan::{investment_plan, InvestmentPlan, PlanScope};

use analysis_core::{
    AllocationResult, AnalysisError, ConfidenceLabel, FundamentalsRecord, InvestorProfile, Metric,
    NewsSummary, PortfolioEntry, Recommendation, ScoreResult, StockInfo,
};
use confidence_calibrator::{conviction_label, ConfidenceCalibrator, ConvictionLabel};
use fundamental_analysis::{
    metric_health_table, thesis_triggers, FairValueEstimate, FundamentalAnalysisEngine, MetricHealth,
    ScoreBreakdown,
};
use market_regime_detector::MarketConditions;
use portfolio_manager::{
    adjust_for_market_regime, portfolio_action, portfolio_confidence, portfolio_risk_triggers,
    rebalancing_signal, sector_drawdown_stress, stress_test_portfolio, DrawdownStress,
    PortfolioAction, PortfolioAnalyzer, PortfolioResult, PortfolioStance, RebalanceSignal,
    ScenarioResult, StressScenario,
};
use position_sizer::{
    capital_deployment_plan, entry_timing, AllocationSizer, DeploymentPhase, EntrySignal,
};
use rust_decimal::Decimal;
use sentiment_analysis::SentimentAnalysisEngine;
use serde::Serialize;
use tracing::info;

/// Score a stock for an investor. Fails only on non-finite metric values.
pub fn evaluate(
    fundamentals: &FundamentalsRecord,
    news_summary: Option<&NewsSummary>,
    report_text: Option<&str>,
    profile: &InvestorProfile,
) -> Result<ScoreResult, AnalysisError> {
    FundamentalAnalysisEngine::new()
        .analyze(fundamentals, news_summary, report_text, profile.risk_tolerance)
        .map(|breakdown| breakdown.result)
}

pub fn estimate_fair_value(eps: Option<f64>, pe: Option<f64>, price: Option<f64>) -> FairValueEstimate {
    fundamental_analysis::estimate_fair_value(eps, pe, price)
}

pub fn confidence(score: u8, red_flag_count: usize, mismatch_count: usize) -> ConfidenceLabel {
    ConfidenceCalibrator::new().band(score, red_flag_count, mismatch_count)
}

/// Position size in a neutral market.
pub fn allocate(
    recommendation: Recommendation,
    score: u8,
    confidence: ConfidenceLabel,
    profile: &InvestorProfile,
    capital: Decimal,
) -> AllocationResult {
    AllocationSizer::default().allocate(
        recommendation,
        score,
        confidence,
        profile.risk_tolerance,
        capital,
        1.0,
    )
}

pub fn explain(
    stock: &str,
    score: u8,
    recommendation: Recommendation,
    reasons: &[String],
    profile: &InvestorProfile,
) -> String {
    render_explanation(
        stock,
        score,
        recommendation,
        reasons,
        profile.risk_tolerance,
        profile.time_horizon,
    )
}

pub fn analyze_portfolio(entries: &[PortfolioEntry], profile: &InvestorProfile) -> PortfolioResult {
    PortfolioAnalyzer::new().analyze(entries, profile.risk_tolerance)
}

/// Full single-stock advice
#[derive(Debug, Clone, Serialize)]
pub struct StockAdvice {
    pub stock: StockInfo,
    /// Fundamentals after proxy fallbacks
    pub fundamentals: FundamentalsRecord,
    pub news: Option<NewsSummary>,
    pub breakdown: ScoreBreakdown,
    pub confidence: ConfidenceLabel,
    pub conviction: ConvictionLabel,
    pub fair_value: FairValueEstimate,
    pub allocation: AllocationResult,
    pub deployment: Vec<DeploymentPhase>,
    pub entry: EntrySignal,
    pub thesis_triggers: Vec<String>,
    pub health: Vec<(Metric, Option<f64>, MetricHealth)>,
    pub explanation: String,
    pub plan: InvestmentPlan,
}

impl StockAdvice {
    pub fn score(&self) -> u8 {
        self.breakdown.result.score
    }

    pub fn recommendation(&self) -> Recommendation {
        self.breakdown.result.recommendation
    }

    /// e.g. `BUY (High Conviction)`
    pub fn headline(&self) -> String {
        self.conviction.headline(self.recommendation())
    }

    pub fn goal_candidate(&self) -> GoalCandidate {
        GoalCandidate {
            stock: self.stock.clone(),
            fundamentals: self.fundamentals,
            news: self.news,
            score: self.breakdown.result.clone(),
        }
    }
}

/// Runs the single-stock pipeline with one scoring and sizing setup.
pub struct StockAdvisor {
    engine: FundamentalAnalysisEngine,
    sizer: AllocationSizer,
    calibrator: ConfidenceCalibrator,
    sentiment: SentimentAnalysisEngine,
}

impl StockAdvisor {
    pub fn new() -> Self {
        Self {
            engine: FundamentalAnalysisEngine::new(),
            sizer: AllocationSizer::default(),
            calibrator: ConfidenceCalibrator::new(),
            sentiment: SentimentAnalysisEngine::new(),
        }
    }

    pub fn from_config(config: &AdvisorConfig) -> Result<Self, AnalysisError> {
        Ok(Self {
            engine: FundamentalAnalysisEngine::with_config(config.scoring.clone())?,
            ..Self::new()
        })
    }

    pub fn with_sizer(mut self, sizer: AllocationSizer) -> Self {
        self.sizer = sizer;
        self
    }

    /// Run the pipeline over already-fetched inputs.
    pub fn advise(
        &self,
        stock: &StockInfo,
        inputs: &StockInputs,
        profile: &InvestorProfile,
        market: &MarketConditions,
    ) -> Result<StockAdvice, AnalysisError> {
        let tolerance = profile.risk_tolerance;

        let news = if inputs.headlines.is_empty() {
            None
        } else {
            Some(self.sentiment.summarize(&inputs.headlines))
        };

        let breakdown = self.engine.analyze(
            &inputs.fundamentals,
            news.as_ref(),
            inputs.report_text.as_deref(),
            tolerance,
        )?;
        let fundamentals = self.engine.normalize(&inputs.fundamentals);

        let score = breakdown.result.score;
        let recommendation = breakdown.result.recommendation;

        let confidence = self
            .calibrator
            .band(score, breakdown.red_flags.len(), breakdown.mismatches.len());
        let conviction = conviction_label(recommendation, confidence, score);

        let fair_value = estimate_fair_value(inputs.trailing_eps, fundamentals.pe, inputs.price);

        let allocation = self.sizer.allocate(
            recommendation,
            score,
            confidence,
            tolerance,
            profile.capital,
            market.risk_multiplier,
        );
        let deployment = capital_deployment_plan(recommendation, confidence, allocation.amount);
        let entry = entry_timing(
            inputs.price,
            fair_value.fair_value,
            recommendation,
            market,
            confidence,
            tolerance,
        );

        let triggers = thesis_triggers(&fundamentals, score, Some(market.regime), Some(tolerance));
        let health = metric_health_table(&fundamentals);

        let explanation = render_explanation(
            &stock.symbol,
            score,
            recommendation,
            &breakdown.result.reasons,
            tolerance,
            profile.time_horizon,
        );
        let plan = investment_plan(
            recommendation,
            confidence,
            score,
            tolerance,
            profile.time_horizon,
            market,
            PlanScope::Stock,
        );

        info!(
            "Advice for {}: {} score {} ({}, {}), allocation {}%",
            stock.symbol,
            recommendation,
            score,
            confidence,
            market.regime.name(),
            allocation.percentage
        );

        Ok(StockAdvice {
            stock: stock.clone(),
            fundamentals,
            news,
            breakdown,
            confidence,
            conviction,
            fair_value,
            allocation,
            deployment,
            entry,
            thesis_triggers: triggers,
            health,
            explanation,
            plan,
        })
    }

    /// Fetch inputs through the data service, then advise.
    pub async fn advise_live(
        &self,
        data: &MarketDataService,
        stock: &StockInfo,
        profile: &InvestorProfile,
        market: &MarketConditions,
    ) -> Result<StockAdvice, AnalysisError> {
        let inputs = data.fetch_inputs(stock).await;
        self.advise(stock, &inputs, profile, market)
    }
}

impl Default for StockAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

/// Full portfolio-level review
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReview {
    pub result: PortfolioResult,
    pub action: PortfolioAction,
    pub stance: PortfolioStance,
    pub confidence: ConfidenceLabel,
    pub risk_triggers: Vec<String>,
    pub rebalance: RebalanceSignal,
    pub scenarios: Vec<ScenarioResult>,
    pub drawdown: DrawdownStress,
    pub plan: InvestmentPlan,
}

/// Analyze a portfolio and layer market regime, stress and planning on top.
///
/// The plan treats the portfolio action as the recommendation and
/// `100 - risk_score` as its score.
pub fn review_portfolio(
    entries: &[PortfolioEntry],
    profile: &InvestorProfile,
    market: &MarketConditions,
) -> PortfolioReview {
    let result = analyze_portfolio(entries, profile);
    let action = portfolio_action(result.risk_score);
    let stance = adjust_for_market_regime(action, market.regime);
    let confidence = portfolio_confidence(result.risk_score, result.warnings.len());

    let risk_triggers = portfolio_risk_triggers(&result, market.regime);
    let rebalance = rebalancing_signal(&result, market.regime, confidence);
    let scenarios = StressScenario::ALL
        .iter()
        .map(|&scenario| stress_test_portfolio(&result, scenario))
        .collect();
    let drawdown = sector_drawdown_stress(entries, Some(market.regime));

    let recommendation = match action {
        PortfolioAction::Buy => Recommendation::Buy,
        PortfolioAction::Hold => Recommendation::Hold,
        PortfolioAction::Reduce => Recommendation::Avoid,
    };
    let plan = investment_plan(
        recommendation,
        confidence,
        100 - result.risk_score.min(100),
        profile.risk_tolerance,
        profile.time_horizon,
        market,
        PlanScope::Portfolio,
    );

    info!(
        "Portfolio review: risk {} -> {} ({})",
        result.risk_score,
        stance.as_str(),
        rebalance.action.as_str()
    );

    PortfolioReview {
        result,
        action,
        stance,
        confidence,
        risk_triggers,
        rebalance,
        scenarios,
        drawdown,
        plan,
    }
}
