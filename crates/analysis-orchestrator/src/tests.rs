use super::*;
use analysis_core::{
    FetchError, FundamentalsProvider, NewsHeadline, NewsProvider, PriceProvider, ReportTextProvider,
    RiskTolerance, StockUniverseProvider, TimeHorizon,
};
use approx::assert_relative_eq;
use async_trait::async_trait;
use chrono::Duration;
use market_regime_detector::{IndexTrend, MarketRegimeDetector, VolatilityLevel};
use position_sizer::EntryAction;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

fn profile(tolerance: RiskTolerance) -> InvestorProfile {
    InvestorProfile::new(tolerance, TimeHorizon::Long, dec!(100000)).unwrap()
}

fn quality_fundamentals() -> FundamentalsRecord {
    FundamentalsRecord::new()
        .with(Metric::Pe, 20.0)
        .with(Metric::Roe, 0.20)
        .with(Metric::DebtEquity, 0.5)
        .with(Metric::RevenueGrowth, 0.12)
        .with(Metric::EpsGrowth, 0.12)
}

fn tcs() -> StockInfo {
    StockInfo {
        symbol: "TCS".to_string(),
        company: "Tata Consultancy Services".to_string(),
        sector: "IT".to_string(),
    }
}

// Core contract properties

#[test]
fn test_all_absent_fundamentals_hold_at_fifty() {
    let result = evaluate(&FundamentalsRecord::new(), None, None, &profile(RiskTolerance::Moderate)).unwrap();
    assert_eq!(result.score, 50);
    assert_eq!(result.recommendation, Recommendation::Hold);
    assert!(result.reasons.is_empty());
}

#[test]
fn test_score_monotone_in_roe() {
    let p = profile(RiskTolerance::Moderate);
    let mut previous = 0;
    for roe in [-0.10, 0.0, 0.05, 0.10, 0.14, 0.18, 0.25, 0.45, 0.60] {
        let fund = quality_fundamentals().with(Metric::Roe, roe);
        let score = evaluate(&fund, None, None, &p).unwrap().score;
        assert!(score >= previous, "ROE {} scored {} after {}", roe, score, previous);
        previous = score;
    }
}

#[test]
fn test_fair_value_jointly_absent() {
    for (eps, pe) in [(None, Some(20.0)), (Some(100.0), None), (Some(0.0), Some(20.0)), (Some(-5.0), Some(20.0))] {
        let estimate = estimate_fair_value(eps, pe, Some(1500.0));
        assert!(estimate.fair_value.is_none());
        assert!(estimate.upside_pct.is_none());
        assert!(estimate.zone.is_none());
    }
}

#[test]
fn test_confidence_never_high_with_red_flags() {
    for score in 0..=100u8 {
        for flags in 1..4 {
            assert_ne!(confidence(score, flags, 0), ConfidenceLabel::High);
        }
    }
}

#[test]
fn test_allocation_never_exceeds_caps() {
    let caps = [
        (RiskTolerance::Conservative, 15.0),
        (RiskTolerance::Moderate, 25.0),
        (RiskTolerance::Aggressive, 40.0),
    ];
    for (tolerance, cap) in caps {
        let p = profile(tolerance);
        for rec in [Recommendation::Buy, Recommendation::Hold, Recommendation::Avoid] {
            for label in [ConfidenceLabel::High, ConfidenceLabel::Medium, ConfidenceLabel::Low] {
                for score in [0u8, 49, 50, 79, 80, 100] {
                    let alloc = allocate(rec, score, label, &p, dec!(1000000));
                    assert!(alloc.percentage <= cap);
                    assert!(alloc.percentage >= 0.0);
                }
            }
        }
    }
}

#[test]
fn test_quality_stock_is_buy() {
    let result = evaluate(&quality_fundamentals(), None, None, &profile(RiskTolerance::Moderate)).unwrap();
    assert!(result.score > 70);
    assert_eq!(result.recommendation, Recommendation::Buy);
}

#[test]
fn test_distressed_stock_flags_and_low_score() {
    let fund = FundamentalsRecord::new()
        .with(Metric::DebtEquity, 3.0)
        .with(Metric::InterestCover, 1.0)
        .with(Metric::EpsGrowth, -0.05);

    let breakdown = FundamentalAnalysisEngine::new()
        .analyze(&fund, None, None, RiskTolerance::Moderate)
        .unwrap();
    assert!(breakdown.red_flags.len() >= 3);
    assert!(breakdown.result.score < 50);

    let result = evaluate(&fund, None, None, &profile(RiskTolerance::Moderate)).unwrap();
    assert_eq!(result, breakdown.result);
}

#[test]
fn test_over_allocated_portfolio_warns() {
    let entries = vec![
        PortfolioEntry::new("TCS", "IT", 40.0),
        PortfolioEntry::new("HDFCBANK", "Finance", 40.0),
        PortfolioEntry::new("ITC", "FMCG", 40.0),
    ];
    let result = analyze_portfolio(&entries, &profile(RiskTolerance::Moderate));
    assert!(result.warnings.contains(&"Total allocation exceeds 100%".to_string()));
}

#[test]
fn test_evaluate_is_idempotent() {
    let p = profile(RiskTolerance::Conservative);
    let fund = quality_fundamentals().with(Metric::Pe, 45.0);
    let news = NewsSummary {
        positive: 0,
        neutral: 1,
        negative: 2,
        overall: analysis_core::SentimentBias::Negative,
    };
    let text = Some("Pending litigation is disclosed in the notes");

    let first = evaluate(&fund, Some(&news), text, &p).unwrap();
    let second = evaluate(&fund, Some(&news), text, &p).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_non_finite_metric_rejected() {
    let fund = quality_fundamentals().with(Metric::Roe, f64::NAN);
    let err = evaluate(&fund, None, None, &profile(RiskTolerance::Moderate)).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidInput { .. }));
}

#[test]
fn test_explain_uses_profile() {
    let text = explain(
        "TCS",
        82,
        Recommendation::Buy,
        &["Low leverage".to_string()],
        &profile(RiskTolerance::Aggressive),
    );
    assert!(text.contains("**Risk Profile:** Aggressive"));
    assert!(text.contains("Long-term"));
}

// Single-stock pipeline

fn quality_inputs() -> StockInputs {
    StockInputs {
        price: Some(1700.0),
        fundamentals: quality_fundamentals(),
        trailing_eps: Some(100.0),
        headlines: vec![],
        report_text: None,
    }
}

#[test]
fn test_advise_quality_stock_in_neutral_market() {
    let advice = StockAdvisor::new()
        .advise(&tcs(), &quality_inputs(), &profile(RiskTolerance::Moderate), &MarketConditions::default())
        .unwrap();

    assert_eq!(advice.score(), 82);
    assert_eq!(advice.confidence, ConfidenceLabel::High);
    assert_eq!(advice.headline(), "BUY (High Conviction)");

    assert_eq!(advice.fair_value.fair_value, Some(2200.0));
    assert_relative_eq!(advice.allocation.percentage, 14.0);
    assert_eq!(advice.allocation.amount, dec!(14000));
    assert_eq!(advice.deployment[0].amount, dec!(8400));
    assert_eq!(advice.entry.action, EntryAction::Buy);

    assert_eq!(advice.health.len(), Metric::ALL.len());
    assert!(advice.explanation.starts_with("### Advisory View - TCS"));
    assert_eq!(advice.plan.strategy, "High-conviction accumulation");
    assert!(advice.news.is_none());
}

#[test]
fn test_bear_market_shrinks_allocation() {
    let bear = MarketRegimeDetector::new().detect_regime(IndexTrend::Down, VolatilityLevel::High);
    let advice = StockAdvisor::new()
        .advise(&tcs(), &quality_inputs(), &profile(RiskTolerance::Moderate), &bear)
        .unwrap();

    assert_relative_eq!(advice.allocation.percentage, 9.8);
    assert_eq!(advice.allocation.amount, dec!(9800));
    assert_eq!(advice.entry.action, EntryAction::AccumulateInPhases);
    assert!(advice
        .thesis_triggers
        .iter()
        .any(|t| t.contains("regime")));
}

#[test]
fn test_headlines_feed_news_sentiment() {
    let mut inputs = quality_inputs();
    inputs.headlines = vec![
        NewsHeadline::new("TCS posts record profit on strong order win"),
        NewsHeadline::new("Brokerages upgrade TCS after results"),
    ];
    let advice = StockAdvisor::new()
        .advise(&tcs(), &inputs, &profile(RiskTolerance::Moderate), &MarketConditions::default())
        .unwrap();

    assert_eq!(advice.score(), 85);
    assert!(advice
        .breakdown
        .result
        .reasons
        .contains(&"Positive news sentiment".to_string()));
    let goal = advice.goal_candidate();
    assert_eq!(goal.score.score, 85);
}

#[test]
fn test_advisor_from_config_uses_scoring_table() {
    let mut config = AdvisorConfig::default();
    config.scoring.buy_threshold = 90;
    let advice = StockAdvisor::from_config(&config)
        .unwrap()
        .advise(&tcs(), &quality_inputs(), &profile(RiskTolerance::Moderate), &MarketConditions::default())
        .unwrap();
    assert_eq!(advice.recommendation(), Recommendation::Hold);

    config.scoring.hold_threshold = 95;
    assert!(StockAdvisor::from_config(&config).is_err());
}

// Portfolio pipeline

#[test]
fn test_review_concentrated_portfolio() {
    let entries = vec![
        PortfolioEntry::new("TCS", "IT", 35.0),
        PortfolioEntry::new("INFY", "IT", 35.0),
        PortfolioEntry::new("HDFCBANK", "Finance", 30.0),
    ];
    let review = review_portfolio(&entries, &profile(RiskTolerance::Moderate), &MarketConditions::default());

    assert_eq!(review.result.risk_score, 15);
    assert_eq!(review.action, PortfolioAction::Buy);
    assert_eq!(review.confidence, ConfidenceLabel::Medium);
    assert_eq!(review.scenarios.len(), StressScenario::ALL.len());
    assert_eq!(review.plan.scope, PlanScope::Portfolio);
    assert_eq!(review.plan.strategy, "Gradual accumulation");
}

#[test]
fn test_review_empty_portfolio() {
    let review = review_portfolio(&[], &profile(RiskTolerance::Conservative), &MarketConditions::default());
    assert_eq!(review.result.risk_score, 100);
    assert_eq!(review.action, PortfolioAction::Reduce);
    assert_eq!(review.plan.capital_deployment, "Do not deploy fresh capital");
    assert_eq!(review.rebalance.action.as_str(), "REBALANCE NOW");
}

// Collaborator layer

struct StaticUniverse;

#[async_trait]
impl StockUniverseProvider for StaticUniverse {
    async fn load_universe(&self) -> Result<Vec<StockInfo>, FetchError> {
        Ok(vec![tcs()])
    }
}

#[derive(Default)]
struct MockPrices {
    calls: AtomicUsize,
    failing: AtomicBool,
}

#[async_trait]
impl PriceProvider for MockPrices {
    async fn current_price(&self, _symbol: &str) -> Result<Option<f64>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(FetchError::Network("connection reset".to_string()))
        } else {
            Ok(Some(1700.0))
        }
    }
}

struct MockFundamentals {
    available: bool,
}

#[async_trait]
impl FundamentalsProvider for MockFundamentals {
    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalsRecord, FetchError> {
        if self.available {
            Ok(quality_fundamentals())
        } else {
            Err(FetchError::NotFound(symbol.to_string()))
        }
    }

    async fn trailing_eps(&self, _symbol: &str) -> Result<Option<f64>, FetchError> {
        if self.available {
            Ok(Some(100.0))
        } else {
            Err(FetchError::RateLimited)
        }
    }
}

struct MockNews;

#[async_trait]
impl NewsProvider for MockNews {
    async fn headlines(&self, _symbol: &str, company: &str) -> Result<Vec<NewsHeadline>, FetchError> {
        Ok(vec![NewsHeadline::new(format!("{} reports record profit", company))])
    }
}

struct NoReports;

#[async_trait]
impl ReportTextProvider for NoReports {
    async fn report_text(&self, _symbol: &str) -> Result<Option<String>, FetchError> {
        Ok(None)
    }
}

fn service(prices: Arc<MockPrices>, fundamentals_available: bool, ttls: CacheTtls) -> MarketDataService {
    MarketDataService::new(
        DataProviders {
            universe: Arc::new(StaticUniverse),
            prices,
            fundamentals: Arc::new(MockFundamentals {
                available: fundamentals_available,
            }),
            news: Arc::new(MockNews),
            reports: Arc::new(NoReports),
        },
        ttls,
    )
}

#[tokio::test]
async fn test_fetch_inputs_from_providers() {
    let data = service(Arc::new(MockPrices::default()), true, CacheTtls::default());

    assert_eq!(data.universe().await, vec![tcs()]);

    let inputs = data.fetch_inputs(&tcs()).await;
    assert_eq!(inputs.price, Some(1700.0));
    assert_eq!(inputs.fundamentals, quality_fundamentals());
    assert_eq!(inputs.trailing_eps, Some(100.0));
    assert_eq!(inputs.headlines.len(), 1);
    assert!(inputs.report_text.is_none());
}

#[tokio::test]
async fn test_fresh_values_are_memoised() {
    let prices = Arc::new(MockPrices::default());
    let data = service(prices.clone(), true, CacheTtls::default());

    assert_eq!(data.price("TCS").await, Some(1700.0));
    assert_eq!(data.price("tcs").await, Some(1700.0));
    assert_eq!(prices.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_refresh_serves_stale_value() {
    let prices = Arc::new(MockPrices::default());
    let ttls = CacheTtls {
        price: Duration::zero(),
        ..CacheTtls::default()
    };
    let data = service(prices.clone(), true, ttls);

    assert_eq!(data.price("TCS").await, Some(1700.0));
    prices.failing.store(true, Ordering::SeqCst);
    assert_eq!(data.price("TCS").await, Some(1700.0));
    assert_eq!(prices.calls.load(Ordering::SeqCst), 2);

    // Nothing cached for this symbol
    assert_eq!(data.price("INFY").await, None);
}

#[tokio::test]
async fn test_advise_live_degrades_without_fundamentals() {
    let data = service(Arc::new(MockPrices::default()), false, CacheTtls::default());
    let advice = StockAdvisor::new()
        .advise_live(&data, &tcs(), &profile(RiskTolerance::Moderate), &MarketConditions::default())
        .await
        .unwrap();

    // Only the positive headline moves the base score
    assert_eq!(advice.score(), 53);
    assert!(advice.fair_value.is_empty());
    assert_eq!(advice.entry.action, EntryAction::InsufficientData);
}
