use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AnalysisError;

/// The fixed set of fundamental metrics a provider can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "PE")]
    Pe,
    #[serde(rename = "PB")]
    Pb,
    #[serde(rename = "EV_EBITDA")]
    EvEbitda,
    #[serde(rename = "ROE")]
    Roe,
    #[serde(rename = "ROCE")]
    Roce,
    NetMargin,
    DebtEquity,
    InterestCover,
    CurrentRatio,
    RevenueGrowth,
    #[serde(rename = "EPSGrowth")]
    EpsGrowth,
}

impl Metric {
    pub const ALL: [Metric; 11] = [
        Metric::Pe,
        Metric::Pb,
        Metric::EvEbitda,
        Metric::Roe,
        Metric::Roce,
        Metric::NetMargin,
        Metric::DebtEquity,
        Metric::InterestCover,
        Metric::CurrentRatio,
        Metric::RevenueGrowth,
        Metric::EpsGrowth,
    ];

    /// Provider key, e.g. `"EV_EBITDA"`.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Pe => "PE",
            Metric::Pb => "PB",
            Metric::EvEbitda => "EV_EBITDA",
            Metric::Roe => "ROE",
            Metric::Roce => "ROCE",
            Metric::NetMargin => "NetMargin",
            Metric::DebtEquity => "DebtEquity",
            Metric::InterestCover => "InterestCover",
            Metric::CurrentRatio => "CurrentRatio",
            Metric::RevenueGrowth => "RevenueGrowth",
            Metric::EpsGrowth => "EPSGrowth",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Metric::ALL.iter().copied().find(|m| m.key() == key)
    }

    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Pe => "PE Ratio",
            Metric::Pb => "PB Ratio",
            Metric::EvEbitda => "EV / EBITDA",
            Metric::Roe => "ROE",
            Metric::Roce => "ROCE",
            Metric::NetMargin => "Net Margin",
            Metric::DebtEquity => "Debt / Equity",
            Metric::InterestCover => "Interest Coverage",
            Metric::CurrentRatio => "Current Ratio",
            Metric::RevenueGrowth => "Revenue Growth (YoY)",
            Metric::EpsGrowth => "EPS Growth (YoY)",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Company fundamentals as reported by a provider.
///
/// Every field may be absent. Absence means "unknown" and must never be read
/// as zero: zero debt or zero growth are legitimate values.
/// Ratios are fractions (an ROE of 20% is `0.20`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsRecord {
    #[serde(rename = "PE", default)]
    pub pe: Option<f64>,
    #[serde(rename = "PB", default)]
    pub pb: Option<f64>,
    #[serde(rename = "EV_EBITDA", default)]
    pub ev_ebitda: Option<f64>,
    #[serde(rename = "ROE", default)]
    pub roe: Option<f64>,
    #[serde(rename = "ROCE", default)]
    pub roce: Option<f64>,
    #[serde(rename = "NetMargin", default)]
    pub net_margin: Option<f64>,
    #[serde(rename = "DebtEquity", default)]
    pub debt_equity: Option<f64>,
    #[serde(rename = "InterestCover", default)]
    pub interest_cover: Option<f64>,
    #[serde(rename = "CurrentRatio", default)]
    pub current_ratio: Option<f64>,
    #[serde(rename = "RevenueGrowth", default)]
    pub revenue_growth: Option<f64>,
    #[serde(rename = "EPSGrowth", default)]
    pub eps_growth: Option<f64>,
}

impl FundamentalsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Pe => self.pe,
            Metric::Pb => self.pb,
            Metric::EvEbitda => self.ev_ebitda,
            Metric::Roe => self.roe,
            Metric::Roce => self.roce,
            Metric::NetMargin => self.net_margin,
            Metric::DebtEquity => self.debt_equity,
            Metric::InterestCover => self.interest_cover,
            Metric::CurrentRatio => self.current_ratio,
            Metric::RevenueGrowth => self.revenue_growth,
            Metric::EpsGrowth => self.eps_growth,
        }
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        let slot = match metric {
            Metric::Pe => &mut self.pe,
            Metric::Pb => &mut self.pb,
            Metric::EvEbitda => &mut self.ev_ebitda,
            Metric::Roe => &mut self.roe,
            Metric::Roce => &mut self.roce,
            Metric::NetMargin => &mut self.net_margin,
            Metric::DebtEquity => &mut self.debt_equity,
            Metric::InterestCover => &mut self.interest_cover,
            Metric::CurrentRatio => &mut self.current_ratio,
            Metric::RevenueGrowth => &mut self.revenue_growth,
            Metric::EpsGrowth => &mut self.eps_growth,
        };
        *slot = value;
    }

    /// Builder-style setter for a present value.
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, Some(value));
        self
    }

    /// Number of metrics with a known value.
    pub fn present_count(&self) -> usize {
        Metric::ALL.iter().filter(|m| self.get(**m).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }

    /// Build a record from a raw provider payload keyed by metric name.
    ///
    /// `null` maps to absent. Anything that is not a JSON number is rejected
    /// rather than coerced, as are keys outside the metric set.
    pub fn from_raw(raw: &serde_json::Map<String, serde_json::Value>) -> Result<Self, AnalysisError> {
        let mut record = Self::default();

        for (key, value) in raw {
            let metric = Metric::from_key(key)
                .ok_or_else(|| AnalysisError::invalid_input(key, "unknown metric"))?;

            let parsed = match value {
                serde_json::Value::Null => None,
                serde_json::Value::Number(n) => Some(n.as_f64().ok_or_else(|| {
                    AnalysisError::invalid_input(key, format!("{} is not representable as f64", n))
                })?),
                other => {
                    return Err(AnalysisError::invalid_input(
                        key,
                        format!("expected a number or null, got {}", json_type_name(other)),
                    ))
                }
            };
            record.set(metric, parsed);
        }

        record.validate()?;
        Ok(record)
    }

    /// Reject NaN and infinite values.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for metric in Metric::ALL {
            if let Some(v) = self.get(metric) {
                if !v.is_finite() {
                    return Err(AnalysisError::invalid_input(
                        metric.key(),
                        format!("value {} is not finite", v),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Investor risk tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Conservative => "Conservative",
            RiskTolerance::Moderate => "Moderate",
            RiskTolerance::Aggressive => "Aggressive",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Investment horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeHorizon {
    Short,
    Medium,
    Long,
}

impl TimeHorizon {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeHorizon::Short => "Short-term",
            TimeHorizon::Medium => "Medium-term",
            TimeHorizon::Long => "Long-term",
        }
    }

    /// Classify a holding period in months (<=6 short, <=18 medium, else long).
    pub fn from_months(months: u32) -> Self {
        match months {
            0..=6 => TimeHorizon::Short,
            7..=18 => TimeHorizon::Medium,
            _ => TimeHorizon::Long,
        }
    }
}

impl fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request investor context. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInvestorProfile")]
pub struct InvestorProfile {
    pub risk_tolerance: RiskTolerance,
    pub time_horizon: TimeHorizon,
    /// Investable capital in currency units
    pub capital: Decimal,
}

impl InvestorProfile {
    pub fn new(
        risk_tolerance: RiskTolerance,
        time_horizon: TimeHorizon,
        capital: Decimal,
    ) -> Result<Self, AnalysisError> {
        if capital <= Decimal::ZERO {
            return Err(AnalysisError::invalid_input(
                "capital",
                format!("must be positive, got {}", capital),
            ));
        }
        Ok(Self {
            risk_tolerance,
            time_horizon,
            capital,
        })
    }
}

#[derive(Deserialize)]
struct RawInvestorProfile {
    risk_tolerance: RiskTolerance,
    time_horizon: TimeHorizon,
    capital: Decimal,
}

impl TryFrom<RawInvestorProfile> for InvestorProfile {
    type Error = AnalysisError;

    fn try_from(raw: RawInvestorProfile) -> Result<Self, Self::Error> {
        InvestorProfile::new(raw.risk_tolerance, raw.time_horizon, raw.capital)
    }
}

/// Discrete stock recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "AVOID")]
    Avoid,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Avoid => "AVOID",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the scoring engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 0 to 100
    pub score: u8,
    pub recommendation: Recommendation,
    /// Ordered, human-readable reasons for every applied adjustment
    pub reasons: Vec<String>,
}

/// Overall tone of recent headlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentBias {
    Positive,
    Neutral,
    Negative,
}

impl SentimentBias {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentBias::Positive => "Positive",
            SentimentBias::Neutral => "Neutral",
            SentimentBias::Negative => "Negative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsSummary {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub overall: SentimentBias,
}

impl Default for NewsSummary {
    fn default() -> Self {
        Self {
            positive: 0,
            neutral: 0,
            negative: 0,
            overall: SentimentBias::Neutral,
        }
    }
}

impl NewsSummary {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// A single news item from the news provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsHeadline {
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
}

impl NewsHeadline {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: None,
            published: None,
        }
    }
}

/// Stock universe entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockInfo {
    pub symbol: String,
    pub company: String,
    pub sector: String,
}

/// Qualitative reliability of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
}

impl ConfidenceLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLabel::High => "High Confidence",
            ConfidenceLabel::Medium => "Medium Confidence",
            ConfidenceLabel::Low => "Low Confidence",
        }
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggested share of investable capital for one stock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Percentage of capital, 0 to the risk-tolerance cap
    pub percentage: f64,
    /// Currency amount rounded to whole units
    pub amount: Decimal,
}

/// One line of a portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub stock: String,
    pub sector: String,
    pub allocation_pct: f64,
}

impl PortfolioEntry {
    pub fn new(stock: impl Into<String>, sector: impl Into<String>, allocation_pct: f64) -> Self {
        Self {
            stock: stock.into(),
            sector: sector.into(),
            allocation_pct,
        }
    }
}
