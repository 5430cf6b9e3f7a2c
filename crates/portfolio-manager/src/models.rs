use serde::{Deserialize, Serialize};
use std::fmt;

/// Portfolio risk assessment. Higher `risk_score` is worse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioResult {
    pub risk_score: u8,
    pub warnings: Vec<String>,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortfolioAction {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "REDUCE")]
    Reduce,
}

impl PortfolioAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioAction::Buy => "BUY",
            PortfolioAction::Hold => "HOLD",
            PortfolioAction::Reduce => "REDUCE",
        }
    }

    pub fn rationale(&self) -> &'static str {
        match self {
            PortfolioAction::Buy => "Strong portfolio structure with controlled risk",
            PortfolioAction::Hold => "Balanced portfolio but monitor risks",
            PortfolioAction::Reduce => "Portfolio risk elevated",
        }
    }
}

impl fmt::Display for PortfolioAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portfolio action after the market-regime overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortfolioStance {
    Action(PortfolioAction),
    /// BUY softened by a defensive regime
    HoldSelectiveBuy,
    /// HOLD upgraded by a risk-on regime
    BuyOnDips,
}

impl PortfolioStance {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioStance::Action(action) => action.as_str(),
            PortfolioStance::HoldSelectiveBuy => "HOLD / SELECTIVE BUY",
            PortfolioStance::BuyOnDips => "BUY ON DIPS",
        }
    }
}

impl fmt::Display for PortfolioStance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named macro stress scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StressScenario {
    MarketCrash,
    InterestRateHike,
    CommoditySpike,
    GlobalRiskOff,
    BullRun,
}

impl StressScenario {
    pub const ALL: [StressScenario; 5] = [
        StressScenario::MarketCrash,
        StressScenario::InterestRateHike,
        StressScenario::CommoditySpike,
        StressScenario::GlobalRiskOff,
        StressScenario::BullRun,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StressScenario::MarketCrash => "Market Crash (-20%)",
            StressScenario::InterestRateHike => "Interest Rate Hike",
            StressScenario::CommoditySpike => "Commodity Spike",
            StressScenario::GlobalRiskOff => "Global Risk-Off",
            StressScenario::BullRun => "Bull Run",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Bias a scenario suggests for fresh capital
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionBias {
    Buy,
    SelectiveBuy,
    Hold,
    Reduce,
}

impl ActionBias {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionBias::Buy => "BUY",
            ActionBias::SelectiveBuy => "SELECTIVE BUY",
            ActionBias::Hold => "HOLD",
            ActionBias::Reduce => "REDUCE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: StressScenario,
    /// Portfolio risk score under the scenario, 0 to 100, higher is worse
    pub stressed_score: u8,
    pub action_bias: ActionBias,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StressRating {
    Low,
    Medium,
    High,
    Unknown,
}

impl StressRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            StressRating::Low => "LOW",
            StressRating::Medium => "MEDIUM",
            StressRating::High => "HIGH",
            StressRating::Unknown => "UNKNOWN",
        }
    }

    /// One notch worse; High and Unknown stay put
    pub fn escalate(self) -> Self {
        match self {
            StressRating::Low => StressRating::Medium,
            StressRating::Medium => StressRating::High,
            other => other,
        }
    }
}

/// Estimated drawdowns from sector betas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownStress {
    /// Loss under a 10% index correction, percent of capital, 1 dp
    pub correction_drawdown_pct: f64,
    /// Loss under a 25% bear market, percent of capital, 1 dp
    pub bear_drawdown_pct: f64,
    pub rating: StressRating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RebalanceAction {
    NoAction,
    Monitor,
    RebalanceNow,
}

impl RebalanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RebalanceAction::NoAction => "NO ACTION",
            RebalanceAction::Monitor => "MONITOR",
            RebalanceAction::RebalanceNow => "REBALANCE NOW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceSignal {
    pub action: RebalanceAction,
    pub reasons: Vec<String>,
}
