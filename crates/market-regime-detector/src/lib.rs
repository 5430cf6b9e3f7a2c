use serde::{Deserialize, Serialize};
use tracing::debug;

/// Broad market regime used to overlay stock and portfolio decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketRegime {
    /// Sharp downtrend with high volatility
    BearMarket,

    /// Index trending down
    RiskOff,

    /// Strong uptrend with low volatility
    BullMarket,

    /// Index trending up
    RiskOn,

    /// Sideways index with elevated volatility
    HighVolatility,

    /// Balanced conditions
    Neutral,
}

impl MarketRegime {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            MarketRegime::BearMarket => "Bear Market",
            MarketRegime::RiskOff => "Risk-Off",
            MarketRegime::BullMarket => "Bull Market",
            MarketRegime::RiskOn => "Risk-On",
            MarketRegime::HighVolatility => "High Volatility",
            MarketRegime::Neutral => "Neutral Market",
        }
    }

    /// Allocation scaling factor for this regime (1.0 = normal exposure)
    pub fn risk_multiplier(&self) -> f64 {
        match self {
            MarketRegime::BearMarket => 0.70,
            MarketRegime::RiskOff => 0.80,
            MarketRegime::BullMarket => 1.25,
            MarketRegime::RiskOn => 1.15,
            MarketRegime::HighVolatility => 0.90,
            MarketRegime::Neutral => 1.00,
        }
    }

    /// Bear market or risk-off
    pub fn is_defensive(&self) -> bool {
        matches!(self, MarketRegime::BearMarket | MarketRegime::RiskOff)
    }

    /// Bull market or risk-on
    pub fn is_risk_on(&self) -> bool {
        matches!(self, MarketRegime::BullMarket | MarketRegime::RiskOn)
    }

    pub fn note(&self) -> &'static str {
        match self {
            MarketRegime::BearMarket => {
                "Sharp downtrend with high volatility - capital preservation is priority"
            }
            MarketRegime::RiskOff => "Market trending down - defensive positioning advised",
            MarketRegime::BullMarket => {
                "Strong uptrend with low volatility - favorable risk-taking environment"
            }
            MarketRegime::RiskOn => "Uptrend intact - selective risk-taking supported",
            MarketRegime::HighVolatility => {
                "Uncertain market with elevated volatility - staggered entry preferred"
            }
            MarketRegime::Neutral => "Balanced market conditions - fundamentals drive decisions",
        }
    }
}

/// Direction of the benchmark index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndexTrend {
    Up,
    Down,
    #[default]
    Neutral,
}

/// Realised volatility bucket of the benchmark index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VolatilityLevel {
    Low,
    #[default]
    Normal,
    High,
}

impl VolatilityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolatilityLevel::Low => "Low",
            VolatilityLevel::Normal => "Normal",
            VolatilityLevel::High => "High",
        }
    }
}

/// Regime detection result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketConditions {
    pub regime: MarketRegime,
    pub risk_multiplier: f64,
    pub volatility: VolatilityLevel,
}

impl MarketConditions {
    pub fn note(&self) -> &'static str {
        self.regime.note()
    }
}

impl Default for MarketConditions {
    fn default() -> Self {
        MarketRegimeDetector::new().detect_regime(IndexTrend::Neutral, VolatilityLevel::Normal)
    }
}

/// Rule-based market regime detector
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketRegimeDetector;

impl MarketRegimeDetector {
    pub fn new() -> Self {
        Self
    }

    /// Classify the regime from index trend and volatility.
    ///
    /// Downtrends dominate, then uptrends, then volatility on its own.
    pub fn detect_regime(&self, trend: IndexTrend, volatility: VolatilityLevel) -> MarketConditions {
        let regime = match (trend, volatility) {
            (IndexTrend::Down, VolatilityLevel::High) => MarketRegime::BearMarket,
            (IndexTrend::Down, _) => MarketRegime::RiskOff,
            (IndexTrend::Up, VolatilityLevel::Low) => MarketRegime::BullMarket,
            (IndexTrend::Up, _) => MarketRegime::RiskOn,
            (IndexTrend::Neutral, VolatilityLevel::High) => MarketRegime::HighVolatility,
            (IndexTrend::Neutral, _) => MarketRegime::Neutral,
        };

        debug!(
            "Market regime {:?} from trend {:?} / volatility {:?}",
            regime, trend, volatility
        );

        MarketConditions {
            regime,
            risk_multiplier: regime.risk_multiplier(),
            volatility,
        }
    }
}
