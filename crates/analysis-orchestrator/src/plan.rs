use analysis_core::{ConfidenceLabel, Recommendation, RiskTolerance, TimeHorizon};
use market_regime_detector::MarketConditions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanScope {
    Stock,
    Portfolio,
}

/// Actionable plan for acting on a recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentPlan {
    pub strategy: String,
    pub capital_deployment: String,
    pub market_overlay: String,
    pub risk_controls: Vec<String>,
    pub review_frequency: String,
    pub exit_conditions: Vec<String>,
    pub scope: PlanScope,
}

impl InvestmentPlan {
    /// Markdown lines, one per plan element
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("**Strategy:** {}", self.strategy),
            format!("**Capital Deployment:** {}", self.capital_deployment),
            format!("**Market Overlay:** {}", self.market_overlay),
            "**Risk Controls:**".to_string(),
        ];
        lines.extend(self.risk_controls.iter().map(|r| format!("- {}", r)));
        lines.push(format!("**Review Frequency:** {}", self.review_frequency));
        lines.push("**Exit / Reduce Conditions:**".to_string());
        lines.extend(self.exit_conditions.iter().map(|e| format!("- {}", e)));
        lines.push(
            match self.scope {
                PlanScope::Stock => "_Plan generated for individual stock_",
                PlanScope::Portfolio => "_Plan generated at portfolio level_",
            }
            .to_string(),
        );
        lines
    }
}

pub fn investment_plan(
    recommendation: Recommendation,
    confidence: ConfidenceLabel,
    score: u8,
    tolerance: RiskTolerance,
    horizon: TimeHorizon,
    market: &MarketConditions,
    scope: PlanScope,
) -> InvestmentPlan {
    let defensive = market.regime.is_defensive();

    let strategy = match recommendation {
        Recommendation::Buy if score >= 75 && confidence == ConfidenceLabel::High => {
            "High-conviction accumulation"
        }
        Recommendation::Buy if score >= 60 => "Gradual accumulation",
        Recommendation::Buy => "Opportunistic buying only on dips",
        Recommendation::Hold => "Hold and monitor closely",
        Recommendation::Avoid => "Capital preservation / avoid exposure",
    };

    let capital_deployment = match (recommendation, tolerance) {
        (Recommendation::Buy, RiskTolerance::Conservative) => "Deploy 20-30% now, rest only on corrections",
        (Recommendation::Buy, RiskTolerance::Moderate) => "Deploy 30-40% now, stagger remaining capital",
        (Recommendation::Buy, RiskTolerance::Aggressive) => "Deploy 40-50% now with tactical adds",
        (Recommendation::Hold, _) => "Avoid fresh allocation; deploy only after confirmation",
        (Recommendation::Avoid, _) => "Do not deploy fresh capital",
    };

    let market_overlay = if defensive {
        "Defensive regime, prioritize capital protection"
    } else if market.regime.is_risk_on() {
        "Risk-on regime, momentum supports exposure"
    } else {
        "Neutral regime, selective positioning advised"
    };

    let mut risk_controls = Vec::new();
    if score < 50 {
        risk_controls.push("Reduce exposure if score drops below 50".to_string());
    }
    if confidence == ConfidenceLabel::Low {
        risk_controls.push("Limit position size due to low conviction".to_string());
    }
    if defensive {
        risk_controls.push("Avoid averaging down aggressively".to_string());
    }
    if risk_controls.is_empty() {
        risk_controls.push("Maintain existing risk controls".to_string());
    }

    let review_frequency = match horizon {
        TimeHorizon::Short => "Review weekly or after major news/events",
        TimeHorizon::Medium => "Review monthly or after earnings",
        TimeHorizon::Long => "Review quarterly with fundamentals update",
    };

    let mut exit_conditions = vec!["Exit or reduce if fundamentals deteriorate materially".to_string()];
    if defensive {
        exit_conditions.push("Tighten exit discipline in adverse market regimes".to_string());
    }
    if recommendation == Recommendation::Buy && score < 60 {
        exit_conditions.push("Reassess thesis if score remains below 60".to_string());
    }

    InvestmentPlan {
        strategy: strategy.to_string(),
        capital_deployment: capital_deployment.to_string(),
        market_overlay: market_overlay.to_string(),
        risk_controls,
        review_frequency: review_frequency.to_string(),
        exit_conditions,
        scope,
    }
}
