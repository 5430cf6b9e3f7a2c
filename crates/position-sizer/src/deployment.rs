use analysis_core::{ConfidenceLabel, Recommendation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount_for;

/// One tranche of a staggered deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentPhase {
    pub phase: String,
    pub percentage: u8,
    pub amount: Decimal,
}

/// Split `investment_amount` into tranches by conviction. Higher conviction
/// front-loads the deployment; AVOID keeps most of it in cash.
pub fn capital_deployment_plan(
    recommendation: Recommendation,
    confidence: ConfidenceLabel,
    investment_amount: Decimal,
) -> Vec<DeploymentPhase> {
    let plan: &[(&str, u8)] = match (recommendation, confidence) {
        (Recommendation::Buy, ConfidenceLabel::High) => {
            &[("Now", 60), ("After 3 months", 20), ("After 6 months", 20)]
        }
        (Recommendation::Buy, _) => &[("Now", 40), ("After 3 months", 30), ("After 6 months", 30)],
        (Recommendation::Hold, _) => &[("Now", 20), ("After 3 months", 40), ("After 6 months", 40)],
        (Recommendation::Avoid, _) => &[("Hold Cash", 80), ("Opportunistic Buy", 20)],
    };

    plan.iter()
        .map(|&(phase, pct)| DeploymentPhase {
            phase: phase.to_string(),
            percentage: pct,
            amount: amount_for(investment_amount, f64::from(pct)),
        })
        .collect()
}
