//! Allocation sizing for a single recommendation, plus how and when to
//! deploy the sized amount.

pub mod deployment;
pub mod entry_timing;

pub use deployment::{capital_deployment_plan, DeploymentPhase};
pub use entry_timing::{entry_timing, EntryAction, EntrySignal};

use analysis_core::{AllocationResult, ConfidenceLabel, Recommendation, RiskTolerance};
use anyhow::{bail, Result};
use confidence_calibrator::ConfidenceCalibrator;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rule-based allocation sizer
///
/// pct = (base(recommendation) + score adjustment)
///       × confidence factor × regime multiplier,
/// rounded to 2 dp, capped per risk tolerance and floored at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationSizer {
    /// Base percentage for BUY
    pub buy_base_pct: f64,

    /// Base percentage for HOLD
    pub hold_base_pct: f64,

    /// Base percentage for AVOID
    pub avoid_base_pct: f64,

    /// Added when score >= `strong_score`
    pub strong_score_bonus: f64,
    pub strong_score: u8,

    /// Subtracted when score < `weak_score`
    pub weak_score_penalty: f64,
    pub weak_score: u8,

    /// Per-position caps as percentages of capital
    pub conservative_cap_pct: f64,
    pub moderate_cap_pct: f64,
    pub aggressive_cap_pct: f64,
}

impl Default for AllocationSizer {
    fn default() -> Self {
        Self {
            buy_base_pct: 12.0,
            hold_base_pct: 6.0,
            avoid_base_pct: 2.0,
            strong_score_bonus: 2.0,
            strong_score: 80,
            weak_score_penalty: 2.0,
            weak_score: 50,
            conservative_cap_pct: 15.0,
            moderate_cap_pct: 25.0,
            aggressive_cap_pct: 40.0,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl AllocationSizer {
    pub fn new(
        buy_base_pct: f64,
        hold_base_pct: f64,
        avoid_base_pct: f64,
        caps: (f64, f64, f64),
    ) -> Result<Self> {
        for (name, value) in [
            ("buy_base_pct", buy_base_pct),
            ("hold_base_pct", hold_base_pct),
            ("avoid_base_pct", avoid_base_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                bail!("{} must be between 0 and 100", name);
            }
        }
        let (conservative, moderate, aggressive) = caps;
        if conservative <= 0.0 || conservative > moderate || moderate > aggressive || aggressive > 100.0 {
            bail!("caps must satisfy 0 < conservative <= moderate <= aggressive <= 100");
        }

        Ok(Self {
            buy_base_pct,
            hold_base_pct,
            avoid_base_pct,
            conservative_cap_pct: conservative,
            moderate_cap_pct: moderate,
            aggressive_cap_pct: aggressive,
            ..Self::default()
        })
    }

    /// Maximum single-position percentage for a risk tolerance
    pub fn cap_for(&self, tolerance: RiskTolerance) -> f64 {
        match tolerance {
            RiskTolerance::Conservative => self.conservative_cap_pct,
            RiskTolerance::Moderate => self.moderate_cap_pct,
            RiskTolerance::Aggressive => self.aggressive_cap_pct,
        }
    }

    /// Suggested percentage of capital before conversion to money.
    pub fn percentage(
        &self,
        recommendation: Recommendation,
        score: u8,
        confidence: ConfidenceLabel,
        tolerance: RiskTolerance,
        regime_multiplier: f64,
    ) -> f64 {
        let mut base = match recommendation {
            Recommendation::Buy => self.buy_base_pct,
            Recommendation::Hold => self.hold_base_pct,
            Recommendation::Avoid => self.avoid_base_pct,
        };

        if score >= self.strong_score {
            base += self.strong_score_bonus;
        } else if score < self.weak_score {
            base -= self.weak_score_penalty;
        }

        let multiplier = if regime_multiplier.is_finite() { regime_multiplier } else { 1.0 };
        let raw = base * ConfidenceCalibrator::allocation_factor(confidence) * multiplier;

        round2(raw).min(self.cap_for(tolerance)).max(0.0)
    }

    /// Size a position. `capital` is assumed validated upstream; a
    /// non-positive amount collapses to zero.
    pub fn allocate(
        &self,
        recommendation: Recommendation,
        score: u8,
        confidence: ConfidenceLabel,
        tolerance: RiskTolerance,
        capital: Decimal,
        regime_multiplier: f64,
    ) -> AllocationResult {
        let percentage = self.percentage(recommendation, score, confidence, tolerance, regime_multiplier);
        let amount = amount_for(capital, percentage);

        debug!(
            "Allocation {}% ({}) for {} score {} / {}",
            percentage, amount, recommendation, score, confidence
        );

        AllocationResult { percentage, amount }
    }
}

/// `capital × pct / 100`, rounded half away from zero to whole units.
/// Capital too large to multiply exactly is divided first, and the result
/// saturates at `Decimal::MAX`.
pub fn amount_for(capital: Decimal, percentage: f64) -> Decimal {
    let pct = Decimal::from_f64(percentage).unwrap_or(Decimal::ZERO).round_dp(2);
    let raw = capital
        .checked_mul(pct)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .or_else(|| (capital / Decimal::ONE_HUNDRED).checked_mul(pct))
        .unwrap_or(Decimal::MAX);
    let amount = raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    amount.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_strong_buy_with_high_confidence() {
        let sizer = AllocationSizer::default();
        let alloc = sizer.allocate(
            Recommendation::Buy,
            82,
            ConfidenceLabel::High,
            RiskTolerance::Moderate,
            dec!(100000),
            1.0,
        );

        // (12 + 2) * 1.0
        assert_relative_eq!(alloc.percentage, 14.0);
        assert_eq!(alloc.amount, dec!(14000));
    }

    #[test]
    fn test_medium_confidence_scales_down() {
        let sizer = AllocationSizer::default();
        let alloc = sizer.allocate(
            Recommendation::Buy,
            72,
            ConfidenceLabel::Medium,
            RiskTolerance::Moderate,
            dec!(250000),
            1.0,
        );

        // 12 * 0.7 = 8.4
        assert_relative_eq!(alloc.percentage, 8.4);
        assert_eq!(alloc.amount, dec!(21000));
    }

    #[test]
    fn test_weak_avoid_floors_at_zero() {
        let sizer = AllocationSizer::default();
        let alloc = sizer.allocate(
            Recommendation::Avoid,
            20,
            ConfidenceLabel::Low,
            RiskTolerance::Aggressive,
            dec!(100000),
            1.0,
        );

        // (2 - 2) * 0.4 = 0
        assert_relative_eq!(alloc.percentage, 0.0);
        assert_eq!(alloc.amount, dec!(0));
    }

    #[test]
    fn test_regime_multiplier_and_cap() {
        let sizer = AllocationSizer::default();

        let bear = sizer.percentage(Recommendation::Buy, 85, ConfidenceLabel::High, RiskTolerance::Aggressive, 0.7);
        assert_relative_eq!(bear, 9.8);

        // A hostile multiplier still cannot push past the cap
        let boosted = sizer.percentage(Recommendation::Buy, 85, ConfidenceLabel::High, RiskTolerance::Conservative, 5.0);
        assert_relative_eq!(boosted, 15.0);

        let nan = sizer.percentage(Recommendation::Buy, 85, ConfidenceLabel::High, RiskTolerance::Moderate, f64::NAN);
        assert_relative_eq!(nan, 14.0);
    }

    #[test]
    fn test_never_exceeds_tolerance_cap() {
        let sizer = AllocationSizer::default();
        let recs = [Recommendation::Buy, Recommendation::Hold, Recommendation::Avoid];
        let labels = [ConfidenceLabel::High, ConfidenceLabel::Medium, ConfidenceLabel::Low];
        let tolerances = [RiskTolerance::Conservative, RiskTolerance::Moderate, RiskTolerance::Aggressive];

        for rec in recs {
            for label in labels {
                for tolerance in tolerances {
                    for score in [0u8, 49, 50, 79, 80, 100] {
                        for multiplier in [0.7, 1.0, 1.25, 3.0] {
                            let pct = sizer.percentage(rec, score, label, tolerance, multiplier);
                            assert!(pct <= sizer.cap_for(tolerance));
                            assert!(pct >= 0.0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_amount_rounds_half_away_from_zero() {
        // 12345 * 4.2% = 518.49
        assert_eq!(amount_for(dec!(12345), 4.2), dec!(518));
        // 50 * 1% = 0.5
        assert_eq!(amount_for(dec!(50), 1.0), dec!(1));
        assert_eq!(amount_for(dec!(-1000), 10.0), dec!(0));
    }

    #[test]
    fn test_amount_for_huge_capital_does_not_overflow() {
        let amount = amount_for(Decimal::MAX, 14.0);
        assert!(amount > Decimal::ZERO);
        assert!(amount < Decimal::MAX);

        assert_eq!(amount_for(Decimal::MAX, 250.0), Decimal::MAX);

        let alloc = AllocationSizer::default().allocate(
            Recommendation::Buy,
            82,
            ConfidenceLabel::High,
            RiskTolerance::Moderate,
            Decimal::MAX,
            1.0,
        );
        assert_relative_eq!(alloc.percentage, 14.0);
        assert!(alloc.amount > Decimal::ZERO);
    }

    #[test]
    fn test_new_validates_inputs() {
        assert!(AllocationSizer::new(12.0, 6.0, 2.0, (15.0, 25.0, 40.0)).is_ok());
        assert!(AllocationSizer::new(-1.0, 6.0, 2.0, (15.0, 25.0, 40.0)).is_err());
        assert!(AllocationSizer::new(12.0, 6.0, 2.0, (30.0, 25.0, 40.0)).is_err());
    }
}
