use analysis_core::{ConfidenceLabel, Recommendation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recommendation qualified by how much conviction stands behind it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConvictionLabel {
    HighConviction,
    ModerateConviction,
    Speculative,
    StrongFundamentals,
    WatchClosely,
    WeakMomentum,
    UnfavorableRisk,
}

impl ConvictionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConvictionLabel::HighConviction => "High Conviction",
            ConvictionLabel::ModerateConviction => "Moderate Conviction",
            ConvictionLabel::Speculative => "Speculative",
            ConvictionLabel::StrongFundamentals => "Strong Fundamentals",
            ConvictionLabel::WatchClosely => "Watch Closely",
            ConvictionLabel::WeakMomentum => "Weak Momentum",
            ConvictionLabel::UnfavorableRisk => "Unfavorable Risk",
        }
    }

    /// e.g. `BUY (High Conviction)`
    pub fn headline(&self, recommendation: Recommendation) -> String {
        format!("{} ({})", recommendation, self.as_str())
    }
}

impl fmt::Display for ConvictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn conviction_label(
    recommendation: Recommendation,
    confidence: ConfidenceLabel,
    score: u8,
) -> ConvictionLabel {
    match (recommendation, confidence) {
        (Recommendation::Buy, ConfidenceLabel::High) if score >= 75 => ConvictionLabel::HighConviction,
        (Recommendation::Buy, ConfidenceLabel::Medium) => ConvictionLabel::ModerateConviction,
        (Recommendation::Buy, _) => ConvictionLabel::Speculative,
        (Recommendation::Hold, ConfidenceLabel::High) => ConvictionLabel::StrongFundamentals,
        (Recommendation::Hold, ConfidenceLabel::Medium) => ConvictionLabel::WatchClosely,
        (Recommendation::Hold, ConfidenceLabel::Low) => ConvictionLabel::WeakMomentum,
        (Recommendation::Avoid, _) => ConvictionLabel::UnfavorableRisk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_labels() {
        assert_eq!(
            conviction_label(Recommendation::Buy, ConfidenceLabel::High, 82),
            ConvictionLabel::HighConviction
        );
        assert_eq!(
            conviction_label(Recommendation::Buy, ConfidenceLabel::Medium, 72),
            ConvictionLabel::ModerateConviction
        );
        assert_eq!(
            conviction_label(Recommendation::Buy, ConfidenceLabel::Low, 71),
            ConvictionLabel::Speculative
        );
    }

    #[test]
    fn test_hold_and_avoid_labels() {
        assert_eq!(
            conviction_label(Recommendation::Hold, ConfidenceLabel::Medium, 65),
            ConvictionLabel::WatchClosely
        );
        assert_eq!(
            conviction_label(Recommendation::Hold, ConfidenceLabel::Low, 52),
            ConvictionLabel::WeakMomentum
        );
        assert_eq!(
            conviction_label(Recommendation::Avoid, ConfidenceLabel::Medium, 45),
            ConvictionLabel::UnfavorableRisk
        );
    }

    #[test]
    fn test_headline_format() {
        let label = conviction_label(Recommendation::Buy, ConfidenceLabel::High, 90);
        assert_eq!(label.headline(Recommendation::Buy), "BUY (High Conviction)");
    }
}
