//! Confidence Banding
//!
//! The band is a strict table over score and issue counts; it never looks at
//! the recommendation itself.

use analysis_core::ConfidenceLabel;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Confidence thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceCalibrator {
    /// Minimum score for High (also requires zero flags and zero mismatches)
    pub high_min_score: u8,
    /// Minimum score for Medium
    pub medium_min_score: u8,
    /// Most red flags Medium tolerates
    pub medium_max_red_flags: usize,
}

impl Default for ConfidenceCalibrator {
    fn default() -> Self {
        Self {
            high_min_score: 75,
            medium_min_score: 60,
            medium_max_red_flags: 1,
        }
    }
}

impl ConfidenceCalibrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn band(&self, score: u8, red_flags: usize, mismatches: usize) -> ConfidenceLabel {
        let label = if score >= self.high_min_score && red_flags == 0 && mismatches == 0 {
            ConfidenceLabel::High
        } else if score >= self.medium_min_score && red_flags <= self.medium_max_red_flags {
            ConfidenceLabel::Medium
        } else {
            ConfidenceLabel::Low
        };

        debug!(
            "Confidence {:?} for score {} ({} flags, {} mismatches)",
            label, score, red_flags, mismatches
        );
        label
    }

    /// Multiplier applied to allocation size for a band
    pub fn allocation_factor(label: ConfidenceLabel) -> f64 {
        match label {
            ConfidenceLabel::High => 1.0,
            ConfidenceLabel::Medium => 0.7,
            ConfidenceLabel::Low => 0.4,
        }
    }
}

/// Band with the default thresholds.
pub fn confidence_band(score: u8, red_flags: usize, mismatches: usize) -> ConfidenceLabel {
    ConfidenceCalibrator::default().band(score, red_flags, mismatches)
}
