//! Absolute red flags and profile-relative suitability warnings.
//!
//! Both detectors evaluate every rule independently and never fire on an
//! absent metric.

use analysis_core::{FundamentalsRecord, RiskTolerance};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute-risk threshold breach, independent of the investor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedFlag {
    LowInterestCoverage,
    HighLeverage,
    WeakRoe,
    ThinMargins,
    NegativeRevenueGrowth,
    NegativeEarningsGrowth,
    HighPeWeakGrowth,
}

impl RedFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedFlag::LowInterestCoverage => "Low interest coverage",
            RedFlag::HighLeverage => "High leverage",
            RedFlag::WeakRoe => "Weak ROE",
            RedFlag::ThinMargins => "Thin margins",
            RedFlag::NegativeRevenueGrowth => "Negative revenue growth",
            RedFlag::NegativeEarningsGrowth => "Negative earnings growth",
            RedFlag::HighPeWeakGrowth => "High PE with weak earnings growth",
        }
    }
}

impl fmt::Display for RedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suitability warning relative to the investor's risk tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileMismatch {
    LeverageTooHighForConservative,
    CoverageTooLowForConservative,
    ValuationLimitsMarginOfSafety,
    LeverageTooHighForModerate,
    ValuationStretchedForModerate,
    ExtremeValuationWithDecliningEarnings,
}

impl ProfileMismatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileMismatch::LeverageTooHighForConservative => {
                "High leverage unsuitable for conservative profile"
            }
            ProfileMismatch::CoverageTooLowForConservative => {
                "Low interest coverage for conservative investor"
            }
            ProfileMismatch::ValuationLimitsMarginOfSafety => {
                "High valuation limits margin of safety"
            }
            ProfileMismatch::LeverageTooHighForModerate => {
                "Leverage above comfort level for moderate profile"
            }
            ProfileMismatch::ValuationStretchedForModerate => {
                "High valuation reduces risk-reward balance"
            }
            ProfileMismatch::ExtremeValuationWithDecliningEarnings => {
                "Extreme valuation with declining earnings even for aggressive profile"
            }
        }
    }
}

impl fmt::Display for ProfileMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn below(value: Option<f64>, threshold: f64) -> bool {
    value.map_or(false, |v| v < threshold)
}

fn above(value: Option<f64>, threshold: f64) -> bool {
    value.map_or(false, |v| v > threshold)
}

/// Scan normalised fundamentals for absolute danger thresholds.
pub fn detect_red_flags(fund: &FundamentalsRecord) -> Vec<RedFlag> {
    let mut flags = Vec::new();

    if below(fund.interest_cover, 1.5) {
        flags.push(RedFlag::LowInterestCoverage);
    }
    if above(fund.debt_equity, 2.0) {
        flags.push(RedFlag::HighLeverage);
    }
    if below(fund.roe, 0.10) {
        flags.push(RedFlag::WeakRoe);
    }
    if below(fund.net_margin, 0.05) {
        flags.push(RedFlag::ThinMargins);
    }
    if below(fund.revenue_growth, 0.0) {
        flags.push(RedFlag::NegativeRevenueGrowth);
    }
    if below(fund.eps_growth, 0.0) {
        flags.push(RedFlag::NegativeEarningsGrowth);
    }
    if above(fund.pe, 40.0) && below(fund.eps_growth, 0.05) {
        flags.push(RedFlag::HighPeWeakGrowth);
    }

    flags
}

/// Scan fundamentals against the thresholds of one risk tolerance tier.
/// Conservative is the tightest tier, Aggressive the loosest.
pub fn detect_profile_mismatch(fund: &FundamentalsRecord, tolerance: RiskTolerance) -> Vec<ProfileMismatch> {
    let mut warnings = Vec::new();

    match tolerance {
        RiskTolerance::Conservative => {
            if above(fund.debt_equity, 1.0) {
                warnings.push(ProfileMismatch::LeverageTooHighForConservative);
            }
            if below(fund.interest_cover, 2.0) {
                warnings.push(ProfileMismatch::CoverageTooLowForConservative);
            }
            if above(fund.pe, 30.0) {
                warnings.push(ProfileMismatch::ValuationLimitsMarginOfSafety);
            }
        }
        RiskTolerance::Moderate => {
            if above(fund.debt_equity, 2.0) {
                warnings.push(ProfileMismatch::LeverageTooHighForModerate);
            }
            if above(fund.pe, 40.0) {
                warnings.push(ProfileMismatch::ValuationStretchedForModerate);
            }
        }
        RiskTolerance::Aggressive => {
            if above(fund.pe, 45.0) && below(fund.eps_growth, 0.0) {
                warnings.push(ProfileMismatch::ExtremeValuationWithDecliningEarnings);
            }
        }
    }

    warnings
}
