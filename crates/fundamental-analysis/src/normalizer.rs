//! Conservative proxy estimates for missing fundamentals.
//!
//! Only fields with a viable proxy are filled; everything else stays absent
//! and must be treated as unknown downstream.

use analysis_core::FundamentalsRecord;
use tracing::debug;

/// ROCE ≈ ROE × 0.8
const ROCE_FROM_ROE: f64 = 0.8;
/// ROE ≈ ROCE × 0.9
const ROE_FROM_ROCE: f64 = 0.9;
/// Net margin ≈ ROE × 0.35
const MARGIN_FROM_ROE: f64 = 0.35;

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Fill gaps in `raw` with proxy values. Total: never fails, never invents a
/// value without a known source metric.
pub fn apply_fallbacks(raw: &FundamentalsRecord) -> FundamentalsRecord {
    let mut fund = *raw;

    match (fund.roe, fund.roce) {
        (Some(roe), None) => {
            fund.roce = Some(round3(roe * ROCE_FROM_ROE));
            debug!("ROCE proxied from ROE: {:?}", fund.roce);
        }
        (None, Some(roce)) => {
            fund.roe = Some(round3(roce * ROE_FROM_ROCE));
            debug!("ROE proxied from ROCE: {:?}", fund.roe);
        }
        _ => {}
    }

    if fund.net_margin.is_none() {
        if let Some(roe) = fund.roe {
            fund.net_margin = Some(round3(roe * MARGIN_FROM_ROE));
            debug!("Net margin proxied from ROE: {:?}", fund.net_margin);
        }
    }

    // Coverage weakens as leverage rises, floored at 1x
    if fund.interest_cover.is_none() {
        if let Some(de) = fund.debt_equity {
            fund.interest_cover = Some(round3((5.0 - de * 2.0).max(1.0)));
            debug!("Interest cover proxied from leverage: {:?}", fund.interest_cover);
        }
    }

    if fund.eps_growth.is_none() {
        if let Some(growth) = fund.revenue_growth {
            fund.eps_growth = Some(growth);
            debug!("EPS growth proxied from revenue growth: {:?}", fund.eps_growth);
        }
    }

    fund
}
