use analysis_core::{Recommendation, RiskTolerance, TimeHorizon};

pub const DISCLAIMER: &str = "This is a rule-based decision-support insight, not financial advice.";

fn score_view(score: u8) -> &'static str {
    match score {
        75..=u8::MAX => "Strong overall fundamentals and risk alignment.",
        60..=74 => "Balanced setup with manageable risks.",
        50..=59 => "Mixed signals; caution warranted.",
        _ => "Weak setup with elevated downside risks.",
    }
}

fn profile_note(tolerance: RiskTolerance) -> &'static str {
    match tolerance {
        RiskTolerance::Conservative => "focuses on capital preservation and downside protection",
        RiskTolerance::Moderate => "balances growth potential with risk control",
        RiskTolerance::Aggressive => "prioritizes upside potential and growth",
    }
}

fn horizon_note(horizon: TimeHorizon) -> &'static str {
    match horizon {
        TimeHorizon::Short => {
            "For a short-term horizon, valuation comfort and near-term risk control are especially important."
        }
        TimeHorizon::Medium => {
            "For a medium-term horizon, earnings visibility and balance-sheet strength play a critical role."
        }
        TimeHorizon::Long => {
            "For a long-term horizon, sustainable growth, capital efficiency and financial resilience are key drivers of returns."
        }
    }
}

/// Render a markdown explanation of a scored recommendation.
///
/// Reasons are listed verbatim in the order given; the "Key Factors"
/// section is omitted when there are none.
pub fn render_explanation(
    stock: &str,
    score: u8,
    recommendation: Recommendation,
    reasons: &[String],
    tolerance: RiskTolerance,
    horizon: TimeHorizon,
) -> String {
    let mut sections = vec![
        format!("### Advisory View - {}", stock),
        format!("**Overall Score:** {}/100", score),
        format!("**Recommendation:** **{}**", recommendation),
        format!("**Risk Profile:** {}", tolerance),
        format!("**Investment Horizon:** {}", horizon),
        format!("**Score Interpretation:** {}", score_view(score)),
    ];

    if !reasons.is_empty() {
        let factors: Vec<String> = reasons.iter().map(|r| format!("- {}", r)).collect();
        sections.push(format!("#### Key Factors Considered\n{}", factors.join("\n")));
    }

    sections.push(format!(
        "This recommendation aligns with a strategy that {}.",
        profile_note(tolerance)
    ));
    sections.push(horizon_note(horizon).to_string());
    sections.push(format!("_{}_", DISCLAIMER));

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_disclaimer() {
        let text = render_explanation(
            "TCS",
            82,
            Recommendation::Buy,
            &["Strong return on equity".to_string(), "Low leverage".to_string()],
            RiskTolerance::Moderate,
            TimeHorizon::Long,
        );

        assert!(text.starts_with("### Advisory View - TCS"));
        assert!(text.contains("**Overall Score:** 82/100"));
        assert!(text.contains("**Recommendation:** **BUY**"));
        assert!(text.contains("**Investment Horizon:** Long-term"));
        assert!(text.contains("Strong overall fundamentals"));
        assert!(text.ends_with(&format!("_{}_", DISCLAIMER)));
    }

    #[test]
    fn test_reasons_kept_in_order() {
        let reasons = vec!["Low leverage".to_string(), "Red flag: Thin margins".to_string()];
        let text = render_explanation(
            "ITC",
            55,
            Recommendation::Hold,
            &reasons,
            RiskTolerance::Conservative,
            TimeHorizon::Short,
        );

        let first = text.find("- Low leverage").unwrap();
        let second = text.find("- Red flag: Thin margins").unwrap();
        assert!(first < second);
        assert!(text.contains("Mixed signals"));
        assert!(text.contains("capital preservation"));
    }

    #[test]
    fn test_no_factor_section_without_reasons() {
        let text = render_explanation(
            "WIPRO",
            50,
            Recommendation::Hold,
            &[],
            RiskTolerance::Aggressive,
            TimeHorizon::Medium,
        );
        assert!(!text.contains("Key Factors"));
    }
}
