use analysis_core::{NewsHeadline, NewsSummary, SentimentBias};
use tracing::debug;

pub mod report;
pub use report::{ReportScanner, DEFAULT_REPORT_RISK_KEYWORDS};

const POSITIVE_KEYWORDS: &[&str] = &[
    "growth", "profit", "beat", "record", "expansion", "strong", "upgrade",
    "order win", "recovery", "margin improvement",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "loss", "decline", "fall", "warning", "downgrade", "risk", "fraud", "probe",
    "litigation", "default", "margin pressure", "slowdown",
];

/// Normalise text into a space-padded, lowercase token stream so that
/// keywords can be matched at word starts ("upgrade" hits "upgraded" but
/// "fall" does not hit "rainfall").
pub(crate) fn normalize_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '-' && c != '&')
        .filter(|w| !w.is_empty())
        .collect();
    format!(" {} ", tokens.join(" "))
}

pub(crate) fn matches_keyword(normalized: &str, keyword: &str) -> bool {
    normalized.contains(&format!(" {}", keyword))
}

/// Keyword-based headline sentiment
pub struct SentimentAnalysisEngine {
    positive_words: Vec<&'static str>,
    negative_words: Vec<&'static str>,
}

impl SentimentAnalysisEngine {
    pub fn new() -> Self {
        Self {
            positive_words: POSITIVE_KEYWORDS.to_vec(),
            negative_words: NEGATIVE_KEYWORDS.to_vec(),
        }
    }

    /// Classify one headline by comparing positive and negative keyword hits.
    /// Ties (including no hits at all) are neutral.
    pub fn classify_headline(&self, title: &str) -> SentimentBias {
        let normalized = normalize_text(title);

        let positive = self
            .positive_words
            .iter()
            .filter(|w| matches_keyword(&normalized, w))
            .count();
        let negative = self
            .negative_words
            .iter()
            .filter(|w| matches_keyword(&normalized, w))
            .count();

        if positive > negative {
            SentimentBias::Positive
        } else if negative > positive {
            SentimentBias::Negative
        } else {
            SentimentBias::Neutral
        }
    }

    /// Summarise a batch of headlines into counts and an overall bias.
    pub fn summarize(&self, headlines: &[NewsHeadline]) -> NewsSummary {
        let mut summary = NewsSummary::default();

        for headline in headlines {
            match self.classify_headline(&headline.title) {
                SentimentBias::Positive => summary.positive += 1,
                SentimentBias::Negative => summary.negative += 1,
                SentimentBias::Neutral => summary.neutral += 1,
            }
        }

        summary.overall = if summary.negative > summary.positive {
            SentimentBias::Negative
        } else if summary.positive > summary.negative {
            SentimentBias::Positive
        } else {
            SentimentBias::Neutral
        };

        debug!(
            "News summary: {} positive / {} neutral / {} negative -> {}",
            summary.positive,
            summary.neutral,
            summary.negative,
            summary.overall.as_str()
        );

        summary
    }
}

impl Default for SentimentAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
