use crate::{matches_keyword, normalize_text};
use tracing::debug;

/// Phrases in report text that indicate disclosed risk
pub const DEFAULT_REPORT_RISK_KEYWORDS: &[&str] = &[
    "material risk",
    "litigation",
    "going concern",
    "default",
    "fraud",
];

/// Keyword presence checks over extracted annual/quarterly report text
#[derive(Debug, Clone)]
pub struct ReportScanner {
    keywords: Vec<String>,
}

impl ReportScanner {
    pub fn new() -> Self {
        Self::with_keywords(DEFAULT_REPORT_RISK_KEYWORDS.iter().map(|k| k.to_string()))
    }

    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().trim().to_lowercase())
                .filter(|k| !normalize_text(k).trim().is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Risk keywords present in `text`, in keyword order.
    pub fn risk_hits(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let normalized = normalize_text(text);
        let hits: Vec<String> = self
            .keywords
            .iter()
            .filter(|k| matches_keyword(&normalized, normalize_text(k).trim()))
            .cloned()
            .collect();

        if !hits.is_empty() {
            debug!("Report text risk keywords: {:?}", hits);
        }
        hits
    }
}

impl Default for ReportScanner {
    fn default() -> Self {
        Self::new()
    }
}
