use anyhow::{Context, Result};
use chrono::Duration;
use fundamental_analysis::ScoringConfig;
use std::env;
use std::path::{Path, PathBuf};

use crate::market_data::CacheTtls;

#[derive(Debug, Clone, Default)]
pub struct AdvisorConfig {
    pub cache_ttls: CacheTtls,
    /// Emit logs as JSON lines
    pub log_json: bool,
    pub scoring: ScoringConfig,
    /// Where `scoring` was loaded from, if not the built-in table
    pub scoring_config_path: Option<PathBuf>,
}

impl AdvisorConfig {
    /// Load from the process environment after reading `.env`, if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Unset keys take their defaults;
    /// malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = |key: &str, default: i64| -> Result<Duration> {
            let value: i64 = lookup(key)
                .unwrap_or_else(|| default.to_string())
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", key))?;
            if value < 0 {
                anyhow::bail!("{} must not be negative, got {}", key, value);
            }
            Duration::try_seconds(value).with_context(|| format!("{} is out of range", key))
        };

        let cache_ttls = CacheTtls {
            price: secs("ADVISOR_PRICE_TTL_SECS", 900)?,
            fundamentals: secs("ADVISOR_FUNDAMENTALS_TTL_SECS", 86_400)?,
            news: secs("ADVISOR_NEWS_TTL_SECS", 900)?,
            report: secs("ADVISOR_REPORT_TTL_SECS", 86_400)?,
        };

        let log_json: bool = lookup("ADVISOR_LOG_JSON")
            .unwrap_or_else(|| "false".to_string())
            .parse()
            .context("ADVISOR_LOG_JSON must be true or false")?;

        let scoring_config_path = lookup("ADVISOR_SCORING_CONFIG")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let scoring = match &scoring_config_path {
            Some(path) => load_scoring_config(path)?,
            None => ScoringConfig::default(),
        };

        Ok(Self {
            cache_ttls,
            log_json,
            scoring,
            scoring_config_path,
        })
    }
}

/// Read and validate a JSON scoring table. Missing fields take defaults.
pub fn load_scoring_config(path: &Path) -> Result<ScoringConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scoring config {}", path.display()))?;
    let config: ScoringConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse scoring config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
