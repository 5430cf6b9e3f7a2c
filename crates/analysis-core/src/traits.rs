use async_trait::async_trait;
use crate::{FetchError, FundamentalsRecord, NewsHeadline, StockInfo};

/// Source of the tradable universe (symbol, company, sector)
#[async_trait]
pub trait StockUniverseProvider: Send + Sync {
    async fn load_universe(&self) -> Result<Vec<StockInfo>, FetchError>;
}

/// Source of current market prices
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// `Ok(None)` means the provider answered but has no price for the symbol.
    async fn current_price(&self, symbol: &str) -> Result<Option<f64>, FetchError>;
}

/// Source of fundamental ratios. Symbol remapping is the provider's concern.
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalsRecord, FetchError>;

    async fn trailing_eps(&self, symbol: &str) -> Result<Option<f64>, FetchError>;
}

/// Source of recent headlines
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn headlines(&self, symbol: &str, company: &str) -> Result<Vec<NewsHeadline>, FetchError>;
}

/// Source of extracted annual/quarterly report text
#[async_trait]
pub trait ReportTextProvider: Send + Sync {
    async fn report_text(&self, symbol: &str) -> Result<Option<String>, FetchError>;
}
