//! Collaborator layer: fetches analysis inputs from the data providers and
//! memoises them per symbol.
//!
//! A failed fetch never aborts the analysis. The error is logged, the last
//! cached value is served even if it has expired, and failing that the input
//! is reported as absent.

use std::future::Future;
use std::sync::Arc;

use analysis_core::{
    FetchError, FundamentalsProvider, FundamentalsRecord, NewsHeadline, NewsProvider, PriceProvider,
    ReportTextProvider, StockInfo, StockUniverseProvider,
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::{debug, warn};

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// Symbol-keyed cache with a fixed time-to-live.
///
/// Expired entries are kept so they can be served when a refresh fails.
pub struct TtlCache<T> {
    entries: DashMap<String, CacheEntry<T>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Value cached less than `ttl` ago
    pub fn get_fresh(&self, key: &str) -> Option<T> {
        let entry = self.entries.get(&key.to_uppercase())?;
        if Utc::now() - entry.cached_at < self.ttl {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    /// Last cached value regardless of age
    pub fn get_stale(&self, key: &str) -> Option<T> {
        self.entries.get(&key.to_uppercase()).map(|e| e.data.clone())
    }

    pub fn insert(&self, key: &str, data: T) {
        self.entries.insert(
            key.to_uppercase(),
            CacheEntry {
                data,
                cached_at: Utc::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(&key.to_uppercase());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Time-to-live per input kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheTtls {
    pub price: Duration,
    pub fundamentals: Duration,
    pub news: Duration,
    pub report: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            price: Duration::minutes(15),
            fundamentals: Duration::hours(24),
            news: Duration::minutes(15),
            report: Duration::hours(24),
        }
    }
}

/// The external collaborators the advisor reads from
#[derive(Clone)]
pub struct DataProviders {
    pub universe: Arc<dyn StockUniverseProvider>,
    pub prices: Arc<dyn PriceProvider>,
    pub fundamentals: Arc<dyn FundamentalsProvider>,
    pub news: Arc<dyn NewsProvider>,
    pub reports: Arc<dyn ReportTextProvider>,
}

/// Everything the pipeline needs for one stock. Missing inputs are absent,
/// never defaulted to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockInputs {
    pub price: Option<f64>,
    pub fundamentals: FundamentalsRecord,
    pub trailing_eps: Option<f64>,
    pub headlines: Vec<NewsHeadline>,
    pub report_text: Option<String>,
}

const UNIVERSE_KEY: &str = "universe";

pub struct MarketDataService {
    providers: DataProviders,
    universe_cache: TtlCache<Vec<StockInfo>>,
    price_cache: TtlCache<f64>,
    fundamentals_cache: TtlCache<FundamentalsRecord>,
    eps_cache: TtlCache<f64>,
    news_cache: TtlCache<Vec<NewsHeadline>>,
    report_cache: TtlCache<String>,
}

impl MarketDataService {
    pub fn new(providers: DataProviders, ttls: CacheTtls) -> Self {
        Self {
            providers,
            universe_cache: TtlCache::new(ttls.fundamentals),
            price_cache: TtlCache::new(ttls.price),
            fundamentals_cache: TtlCache::new(ttls.fundamentals),
            eps_cache: TtlCache::new(ttls.fundamentals),
            news_cache: TtlCache::new(ttls.news),
            report_cache: TtlCache::new(ttls.report),
        }
    }

    /// Tradable universe, empty if the provider has never answered
    pub async fn universe(&self) -> Vec<StockInfo> {
        let universe = self.providers.universe.clone();
        fetch_cached(&self.universe_cache, UNIVERSE_KEY, "universe", || async move {
            universe.load_universe().await.map(Some)
        })
        .await
        .unwrap_or_default()
    }

    pub async fn price(&self, symbol: &str) -> Option<f64> {
        fetch_cached(&self.price_cache, symbol, "price", || {
            self.providers.prices.current_price(symbol)
        })
        .await
    }

    pub async fn fundamentals(&self, symbol: &str) -> Option<FundamentalsRecord> {
        let provider = self.providers.fundamentals.clone();
        fetch_cached(&self.fundamentals_cache, symbol, "fundamentals", || async move {
            provider.fundamentals(symbol).await.map(Some)
        })
        .await
    }

    pub async fn trailing_eps(&self, symbol: &str) -> Option<f64> {
        fetch_cached(&self.eps_cache, symbol, "trailing EPS", || {
            self.providers.fundamentals.trailing_eps(symbol)
        })
        .await
    }

    pub async fn headlines(&self, stock: &StockInfo) -> Vec<NewsHeadline> {
        let provider = self.providers.news.clone();
        fetch_cached(&self.news_cache, &stock.symbol, "news", || async move {
            provider.headlines(&stock.symbol, &stock.company).await.map(Some)
        })
        .await
        .unwrap_or_default()
    }

    pub async fn report_text(&self, symbol: &str) -> Option<String> {
        fetch_cached(&self.report_cache, symbol, "report text", || {
            self.providers.reports.report_text(symbol)
        })
        .await
    }

    /// Fetch all inputs for a stock concurrently
    pub async fn fetch_inputs(&self, stock: &StockInfo) -> StockInputs {
        let symbol = stock.symbol.as_str();
        let (price, fundamentals, trailing_eps, headlines, report_text) = tokio::join!(
            self.price(symbol),
            self.fundamentals(symbol),
            self.trailing_eps(symbol),
            self.headlines(stock),
            self.report_text(symbol),
        );

        StockInputs {
            price,
            fundamentals: fundamentals.unwrap_or_default(),
            trailing_eps,
            headlines,
            report_text,
        }
    }
}

/// Serve a fresh cached value, else fetch and cache it. On failure fall back
/// to the stale value, if any. `Ok(None)` from the provider is not cached.
async fn fetch_cached<T, F, Fut>(cache: &TtlCache<T>, key: &str, what: &str, fetch: F) -> Option<T>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>, FetchError>>,
{
    if let Some(hit) = cache.get_fresh(key) {
        return Some(hit);
    }

    match fetch().await {
        Ok(Some(value)) => {
            cache.insert(key, value.clone());
            Some(value)
        }
        Ok(None) => {
            debug!("No {} available for {}", what, key);
            None
        }
        Err(e) => {
            let stale = cache.get_stale(key);
            warn!(
                "Failed to fetch {} for {}: {} (serving stale: {})",
                what,
                key,
                e,
                stale.is_some()
            );
            stale
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_is_served() {
        let cache = TtlCache::new(Duration::minutes(15));
        cache.insert("tcs", 3550.0);
        assert_eq!(cache.get_fresh("TCS"), Some(3550.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_only_stale() {
        let cache = TtlCache::new(Duration::zero());
        cache.insert("INFY", 1500.0);
        assert_eq!(cache.get_fresh("INFY"), None);
        assert_eq!(cache.get_stale("INFY"), Some(1500.0));

        cache.invalidate("INFY");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_default_ttls() {
        let ttls = CacheTtls::default();
        assert_eq!(ttls.price.num_seconds(), 900);
        assert_eq!(ttls.fundamentals.num_seconds(), 86_400);
        assert_eq!(ttls.news, ttls.price);
        assert_eq!(ttls.report, ttls.fundamentals);
    }
}
