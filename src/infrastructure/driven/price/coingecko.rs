use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

use super::cache::PriceCache;
use crate::domain::services::{PriceProvider, ProviderError};
use crate::infrastructure::config::PriceProviderConfig;
use anyhow::{bail, Result};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// CoinGecko price source with a TTL cache in front of it. On a rate-limit
/// response the error is surfaced as [`ProviderError::RateLimited`] and left
/// to the caller; the provider itself never retries or backs off.
pub struct CoinGeckoProvider {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    cache: PriceCache,
}

impl CoinGeckoProvider {
    pub fn new(api_key: Option<String>, cache_ttl: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            cache: PriceCache::new(cache_ttl),
        }
    }

    /// Point the provider at a different endpoint (proxy, test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_price(&self, token_id: &str) -> Result<f64, ProviderError> {
        let mut request = self
            .http
            .get(format!("{}/simple/price", self.base_url))
            .query(&[("ids", token_id), ("vs_currencies", "usd")])
            .timeout(REQUEST_TIMEOUT);

        if let Some(key) = &self.api_key {
            request = request.header("x-cg-pro-api-key", key);
        }

        let response = request.send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            warn!(token_id, "price provider rate limit exceeded");
            return Err(ProviderError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        body.get(token_id)
            .and_then(|token| token.get("usd"))
            .and_then(Value::as_f64)
            .ok_or_else(|| ProviderError::PriceNotFound(token_id.to_string()))
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    async fn get_price(&self, token_id: &str) -> Result<f64, ProviderError> {
        if let Some(price) = self.cache.get(token_id) {
            info!(token_id, price, "price cache hit");
            return Ok(price);
        }

        info!(token_id, "price cache miss, fetching from CoinGecko");
        let price = self.fetch_price(token_id).await?;
        self.cache.insert(token_id, price);
        Ok(price)
    }
}

/// Builds the provider named in configuration. CoinGecko is the only source
/// today; unknown names are a startup error.
pub fn create_price_provider(config: &PriceProviderConfig) -> Result<CoinGeckoProvider> {
    match config.provider.to_lowercase().as_str() {
        "coingecko" => Ok(CoinGeckoProvider::new(
            config.api_key.clone(),
            Duration::from_secs(config.cache_ttl_secs),
        )),
        other => bail!("unsupported price provider type: {other}"),
    }
}
