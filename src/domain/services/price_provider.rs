use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("price not found for token: {0}")]
    PriceNotFound(String),

    #[error("price provider rate limit exceeded")]
    RateLimited,

    #[error("price provider returned status {0}")]
    Status(u16),

    #[error("price provider request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Driven port for token price sources. One implementation today (CoinGecko);
/// the trait keeps callers untouched if another provider is added.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Current USD price for `token_id`.
    async fn get_price(&self, token_id: &str) -> Result<f64, ProviderError>;
}
