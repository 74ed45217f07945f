pub mod cache;
pub mod coingecko;

pub use cache::PriceCache;
pub use coingecko::{create_price_provider, CoinGeckoProvider};
