pub mod price_provider;

pub use price_provider::{PriceProvider, ProviderError};
