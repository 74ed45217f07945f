use async_trait::async_trait;

use crate::domain::entities::{DateWindow, TransactionRecord, TransactionStats};
use anyhow::Result;

/// Read-only access to the chain-indexer database. All monetary results are
/// decimal strings in the chain's smallest unit.
#[async_trait]
pub trait ChainRepository: Send + Sync {
    /// Sum of the address's unspent outputs.
    async fn current_balance(&self, address: &str) -> Result<String>;
    /// Sum of every output ever sent to the address.
    async fn lifetime_received(&self, address: &str) -> Result<String>;
    /// Sum of the address's outputs already consumed by later transactions.
    async fn lifetime_spent(&self, address: &str) -> Result<String>;
    /// Unspent quantity of the native token identified by `policy_id`.
    async fn token_balance(&self, address: &str, policy_id: &str) -> Result<String>;
    /// Newest-first history for the address, capped at 1000 rows.
    async fn transaction_history(
        &self,
        address: &str,
        window: DateWindow,
    ) -> Result<Vec<TransactionRecord>>;
    /// Count and spent/received totals over the same window.
    async fn transaction_stats(&self, address: &str, window: DateWindow)
        -> Result<TransactionStats>;
    /// Trivial round-trip used by the readiness check.
    async fn ping(&self) -> Result<()>;
}
