use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use futures::future;
use futures::try_join;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::entities::{
    AddressBalance, DateWindow, NodeStatus, TokenBalance, TransactionRecord, TransactionStats,
};
use crate::domain::repositories::ChainRepository;

/// One monitored oracle node as configured at startup.
#[derive(Debug, Clone)]
pub struct MonitoredNode {
    pub address: String,
    pub pair: String,
}

/// Static monitoring parameters, built once from the loaded configuration and
/// owned by the service for the process lifetime.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub nodes: Vec<MonitoredNode>,
    /// Low-balance alert threshold in lovelace.
    pub ada_threshold: u64,
    pub reward_address: String,
    pub token_policy: String,
}

pub struct MonitorService<R: ChainRepository> {
    repository: Arc<R>,
    settings: MonitorSettings,
}

impl<R: ChainRepository> MonitorService<R> {
    pub fn new(repository: Arc<R>, settings: MonitorSettings) -> Self {
        Self { repository, settings }
    }

    pub fn ada_threshold(&self) -> u64 {
        self.settings.ada_threshold
    }

    /// Balance facts for every configured node plus its threshold flag.
    /// Nodes are fetched concurrently; any failure fails the whole call.
    pub async fn node_overview(&self) -> Result<Vec<NodeStatus>> {
        let threshold = self.settings.ada_threshold;
        future::try_join_all(self.settings.nodes.iter().map(|node| async move {
            let balance = self.balance_info(&node.address).await?;
            let is_below_threshold = is_below_threshold(&balance.current_balance, threshold)?;
            Ok::<_, anyhow::Error>(NodeStatus {
                address: node.address.clone(),
                pair: node.pair.clone(),
                current_balance: balance.current_balance,
                lifetime_received: balance.lifetime_received,
                lifetime_spent: balance.lifetime_spent,
                is_below_threshold,
                threshold: threshold.to_string(),
            })
        }))
        .await
    }

    /// The three balance aggregates for one address, issued concurrently.
    pub async fn balance_info(&self, address: &str) -> Result<AddressBalance> {
        let (current_balance, lifetime_received, lifetime_spent) = try_join!(
            self.repository.current_balance(address),
            self.repository.lifetime_received(address),
            self.repository.lifetime_spent(address),
        )?;

        Ok(AddressBalance {
            address: address.to_string(),
            current_balance,
            lifetime_received,
            lifetime_spent,
        })
    }

    /// History listing and window aggregates, issued concurrently.
    pub async fn transactions(
        &self,
        address: &str,
        window: DateWindow,
    ) -> Result<(Vec<TransactionRecord>, TransactionStats)> {
        try_join!(
            self.repository.transaction_history(address, window),
            self.repository.transaction_stats(address, window),
        )
    }

    /// Unspent token balance for the configured reward address/policy pair.
    pub async fn reward_balance(&self) -> Result<TokenBalance> {
        let balance = self
            .repository
            .token_balance(&self.settings.reward_address, &self.settings.token_policy)
            .await?;

        Ok(TokenBalance {
            address: self.settings.reward_address.clone(),
            policy_id: self.settings.token_policy.clone(),
            balance,
        })
    }

    pub async fn ping(&self) -> Result<()> {
        self.repository.ping().await
    }
}

/// Exact integer comparison. Lovelace sums can exceed what f64 (and JSON
/// numbers) represent losslessly, so the comparison goes through BigDecimal.
fn is_below_threshold(current_balance: &str, threshold: u64) -> Result<bool> {
    let balance = BigDecimal::from_str(current_balance)
        .with_context(|| format!("invalid balance value: {current_balance}"))?;
    Ok(balance < BigDecimal::from(threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn balance_below_threshold() {
        assert!(is_below_threshold("999999", 1_000_000).unwrap());
    }

    #[test]
    fn balance_at_threshold_is_not_below() {
        assert!(!is_below_threshold("1000000", 1_000_000).unwrap());
    }

    #[test]
    fn comparison_is_exact_beyond_f64_precision() {
        // 2^53 + 1 and 2^53 + 2 collapse to the same f64; the comparison
        // must still tell them apart.
        assert!(is_below_threshold("9007199254740993", 9_007_199_254_740_994).unwrap());
        assert!(!is_below_threshold("9007199254740994", 9_007_199_254_740_994).unwrap());
    }

    #[test]
    fn garbage_balance_is_an_error() {
        assert!(is_below_threshold("not-a-number", 1).is_err());
    }

    #[test]
    fn zero_threshold_never_flags() {
        assert_eq!(is_below_threshold("0", 0).unwrap(), false);
    }
}
