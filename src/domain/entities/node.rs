use serde::{Deserialize, Serialize};

/// A monitored oracle node: its funding address plus balance facts and the
/// low-balance flag computed against the configured threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    pub address: String,
    pub pair: String,
    pub current_balance: String,
    pub lifetime_received: String,
    pub lifetime_spent: String,
    pub is_below_threshold: bool,
    pub threshold: String,
}
