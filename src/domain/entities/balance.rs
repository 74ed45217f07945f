use serde::{Deserialize, Serialize};

/// Balance facts for a single address. All amounts are lovelace carried as
/// decimal strings: sums over tx_out can exceed the 53-bit range that a JSON
/// number can represent losslessly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBalance {
    pub address: String,
    pub current_balance: String,
    pub lifetime_received: String,
    pub lifetime_spent: String,
}

/// Native-token balance for an address under one policy id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub address: String,
    pub policy_id: String,
    pub balance: String,
}
