use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One output-level entry in an address's transaction history. Written by the
/// chain indexer, never mutated here. Block times serialize as RFC 3339 UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub tx_hash: String,
    pub block_time: DateTime<Utc>,
    pub value: String,
    pub tx_index: i16,
}

/// Aggregates over the same window as the history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub count: i64,
    pub total_spent: String,
    pub total_received: String,
}

/// Optional inclusive time bounds for history and stats queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}
