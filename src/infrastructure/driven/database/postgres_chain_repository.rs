use anyhow::{Context, Result};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use sqlx::{PgPool, Pool, Postgres};
use std::sync::Arc;

use crate::domain::entities::{DateWindow, TransactionRecord, TransactionStats};
use crate::domain::repositories::ChainRepository;

/// Read-only queries against a cardano-db-sync schema. The schema is owned by
/// the indexer; this adapter only ever issues SELECTs.
pub struct PostgresChainRepository {
    pool: Arc<Pool<Postgres>>,
}

impl PostgresChainRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn sum_query(&self, sql: &str, address: &str) -> Result<String> {
        let total: BigDecimal = sqlx::query_scalar(sql)
            .bind(address)
            .fetch_one(self.pool.as_ref())
            .await
            .with_context(|| format!("balance query failed for {address}"))?;
        Ok(total.to_string())
    }
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    tx_hash: String,
    block_time: NaiveDateTime,
    value: BigDecimal,
    tx_index: i16,
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    tx_count: i64,
    total_spent: BigDecimal,
    total_received: BigDecimal,
}

/// Appends the optional inclusive time bounds. The address is always `$1`,
/// so bound parameters start at `$2`.
fn push_window_bounds(sql: &mut String, window: DateWindow) {
    let mut index = 1;
    if window.from.is_some() {
        index += 1;
        sql.push_str(&format!(" AND b.time >= ${index}"));
    }
    if window.to.is_some() {
        index += 1;
        sql.push_str(&format!(" AND b.time <= ${index}"));
    }
}

fn history_sql(window: DateWindow) -> String {
    let mut sql = String::from(
        "SELECT encode(t.hash, 'hex') AS tx_hash, \
                b.time AS block_time, \
                txo.value AS value, \
                txo.index AS tx_index \
         FROM tx t \
         JOIN block b ON t.block_id = b.id \
         JOIN tx_out txo ON t.id = txo.tx_id \
         WHERE txo.address = $1",
    );
    push_window_bounds(&mut sql, window);
    sql.push_str(" ORDER BY b.time DESC LIMIT 1000");
    sql
}

fn stats_sql(window: DateWindow) -> String {
    let mut sql = String::from(
        "SELECT COUNT(DISTINCT t.id) AS tx_count, \
                COALESCE(SUM(CASE WHEN txo.consumed_by_tx_id IS NOT NULL \
                                  THEN txo.value ELSE 0 END), 0) AS total_spent, \
                COALESCE(SUM(txo.value), 0) AS total_received \
         FROM tx t \
         JOIN block b ON t.block_id = b.id \
         JOIN tx_out txo ON t.id = txo.tx_id \
         WHERE txo.address = $1",
    );
    push_window_bounds(&mut sql, window);
    sql
}

#[async_trait]
impl ChainRepository for PostgresChainRepository {
    async fn current_balance(&self, address: &str) -> Result<String> {
        self.sum_query(
            "SELECT COALESCE(SUM(value), 0) \
             FROM tx_out \
             WHERE address = $1 AND consumed_by_tx_id IS NULL",
            address,
        )
        .await
    }

    async fn lifetime_received(&self, address: &str) -> Result<String> {
        self.sum_query(
            "SELECT COALESCE(SUM(value), 0) \
             FROM tx_out \
             WHERE address = $1",
            address,
        )
        .await
    }

    async fn lifetime_spent(&self, address: &str) -> Result<String> {
        self.sum_query(
            "SELECT COALESCE(SUM(value), 0) \
             FROM tx_out \
             WHERE address = $1 AND consumed_by_tx_id IS NOT NULL",
            address,
        )
        .await
    }

    async fn token_balance(&self, address: &str, policy_id: &str) -> Result<String> {
        let quantity: BigDecimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(ma.quantity), 0) \
             FROM ma_tx_out ma \
             JOIN multi_asset m ON ma.ident = m.id \
             JOIN tx_out txo ON ma.tx_out_id = txo.id \
             WHERE txo.address = $1 \
               AND encode(m.policy, 'hex') = $2 \
               AND txo.consumed_by_tx_id IS NULL",
        )
        .bind(address)
        .bind(policy_id)
        .fetch_one(self.pool.as_ref())
        .await
        .with_context(|| format!("token balance query failed for {address}"))?;
        Ok(quantity.to_string())
    }

    async fn transaction_history(
        &self,
        address: &str,
        window: DateWindow,
    ) -> Result<Vec<TransactionRecord>> {
        let sql = history_sql(window);
        let mut query = sqlx::query_as::<_, HistoryRow>(&sql).bind(address);
        if let Some(from) = window.from {
            query = query.bind(from);
        }
        if let Some(to) = window.to {
            query = query.bind(to);
        }

        let rows = query
            .fetch_all(self.pool.as_ref())
            .await
            .with_context(|| format!("transaction history query failed for {address}"))?;

        Ok(rows
            .into_iter()
            .map(|row| TransactionRecord {
                tx_hash: row.tx_hash,
                // db-sync stores block.time without a zone; it is UTC.
                block_time: row.block_time.and_utc(),
                value: row.value.to_string(),
                tx_index: row.tx_index,
            })
            .collect())
    }

    async fn transaction_stats(
        &self,
        address: &str,
        window: DateWindow,
    ) -> Result<TransactionStats> {
        let sql = stats_sql(window);
        let mut query = sqlx::query_as::<_, StatsRow>(&sql).bind(address);
        if let Some(from) = window.from {
            query = query.bind(from);
        }
        if let Some(to) = window.to {
            query = query.bind(to);
        }

        let row = query
            .fetch_one(self.pool.as_ref())
            .await
            .with_context(|| format!("transaction stats query failed for {address}"))?;

        Ok(TransactionStats {
            count: row.tx_count,
            total_spent: row.total_spent.to_string(),
            total_received: row.total_received.to_string(),
        })
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .context("database ping failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at_midnight(date: NaiveDate) -> NaiveDateTime {
        date.and_time(chrono::NaiveTime::MIN)
    }

    #[test]
    fn no_window_adds_no_bounds() {
        let mut sql = String::from("WHERE txo.address = $1");
        push_window_bounds(&mut sql, DateWindow::default());
        assert_eq!(sql, "WHERE txo.address = $1");
    }

    #[test]
    fn both_bounds_number_parameters_in_order() {
        let mut sql = String::from("WHERE txo.address = $1");
        let window = DateWindow {
            from: Some(at_midnight(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())),
            to: Some(at_midnight(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())),
        };
        push_window_bounds(&mut sql, window);
        assert_eq!(sql, "WHERE txo.address = $1 AND b.time >= $2 AND b.time <= $3");
    }

    #[test]
    fn upper_bound_only_is_second_parameter() {
        let mut sql = String::from("WHERE txo.address = $1");
        let window = DateWindow {
            from: None,
            to: Some(at_midnight(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())),
        };
        push_window_bounds(&mut sql, window);
        assert_eq!(sql, "WHERE txo.address = $1 AND b.time <= $2");
    }

    #[test]
    fn history_statement_orders_and_limits_after_the_bounds() {
        let unbounded = history_sql(DateWindow::default());
        assert!(unbounded.ends_with("WHERE txo.address = $1 ORDER BY b.time DESC LIMIT 1000"));

        let window = DateWindow {
            from: Some(at_midnight(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())),
            to: Some(at_midnight(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())),
        };
        let bounded = history_sql(window);
        assert!(bounded.ends_with(
            "WHERE txo.address = $1 AND b.time >= $2 AND b.time <= $3 \
             ORDER BY b.time DESC LIMIT 1000"
        ));
    }

    #[test]
    fn stats_statement_aggregates_without_a_limit() {
        let sql = stats_sql(DateWindow::default());
        assert!(sql.ends_with("WHERE txo.address = $1"));
        assert!(!sql.contains("LIMIT"));
    }
}
