pub mod postgres_chain_repository;

pub use postgres_chain_repository::PostgresChainRepository;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;

use crate::infrastructure::config::DatabaseConfig;

/// Bounded connection pool over the indexer database. The pool is the only
/// backpressure mechanism in the system: requests queue for a connection and
/// fail once the acquire timeout elapses.
pub async fn build_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.database)
        .username(&config.user)
        .password(&config.password)
        // Long aggregates over tx_out can run away on large chains; bound
        // every statement server-side.
        .options([("statement_timeout", config.statement_timeout_millis.to_string())]);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(options)
        .await
}
