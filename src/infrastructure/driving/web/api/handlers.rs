use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::application::services::MonitorService;
use crate::domain::entities::{DateWindow, NodeStatus, TransactionRecord, TransactionStats};
use crate::domain::repositories::ChainRepository;
use crate::domain::services::PriceProvider;

use super::validation::{is_valid_address, parse_date_param};

/// Everything handlers need, built once in `main` and shared across workers.
pub struct AppState<R: ChainRepository, P: PriceProvider> {
    pub monitor: Arc<MonitorService<R>>,
    pub price: Arc<P>,
    /// Detailed 500 messages are only emitted in development.
    pub dev_mode: bool,
    pub price_token_id: String,
    pub price_provider_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodesResponse {
    pub nodes: Vec<NodeStatus>,
    pub ada_threshold: String,
}

#[derive(Deserialize)]
pub struct TransactionsQuery {
    #[serde(rename = "fromDate")]
    pub from_date: Option<String>,
    #[serde(rename = "toDate")]
    pub to_date: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<DateTime<Utc>>,
    pub transactions: Vec<TransactionRecord>,
    pub stats: TransactionStats,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub token_id: String,
    pub price: f64,
    pub currency: String,
    pub provider: String,
    pub timestamp: String,
}

/// 500 with detail suppressed outside development, so internal errors never
/// leak into production responses.
fn internal_error(err: &anyhow::Error, dev_mode: bool) -> HttpResponse {
    let message = if dev_mode {
        format!("{err:#}")
    } else {
        "An unexpected error occurred".to_string()
    };
    HttpResponse::InternalServerError().json(json!({
        "error": "Internal server error",
        "message": message,
    }))
}

/// 400 with field-level details, matching the shape the dashboard expects.
fn validation_error(details: serde_json::Map<String, serde_json::Value>) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "error": "Validation failed",
        "details": details,
    }))
}

fn invalid_address_response() -> HttpResponse {
    let mut details = serde_json::Map::new();
    details.insert(
        "address".to_string(),
        json!(["address must be a valid bech32 Cardano address"]),
    );
    validation_error(details)
}

pub async fn get_nodes<R, P>(data: web::Data<AppState<R, P>>) -> impl Responder
where
    R: ChainRepository,
    P: PriceProvider,
{
    match data.monitor.node_overview().await {
        Ok(nodes) => HttpResponse::Ok().json(NodesResponse {
            nodes,
            ada_threshold: data.monitor.ada_threshold().to_string(),
        }),
        Err(e) => {
            error!("error fetching nodes: {e:#}");
            internal_error(&e, data.dev_mode)
        }
    }
}

pub async fn get_balance<R, P>(
    data: web::Data<AppState<R, P>>,
    path: web::Path<String>,
) -> impl Responder
where
    R: ChainRepository,
    P: PriceProvider,
{
    let address = path.into_inner();
    if !is_valid_address(&address) {
        return invalid_address_response();
    }

    match data.monitor.balance_info(&address).await {
        Ok(balance) => HttpResponse::Ok().json(balance),
        Err(e) => {
            error!("error fetching balance for {address}: {e:#}");
            internal_error(&e, data.dev_mode)
        }
    }
}

pub async fn get_transactions<R, P>(
    data: web::Data<AppState<R, P>>,
    path: web::Path<String>,
    query: web::Query<TransactionsQuery>,
) -> impl Responder
where
    R: ChainRepository,
    P: PriceProvider,
{
    let address = path.into_inner();
    if !is_valid_address(&address) {
        return invalid_address_response();
    }

    let mut details = serde_json::Map::new();
    let mut window = DateWindow::default();
    for (field, raw) in [("fromDate", &query.from_date), ("toDate", &query.to_date)] {
        if let Some(raw) = raw {
            match parse_date_param(raw) {
                Some(parsed) if field == "fromDate" => window.from = Some(parsed),
                Some(parsed) => window.to = Some(parsed),
                None => {
                    details.insert(
                        field.to_string(),
                        json!([format!("{field} must be a valid ISO 8601 date string")]),
                    );
                }
            }
        }
    }
    if !details.is_empty() {
        return validation_error(details);
    }

    match data.monitor.transactions(&address, window).await {
        Ok((transactions, stats)) => HttpResponse::Ok().json(TransactionsResponse {
            address,
            from_date: window.from.map(|d| d.and_utc()),
            to_date: window.to.map(|d| d.and_utc()),
            transactions,
            stats,
        }),
        Err(e) => {
            error!("error fetching transactions for {address}: {e:#}");
            internal_error(&e, data.dev_mode)
        }
    }
}

pub async fn get_reward_balance<R, P>(data: web::Data<AppState<R, P>>) -> impl Responder
where
    R: ChainRepository,
    P: PriceProvider,
{
    match data.monitor.reward_balance().await {
        Ok(balance) => HttpResponse::Ok().json(balance),
        Err(e) => {
            error!("error fetching reward balance: {e:#}");
            internal_error(&e, data.dev_mode)
        }
    }
}

pub async fn get_reward_price<R, P>(data: web::Data<AppState<R, P>>) -> impl Responder
where
    R: ChainRepository,
    P: PriceProvider,
{
    match data.price.get_price(&data.price_token_id).await {
        Ok(price) => HttpResponse::Ok().json(PriceResponse {
            token_id: data.price_token_id.clone(),
            price,
            currency: "USD".to_string(),
            provider: data.price_provider_name.clone(),
            timestamp: Utc::now().to_rfc3339(),
        }),
        Err(e) => {
            error!("error fetching price for {}: {e}", data.price_token_id);
            internal_error(&anyhow::Error::new(e), data.dev_mode)
        }
    }
}

/// Liveness: 200 whenever the process is up.
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Readiness: trivial database round-trip, 503 when it fails.
pub async fn health_db<R, P>(data: web::Data<AppState<R, P>>) -> impl Responder
where
    R: ChainRepository,
    P: PriceProvider,
{
    match data.monitor.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "database": "connected",
            "timestamp": Utc::now().to_rfc3339(),
        })),
        Err(e) => {
            error!("database readiness check failed: {e:#}");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "error",
                "database": "disconnected",
                "timestamp": Utc::now().to_rfc3339(),
            }))
        }
    }
}

/// JSON 404 for anything that misses the routing table.
pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(json!({ "error": "Not found" }))
}
