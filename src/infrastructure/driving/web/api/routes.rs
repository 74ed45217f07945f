use actix_web::{web, Scope};

use super::handlers;
use crate::domain::repositories::ChainRepository;
use crate::domain::services::PriceProvider;

pub fn node_routes<R, P>() -> Scope
where
    R: ChainRepository + 'static,
    P: PriceProvider + 'static,
{
    web::scope("/nodes")
        .route("", web::get().to(handlers::get_nodes::<R, P>))
        .route("/{address}/balance", web::get().to(handlers::get_balance::<R, P>))
        .route("/{address}/transactions", web::get().to(handlers::get_transactions::<R, P>))
}

pub fn reward_routes<R, P>() -> Scope
where
    R: ChainRepository + 'static,
    P: PriceProvider + 'static,
{
    web::scope("/reward")
        .route("/balance", web::get().to(handlers::get_reward_balance::<R, P>))
        .route("/price", web::get().to(handlers::get_reward_price::<R, P>))
}

/// Liveness and readiness, mounted outside the authenticated `/api` scope.
pub fn health_routes<R, P>() -> Scope
where
    R: ChainRepository + 'static,
    P: PriceProvider + 'static,
{
    web::scope("/health")
        .route("", web::get().to(handlers::health))
        .route("/db", web::get().to(handlers::health_db::<R, P>))
}
