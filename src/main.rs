use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Result;
use tracing::{error, info};

use oracle_monitor::application::services::{MonitorService, MonitorSettings, MonitoredNode};
use oracle_monitor::domain::repositories::ChainRepository;
use oracle_monitor::infrastructure::config::AppConfig;
use oracle_monitor::infrastructure::logging::setup_tracing;
use oracle_monitor::infrastructure::driven::database::{build_pool, PostgresChainRepository};
use oracle_monitor::infrastructure::driven::price::{create_price_provider, CoinGeckoProvider};
use oracle_monitor::infrastructure::driving::web::api::{
    handlers, health_routes, node_routes, reward_routes, AppState,
};
use oracle_monitor::infrastructure::driving::web::middleware::ApiKeyAuth;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging (with the log-facade bridge for actix's Logger)
    if let Err(e) = setup_tracing() {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    info!("Starting oracle monitor...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration loaded successfully");

    // Set up database connection pool
    let pool = match build_pool(&config.database).await {
        Ok(pool) => {
            info!("Database connection established");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // Create shared components
    let repository = Arc::new(PostgresChainRepository::new(Arc::new(pool)));

    if let Err(e) = repository.ping().await {
        error!("Database connectivity check failed: {}", e);
        std::process::exit(1);
    }

    let monitor = Arc::new(MonitorService::new(
        repository,
        MonitorSettings {
            nodes: config
                .nodes
                .iter()
                .map(|n| MonitoredNode { address: n.address.clone(), pair: n.pair.clone() })
                .collect(),
            ada_threshold: config.ada_threshold,
            reward_address: config.reward.address.clone(),
            token_policy: config.reward.token_policy.clone(),
        },
    ));

    let price = match create_price_provider(&config.price_provider) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            error!("Failed to initialize price provider: {}", e);
            std::process::exit(1);
        }
    };
    info!("Price service initialized ({})", config.price_provider.provider);

    let app_state = web::Data::new(AppState {
        monitor,
        price,
        dev_mode: config.server.is_development(),
        price_token_id: config.price_provider.token_id.clone(),
        price_provider_name: config.price_provider.provider.clone(),
    });

    let api_keys = config.api_keys.clone();
    let server = HttpServer::new(move || {
        let cors = Cors::default().allow_any_origin().allow_any_method().allow_any_header();

        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .app_data(app_state.clone())
            .service(health_routes::<PostgresChainRepository, CoinGeckoProvider>())
            .service(
                web::scope("/api")
                    .wrap(ApiKeyAuth::new(api_keys.clone()))
                    .service(node_routes::<PostgresChainRepository, CoinGeckoProvider>())
                    .service(reward_routes::<PostgresChainRepository, CoinGeckoProvider>()),
            )
            .default_service(web::route().to(handlers::not_found))
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run();

    info!("Server listening on {}:{}", config.server.host, config.server.port);
    info!("Environment: {}", config.server.environment);

    server.await?;

    info!("Oracle monitor shutting down");
    Ok(())
}
