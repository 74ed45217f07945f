pub mod handlers;
pub mod routes;
pub mod validation;

pub use handlers::AppState;
pub use routes::{health_routes, node_routes, reward_routes};
