//! HTTP server: handlers, route table and the serving loop

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::GatewayServer;
pub use handlers::AppState;
pub use router::build_router;
