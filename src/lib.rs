//! # tablegate
//!
//! A minimal HTTP gateway in front of one PostgreSQL table.
//!
//! Four endpoints translate query-string parameters into parameterized SQL
//! statements against the configured table, behind a static shared-secret
//! check:
//!
//! | Path   | Statement                                       |
//! |--------|-------------------------------------------------|
//! | `/get` | `SELECT <what> FROM <table> [WHERE id = $1]`    |
//! | `/add` | `INSERT INTO <table> (<cols>) VALUES ($1, ...)` |
//! | `/upd` | `UPDATE <table> SET <col> = $1, ... WHERE id = $n` |
//! | `/del` | `DELETE FROM <table> WHERE id = $1`             |
//!
//! plus a health check on `/`.
//!
//! Column names, the `what` selector and the table name are written into
//! the statement text as given; only values are bound. Callers can therefore
//! select arbitrary expressions (`what=count(*)`), and the gateway must only
//! be exposed to trusted clients.
//!
//! Each request opens its own database connection and closes it before the
//! response is sent. Nothing is pooled, cached or retried.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tablegate::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GatewayConfig::load(".env")?;
//!     GatewayServer::new(config).serve().await
//! }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::config::GatewayConfig;
    pub use crate::core::{
        AffectedResponse, ColumnParams, ConfigError, GatewayError, GatewayResult, HealthResponse,
        Invoice, RowError, RowMap, RowsResponse, Statement,
    };
    pub use crate::server::{AppState, GatewayServer, build_router};
    pub use crate::storage::{Database, rows_to_json};
}
