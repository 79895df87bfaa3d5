//! Core module: authorization, parameter handling, statement building and
//! the error and wire types shared by the handlers

pub mod auth;
pub mod error;
pub mod model;
pub mod params;
pub mod sql;

pub use auth::authorize;
pub use error::{ConfigError, GatewayError, GatewayResult, RowError};
pub use model::{AffectedResponse, HealthResponse, Invoice, RowMap, RowsResponse};
pub use params::ColumnParams;
pub use sql::Statement;
