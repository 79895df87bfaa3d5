//! Database access: per-request connections and row conversion

pub mod postgres;
pub mod rows;

pub use postgres::Database;
pub use rows::rows_to_json;
