//! Wire types: the nominal invoice row and the response bodies

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One result row, column name to value, in result-column order
pub type RowMap = IndexMap<String, Value>;

/// The nominal shape of a row in the configured table
///
/// Handlers never use this type: they work on whatever columns the caller
/// names. It exists for clients that want to read `/get` results back into
/// a typed value. Columns other than `id` and `vat` land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub msg: String,
}

impl HealthResponse {
    pub fn ready() -> Self {
        Self {
            status: "ready".to_string(),
            msg: "Hello".to_string(),
        }
    }
}

/// Body of a successful `/get`
///
/// `data` is `null` when no row matched, not an empty array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowsResponse {
    pub msg: String,
    pub data: Option<Vec<RowMap>>,
}

impl RowsResponse {
    pub fn ok(data: Option<Vec<RowMap>>) -> Self {
        Self {
            msg: "ok".to_string(),
            data,
        }
    }
}

/// Body of a successful `/add`, `/upd` or `/del`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AffectedResponse {
    pub msg: String,
    pub affected: u64,
}

impl AffectedResponse {
    pub fn ok(affected: u64) -> Self {
        Self {
            msg: "ok".to_string(),
            affected,
        }
    }
}
