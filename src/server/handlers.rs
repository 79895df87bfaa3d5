//! HTTP handlers for the five gateway routes
//!
//! Every protected handler follows the same sequence: check the shared
//! secret, check required parameters, open a connection, run one statement,
//! shape the JSON response. Nothing is retained between requests.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::HeaderMap,
};
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::core::error::{GatewayError, GatewayResult, INVALID_ID, MISSING_ID, MISSING_ID_OR_WHAT};
use crate::core::params::{AUTH_PARAM, ColumnParams, ID_PARAM, WHAT_PARAM};
use crate::core::{AffectedResponse, HealthResponse, RowsResponse, authorize, sql};
use crate::storage::{Database, rows_to_json};

/// Decoded query string, in order, duplicates included
///
/// A rejection must not answer before the authorization check.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    fn authorize(&self, headers: &HeaderMap) -> GatewayResult<()> {
        authorize(headers, &self.config.auth_token)
    }

    fn database(&self) -> GatewayResult<Database> {
        Database::open(&self.config.database_uri)
    }
}

/// Build the column parameters from the extracted query string
///
/// A query string that fails to decode reads as empty, so the request fails
/// on its missing parameters like any other.
fn column_params(query: QueryPairs) -> ColumnParams {
    match query {
        Ok(Query(pairs)) => ColumnParams::from_pairs(pairs),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "ignoring undecodable query string");
            ColumnParams::default()
        }
    }
}

/// Health check
///
/// `GET /` (any method, no auth). Also serves unregistered paths.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ready())
}

/// Read rows
///
/// `/get?what=<columns>[&id=<id>]`
///
/// `what` is written into the `SELECT` clause as given, so expressions and
/// aggregates work; `id` is bound as a parameter.
pub async fn get_rows(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: QueryPairs,
) -> GatewayResult<Json<RowsResponse>> {
    state.authorize(&headers)?;

    let params = column_params(query);
    let what = params
        .get(WHAT_PARAM)
        .ok_or(GatewayError::MissingParameter(MISSING_ID_OR_WHAT))?;
    let statement = sql::select(what, &state.config.table, params.get(ID_PARAM));

    let rows = state
        .database()?
        .fetch(statement)
        .await
        .map_err(GatewayError::Fetch)?;
    let data = rows_to_json(&rows)?;

    Ok(Json(RowsResponse::ok(data)))
}

/// Insert one row
///
/// `/add?<col>=<value>&...`
///
/// Every parameter except `auth` is a column. The driver's error text is
/// returned to the caller when the insert fails.
pub async fn add_row(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: QueryPairs,
) -> GatewayResult<Json<AffectedResponse>> {
    state.authorize(&headers)?;

    let params = column_params(query);
    let statement = sql::insert(&state.config.table, &params.columns(&[AUTH_PARAM]));

    let affected = state
        .database()?
        .execute(statement)
        .await
        .map_err(GatewayError::Insert)?;

    Ok(Json(AffectedResponse::ok(affected)))
}

/// Update the row with the given id
///
/// `/upd?id=<id>&<col>=<value>&...`
///
/// Without any assignment the statement has an empty `SET` clause and the
/// database rejects it.
pub async fn update_row(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: QueryPairs,
) -> GatewayResult<Json<AffectedResponse>> {
    state.authorize(&headers)?;

    let params = column_params(query);
    let id = params
        .get(ID_PARAM)
        .ok_or(GatewayError::MissingParameter(MISSING_ID))?;
    let statement = sql::update(
        &state.config.table,
        &params.columns(&[ID_PARAM, AUTH_PARAM]),
        id,
    );

    let affected = state
        .database()?
        .execute(statement)
        .await
        .map_err(GatewayError::Update)?;

    Ok(Json(AffectedResponse::ok(affected)))
}

/// Delete the row with the given id
///
/// `/del?id=<id>`. Deleting zero rows is not an error.
pub async fn delete_row(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: QueryPairs,
) -> GatewayResult<Json<AffectedResponse>> {
    state.authorize(&headers)?;

    let params = column_params(query);
    let id = params
        .get(ID_PARAM)
        .ok_or(GatewayError::MissingParameter(INVALID_ID))?;
    let statement = sql::delete(&state.config.table, id);

    let affected = state
        .database()?
        .execute(statement)
        .await
        .map_err(GatewayError::Delete)?;

    Ok(Json(AffectedResponse::ok(affected)))
}
