//! PostgreSQL access using sqlx.
//!
//! There is no pool: every request opens its own `PgConnection` and closes
//! it before the handler returns. [`Database::with_connection`] is the only
//! place a connection is acquired, and it releases the connection on every
//! exit path. A request future that is dropped mid-flight drops the
//! connection with it, which closes the socket.
//!
//! # Parameter typing
//!
//! Values arrive as query-string text. Before executing a statement with
//! parameters, it is prepared once so the server reports the type it infers
//! for each placeholder; non-text placeholders are then rewritten as
//! `$n::text::TYPE` (see [`Statement::with_casts`]). Integer ids, numerics,
//! booleans and timestamps therefore accept their usual text forms, exactly
//! as the server's input functions parse them.

use futures::future::BoxFuture;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgConnection, PgRow, PgTypeInfo, Postgres};
use sqlx::query::Query;
use sqlx::{Connection, Either, Executor, Statement as _, TypeInfo};
use std::str::FromStr;

use crate::core::error::GatewayError;
use crate::core::sql::Statement;

/// Placeholder types that accept a text parameter without a cast
const TEXT_TYPES: &[&str] = &["TEXT", "VARCHAR", "NAME", "UNKNOWN"];

/// Connection settings for one request
#[derive(Clone, Debug)]
pub struct Database {
    options: PgConnectOptions,
}

impl Database {
    /// Parse a connection URI
    ///
    /// Only the URI syntax is checked here. Network and authentication
    /// failures surface when the connection is opened, through the same
    /// error path as the statement that needed it.
    pub fn open(uri: &str) -> Result<Self, GatewayError> {
        let options = PgConnectOptions::from_str(uri).map_err(GatewayError::Connect)?;
        Ok(Self { options })
    }

    /// Open a connection, run `f` on it, then close it
    ///
    /// The connection is closed whether `f` succeeds or fails. A failure to
    /// close is logged and does not change the result of `f`.
    pub async fn with_connection<T, F>(&self, f: F) -> Result<T, sqlx::Error>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, sqlx::Error>> + Send,
    {
        let mut conn = PgConnection::connect_with(&self.options).await?;
        let result = f(&mut conn).await;
        if let Err(err) = conn.close().await {
            tracing::warn!(error = %err, "failed to close database connection");
        }
        result
    }

    /// Run a row-returning statement
    pub async fn fetch(&self, statement: Statement) -> Result<Vec<PgRow>, sqlx::Error> {
        self.with_connection(move |conn| {
            Box::pin(async move {
                let statement = coerce_parameters(conn, statement).await?;
                tracing::debug!(sql = statement.sql(), "fetch");
                bind(&statement).fetch_all(&mut *conn).await
            })
        })
        .await
    }

    /// Run a mutating statement and return the affected-row count
    pub async fn execute(&self, statement: Statement) -> Result<u64, sqlx::Error> {
        self.with_connection(move |conn| {
            Box::pin(async move {
                let statement = coerce_parameters(conn, statement).await?;
                tracing::debug!(sql = statement.sql(), "execute");
                let done = bind(&statement).execute(&mut *conn).await?;
                Ok(done.rows_affected())
            })
        })
        .await
    }
}

fn bind(statement: &Statement) -> Query<'_, Postgres, PgArguments> {
    statement
        .binds()
        .iter()
        .fold(sqlx::query(statement.sql()), |query, value| {
            query.bind(value.as_str())
        })
}

/// Cast each placeholder to the type the server infers for it
async fn coerce_parameters(
    conn: &mut PgConnection,
    statement: Statement,
) -> Result<Statement, sqlx::Error> {
    if statement.binds().is_empty() {
        return Ok(statement);
    }

    let prepared = Executor::prepare(&mut *conn, statement.sql()).await?;
    let casts: Vec<Option<String>> = match prepared.parameters() {
        Some(Either::Left(types)) => types.iter().map(parameter_cast).collect(),
        _ => Vec::new(),
    };
    Ok(statement.with_casts(&casts))
}

fn parameter_cast(type_info: &PgTypeInfo) -> Option<String> {
    let name = type_info.name();
    if TEXT_TYPES.contains(&name) {
        return None;
    }
    Some(match name.strip_suffix("[]") {
        Some(element) => format!("{}[]", cast_target(element)),
        None => cast_target(name).to_string(),
    })
}

/// SQL spelling of a type as sqlx names it, without a length limit
///
/// A cast to `CHAR` or `BIT` means length 1 and silently truncates, so
/// fixed-width columns are cast to their unbounded forms and the column's
/// own length check applies on assignment.
fn cast_target(name: &str) -> &str {
    match name {
        "CHAR" => "BPCHAR",
        "\"CHAR\"" => "\"char\"",
        "BIT" => "VARBIT",
        other => other,
    }
}
