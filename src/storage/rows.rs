//! Result rows to JSON
//!
//! Every row becomes a [`RowMap`] whose keys follow the result columns.
//! Values are decoded by their PostgreSQL type:
//!
//! | PostgreSQL                          | JSON                       |
//! |-------------------------------------|----------------------------|
//! | `NULL`                              | `null`                     |
//! | `BOOL`                              | boolean                    |
//! | `INT2`, `INT4`, `INT8`, `OID`       | number                     |
//! | `FLOAT4`, `FLOAT8`                  | number                     |
//! | `NUMERIC`                           | string (exact decimal)     |
//! | `TEXT`, `VARCHAR`, `CHAR(n)`, `NAME` | string                    |
//! | `"char"`                            | one-character string       |
//! | `BIT(n)`, `VARBIT`                  | string of `0`/`1`          |
//! | `BYTEA`                             | string (lossy UTF-8)       |
//! | `JSON`, `JSONB`                     | embedded value             |
//! | `UUID`                              | string                     |
//! | `TIMESTAMPTZ`                       | string (RFC 3339)          |
//! | `TIMESTAMP`, `DATE`, `TIME`         | string (ISO 8601)          |
//! | anything else                       | raw bytes as lossy UTF-8   |

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde_json::{Number, Value};
use sqlx::postgres::PgRow;
use sqlx::postgres::types::Oid;
use sqlx::{Column, Decode, Postgres, Row, Type, TypeInfo, ValueRef};
use uuid::Uuid;

use crate::core::error::RowError;
use crate::core::model::RowMap;

/// Convert result rows to ordered column maps
///
/// Returns `None` when there are no rows, so the response carries
/// `"data": null`. The first column that fails to decode aborts the whole
/// conversion; no partial result is returned.
pub fn rows_to_json(rows: &[PgRow]) -> Result<Option<Vec<RowMap>>, RowError> {
    if rows.is_empty() {
        return Ok(None);
    }

    rows.iter()
        .map(row_to_map)
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn row_to_map(row: &PgRow) -> Result<RowMap, RowError> {
    let mut map = RowMap::with_capacity(row.len());
    for column in row.columns() {
        let value = column_value(row, column.ordinal(), column.name())?;
        map.insert(column.name().to_string(), value);
    }
    Ok(map)
}

fn column_value(row: &PgRow, index: usize, name: &str) -> Result<Value, RowError> {
    let raw = row.try_get_raw(index).map_err(|source| decode_error(name, source))?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let value = match type_name.as_str() {
        "BOOL" => Value::Bool(get::<bool>(row, index, name)?),
        "INT2" => Value::from(get::<i16>(row, index, name)?),
        "INT4" => Value::from(get::<i32>(row, index, name)?),
        "INT8" => Value::from(get::<i64>(row, index, name)?),
        "OID" => Value::from(get::<Oid>(row, index, name)?.0),
        "FLOAT4" => float(f64::from(get::<f32>(row, index, name)?), name)?,
        "FLOAT8" => float(get::<f64>(row, index, name)?, name)?,
        "NUMERIC" => Value::String(get::<BigDecimal>(row, index, name)?.to_string()),
        // sqlx names `bpchar` "CHAR" and the one-byte `"char"` type "\"CHAR\"".
        "TEXT" | "VARCHAR" | "CHAR" | "NAME" => Value::String(get::<String>(row, index, name)?),
        "\"CHAR\"" => Value::String(char::from(get::<i8>(row, index, name)? as u8).to_string()),
        "BIT" | "VARBIT" => {
            let bytes = raw
                .as_bytes()
                .map_err(|source| decode_error(name, sqlx::Error::Decode(source)))?;
            let bits = bit_string(bytes).ok_or_else(|| {
                decode_error(name, sqlx::Error::Decode("malformed bit string".into()))
            })?;
            Value::String(bits)
        }
        "BYTEA" => Value::String(String::from_utf8_lossy(&get::<Vec<u8>>(row, index, name)?).into_owned()),
        "JSON" | "JSONB" => get::<Value>(row, index, name)?,
        "UUID" => Value::String(get::<Uuid>(row, index, name)?.to_string()),
        "TIMESTAMPTZ" => Value::String(
            get::<DateTime<Utc>>(row, index, name)?.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ),
        "TIMESTAMP" => Value::String(
            get::<NaiveDateTime>(row, index, name)?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        "DATE" => Value::String(get::<NaiveDate>(row, index, name)?.to_string()),
        "TIME" => Value::String(get::<NaiveTime>(row, index, name)?.to_string()),
        _ => {
            let bytes = raw
                .as_bytes()
                .map_err(|source| decode_error(name, sqlx::Error::Decode(source)))?;
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
    };

    Ok(value)
}

fn get<'r, T>(row: &'r PgRow, index: usize, name: &str) -> Result<T, RowError>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get::<T, _>(index)
        .map_err(|source| decode_error(name, source))
}

fn float(value: f64, name: &str) -> Result<Value, RowError> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| RowError::NonFinite {
            column: name.to_string(),
        })
}

/// Binary `bit`/`varbit`: a big-endian bit count followed by the bits, MSB first
fn bit_string(bytes: &[u8]) -> Option<String> {
    let (len, data) = bytes.split_first_chunk::<4>()?;
    let len = usize::try_from(u32::from_be_bytes(*len)).ok()?;
    if data.len().checked_mul(8)? < len {
        return None;
    }
    Some(
        (0..len)
            .map(|i| if data[i / 8] & (0x80 >> (i % 8)) != 0 { '1' } else { '0' })
            .collect(),
    )
}

fn decode_error(column: &str, source: sqlx::Error) -> RowError {
    RowError::Decode {
        column: column.to_string(),
        source,
    }
}
