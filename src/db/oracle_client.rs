//! Oracle database client implementation.
//!
//! Provides `OracleClient`, which implements `DatabaseClient` on top of the
//! `oracle` crate (ODPI-C). The driver is blocking, so every call runs on the
//! tokio blocking pool.

use crate::bind::{BindMap, BindValue};
use crate::config::Credentials;
use crate::db::{
    ColumnInfo, Connector, DatabaseClient, ExecuteOptions, QueryResult, Record, Value,
};
use crate::error::{NodeError, Result};
use async_trait::async_trait;
use oracle::sql_type::{OracleType, ToSql};
use oracle::{Connection, SqlValue};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::debug;

/// Largest magnitude an integral f64 can have and still bind exactly as i64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Opens `OracleClient` connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleConnector;

#[async_trait]
impl Connector for OracleConnector {
    async fn connect(&self, credentials: &Credentials) -> Result<Box<dyn DatabaseClient>> {
        let client = OracleClient::connect(credentials).await?;
        Ok(Box::new(client))
    }
}

/// A single Oracle connection.
///
/// The connection is taken out of the slot on `close`, so later calls fail
/// with a connection error instead of touching a released handle.
pub struct OracleClient {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl OracleClient {
    /// Connects with the given credentials.
    pub async fn connect(credentials: &Credentials) -> Result<Self> {
        let user = credentials.user()?.to_string();
        let password = credentials.password().to_string();
        let connect_string = credentials.connection_string()?.to_string();

        debug!("Connecting to {}", credentials.display_string());

        let conn = tokio::task::spawn_blocking(move || {
            Connection::connect(&user, &password, &connect_string)
        })
        .await
        .map_err(|e| NodeError::internal(format!("Connect task failed: {e}")))?
        .map_err(|e| NodeError::connection(e.to_string()))?;

        debug!("Successfully connected to database");

        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }
}

#[async_trait]
impl DatabaseClient for OracleClient {
    async fn execute(
        &self,
        sql: &str,
        binds: &BindMap,
        options: ExecuteOptions,
    ) -> Result<QueryResult> {
        let conn = Arc::clone(&self.conn);
        let sql = sql.to_string();
        let binds = binds.clone();
        let start = Instant::now();

        let result = tokio::task::spawn_blocking(move || {
            let mut slot = conn.lock().unwrap_or_else(PoisonError::into_inner);
            let conn = slot
                .as_mut()
                .ok_or_else(|| NodeError::connection("Connection is already closed"))?;
            run_statement(conn, &sql, &binds, options)
        })
        .await
        .map_err(|e| NodeError::internal(format!("Execute task failed: {e}")))??;

        Ok(result.with_execution_time(start.elapsed()))
    }

    async fn close(&self) -> Result<()> {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let taken = conn.lock().unwrap_or_else(PoisonError::into_inner).take();
            match taken {
                Some(conn) => conn.close().map_err(|e| NodeError::connection(e.to_string())),
                None => Ok(()),
            }
        })
        .await
        .map_err(|e| NodeError::internal(format!("Close task failed: {e}")))?
    }
}

/// Runs one statement: queries return records, everything else reports the
/// affected row count.
fn run_statement(
    conn: &mut Connection,
    sql: &str,
    binds: &BindMap,
    options: ExecuteOptions,
) -> Result<QueryResult> {
    conn.set_autocommit(options.auto_commit);

    let owned: Vec<(&str, Box<dyn ToSql>)> = binds
        .iter()
        .map(|(name, param)| (name.as_str(), to_sql(&param.value)))
        .collect();
    let params: Vec<(&str, &dyn ToSql)> = owned
        .iter()
        .map(|(name, value)| (*name, value.as_ref()))
        .collect();

    let mut stmt = conn.statement(sql).build().map_err(query_error)?;

    if !stmt.is_query() {
        stmt.execute_named(&params).map_err(query_error)?;
        let count = stmt.row_count().map_err(query_error)?;
        debug!("Statement affected {} row(s)", count);
        return Ok(QueryResult::with_rows_affected(count));
    }

    let rows = stmt.query_named(&params).map_err(query_error)?;

    let column_types: Vec<(String, OracleType)> = rows
        .column_info()
        .iter()
        .map(|col| (col.name().to_string(), col.oracle_type().clone()))
        .collect();
    let columns = column_types
        .iter()
        .map(|(name, oracle_type)| ColumnInfo::new(name.as_str(), oracle_type.to_string()))
        .collect();

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(query_error)?;
        let mut record = Record::with_capacity(column_types.len());
        for ((name, oracle_type), value) in column_types.iter().zip(row.sql_values()) {
            record.insert(name.as_str(), convert_value(value, oracle_type));
        }
        records.push(record);
    }

    debug!("Query returned {} row(s)", records.len());

    Ok(QueryResult::with_rows(columns, records))
}

/// Converts a bind value into something the driver can bind.
///
/// Integral numbers bind as `i64` so comparisons against integer `NUMBER`
/// columns stay exact; everything else numeric binds as a double.
fn to_sql(value: &BindValue) -> Box<dyn ToSql> {
    match value {
        BindValue::Text(s) => Box::new(s.clone()),
        BindValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER => {
            Box::new(*n as i64)
        }
        BindValue::Number(n) => Box::new(*n),
    }
}

/// Maps a column value to a `Value` based on its Oracle type.
fn convert_value(value: &SqlValue, oracle_type: &OracleType) -> Value {
    if value.is_null().unwrap_or(true) {
        return Value::Null;
    }

    match oracle_type {
        OracleType::Number(_, scale) if *scale > 0 => float_or_text(value),

        // NUMBER without declared scale (including computed columns) may still
        // hold integers; prefer the exact form when it fits.
        OracleType::Number(_, _) | OracleType::Int64 => value
            .get::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| float_or_text(value)),

        OracleType::Float(_) | OracleType::BinaryFloat | OracleType::BinaryDouble => {
            float_or_text(value)
        }

        OracleType::Boolean => value.get::<bool>().map(Value::Bool).unwrap_or(Value::Null),

        OracleType::Raw(_) | OracleType::BLOB | OracleType::LongRaw => value
            .get::<Vec<u8>>()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // Character data, dates, timestamps, intervals, CLOBs, ROWIDs.
        _ => text(value),
    }
}

fn float_or_text(value: &SqlValue) -> Value {
    value
        .get::<f64>()
        .map(Value::Float)
        .unwrap_or_else(|_| text(value))
}

fn text(value: &SqlValue) -> Value {
    value
        .get::<String>()
        .map(Value::String)
        .unwrap_or(Value::Null)
}

fn query_error(error: oracle::Error) -> NodeError {
    NodeError::query(error.to_string())
}
