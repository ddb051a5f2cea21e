//! Direct Postgres store backend over sqlx.
//!
//! Rows travel as JSON in both directions so the backend stays schema-agnostic:
//! selects aggregate with `json_agg`, inserts go through `jsonb_populate_record`.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::store::{check_identifier, Filter, Row, Store};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }
}

fn quote(ident: &str) -> Result<String, StoreError> {
    Ok(format!("\"{}\"", check_identifier(ident)?))
}

/// Builds a `WHERE` clause whose placeholders start at `$1`, in filter order.
fn where_clause(filters: &[Filter]) -> Result<String, StoreError> {
    if filters.is_empty() {
        return Ok(String::new());
    }
    let parts = filters
        .iter()
        .enumerate()
        .map(|(i, f)| -> Result<String, StoreError> {
            let column = quote(f.column())?;
            Ok(match f {
                Filter::Eq(..) => format!("{column}::text = ${}", i + 1),
                Filter::Neq(..) => format!("{column}::text <> ${}", i + 1),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!(" WHERE {}", parts.join(" AND ")))
}

fn select_sql(table: &str, columns: &[&str], filters: &[Filter]) -> Result<String, StoreError> {
    let projection = if columns.is_empty() {
        "*".to_string()
    } else {
        columns
            .iter()
            .map(|c| quote(c))
            .collect::<Result<Vec<_>, _>>()?
            .join(", ")
    };
    Ok(format!(
        "SELECT COALESCE(json_agg(t), '[]'::json) FROM (SELECT {projection} FROM {}{}) t",
        quote(table)?,
        where_clause(filters)?
    ))
}

fn insert_sql(table: &str, row: &Row) -> Result<String, StoreError> {
    let table = quote(table)?;
    if row.is_empty() {
        return Ok(format!("INSERT INTO {table} DEFAULT VALUES"));
    }
    let columns = row
        .keys()
        .map(|c| quote(c))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");
    Ok(format!(
        "INSERT INTO {table} ({columns}) SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1)"
    ))
}

fn delete_sql(table: &str, filter: &Filter) -> Result<String, StoreError> {
    Ok(format!(
        "DELETE FROM {}{}",
        quote(table)?,
        where_clause(std::slice::from_ref(filter))?
    ))
}

#[async_trait]
impl Store for PgStore {
    async fn select(
        &self,
        table: &str,
        columns: &[&str],
        filters: &[Filter],
    ) -> Result<Vec<Row>, StoreError> {
        let sql = select_sql(table, columns, filters)?;
        let mut query = sqlx::query_scalar::<_, Value>(&sql);
        for filter in filters {
            query = query.bind(filter.value());
        }
        let rows = match query.fetch_one(&self.pool).await? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect::<Vec<Row>>(),
            other => {
                return Err(StoreError::Decode(format!(
                    "expected JSON array from {table}, got {other}"
                )))
            }
        };
        debug!("Selected {} rows from {table}", rows.len());
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError> {
        let sql = insert_sql(table, &row)?;
        let mut query = sqlx::query(&sql);
        if !row.is_empty() {
            query = query.bind(Value::Object(row));
        }
        query.execute(&self.pool).await?;
        debug!("Inserted row into {table}");
        Ok(())
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), StoreError> {
        let sql = delete_sql(table, filter)?;
        let result = sqlx::query(&sql)
            .bind(filter.value())
            .execute(&self.pool)
            .await?;
        debug!(
            "Deleted {} rows from {table} where {} = {}",
            result.rows_affected(),
            filter.column(),
            filter.value()
        );
        Ok(())
    }
}
