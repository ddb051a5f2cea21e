//! Persistent store collaborator.
//!
//! The moderation pipeline only ever needs three operations against a table:
//! a projected, filtered select; an insert; and a delete by equality.
//! Backends implement [`Store`] and are carried as `Arc<dyn Store>`.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::StoreError;

pub mod postgres;
pub mod rest;

#[cfg(test)]
pub(crate) mod mock;

pub use postgres::PgStore;
pub use rest::RestStore;

/// A record as returned by the store: column name to JSON value.
pub type Row = Map<String, Value>;

/// Column filter applied to selects and deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq(String, String),
    Neq(String, String),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq(column.into(), value.into())
    }

    pub fn neq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Neq(column.into(), value.into())
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(c, _) | Filter::Neq(c, _) => c,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Filter::Eq(_, v) | Filter::Neq(_, v) => v,
        }
    }

    /// Whether a row satisfies this filter, comparing the column's textual form.
    ///
    /// SQL comparison semantics, matching PostgREST `eq.`/`neq.`: a null or
    /// missing column satisfies neither `Eq` nor `Neq`.
    pub fn matches(&self, row: &Row) -> bool {
        let Some(actual) = row.get(self.column()).and_then(value_as_id) else {
            return false;
        };
        match self {
            Filter::Eq(_, v) => actual == *v,
            Filter::Neq(_, v) => actual != *v,
        }
    }
}

/// Renders a scalar JSON value as an id string. Strings pass through,
/// numbers and booleans are printed; null and composites yield `None`.
pub fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Returns `columns` of every row in `table` that passes all `filters`.
    async fn select(
        &self,
        table: &str,
        columns: &[&str],
        filters: &[Filter],
    ) -> Result<Vec<Row>, StoreError>;

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError>;

    /// Deletes every row in `table` matching `filter`.
    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), StoreError>;
}

/// Accepts plain SQL identifiers only (`[A-Za-z_][A-Za-z0-9_]*`).
pub(crate) fn check_identifier(ident: &str) -> Result<&str, StoreError> {
    let mut chars = ident.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(ident)
    } else {
        Err(StoreError::InvalidIdentifier(ident.to_string()))
    }
}
