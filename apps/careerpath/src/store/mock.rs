//! In-memory store for tests: records every call and fails on demand.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::store::{Filter, Row, Store};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Select(String),
    Insert(String, Row),
    Delete(String, Filter),
}

#[derive(Default)]
pub struct MockStore {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    calls: Mutex<Vec<Call>>,
    /// Tables whose every operation fails with the given code.
    failing_tables: Mutex<HashMap<String, Option<String>>>,
    /// (table, id) pairs whose delete fails.
    failing_deletes: Mutex<HashSet<(String, String)>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, table: &str, rows: Vec<Row>) -> Self {
        self.tables.lock().unwrap().insert(table.to_string(), rows);
        self
    }

    pub fn fail_table(self, table: &str, code: Option<&str>) -> Self {
        self.failing_tables
            .lock()
            .unwrap()
            .insert(table.to_string(), code.map(str::to_string));
        self
    }

    pub fn fail_delete(self, table: &str, id: &str) -> Self {
        self.failing_deletes
            .lock()
            .unwrap()
            .insert((table.to_string(), id.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn check_table(&self, table: &str) -> Result<(), StoreError> {
        match self.failing_tables.lock().unwrap().get(table) {
            Some(code) => Err(StoreError::backend(
                code.as_deref(),
                format!("{table} is unavailable"),
            )),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Store for MockStore {
    async fn select(
        &self,
        table: &str,
        columns: &[&str],
        filters: &[Filter],
    ) -> Result<Vec<Row>, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Select(table.to_string()));
        self.check_table(table)?;
        Ok(self
            .rows(table)
            .into_iter()
            .filter(|row| filters.iter().all(|f| f.matches(row)))
            .map(|row| {
                row.into_iter()
                    .filter(|(k, _)| columns.is_empty() || columns.contains(&k.as_str()))
                    .collect()
            })
            .collect())
    }

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Insert(table.to_string(), row.clone()));
        self.check_table(table)?;
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Delete(table.to_string(), filter.clone()));
        self.check_table(table)?;
        if self
            .failing_deletes
            .lock()
            .unwrap()
            .contains(&(table.to_string(), filter.value().to_string()))
        {
            return Err(StoreError::backend(None, "row is locked"));
        }
        if let Some(rows) = self.tables.lock().unwrap().get_mut(table) {
            rows.retain(|row| !filter.matches(row));
        }
        Ok(())
    }
}
