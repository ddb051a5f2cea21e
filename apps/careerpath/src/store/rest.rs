//! PostgREST-style store backend (the hosted Supabase REST surface).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::errors::StoreError;
use crate::store::{check_identifier, Filter, Row, Store};

/// Error body returned by PostgREST on failure.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

/// Store backed by a PostgREST endpoint at `{base_url}/rest/v1`.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.supabase_url,
            &config.supabase_anon_key,
            config.http_timeout(),
        )
    }

    fn table_url(&self, table: &str) -> Result<String, StoreError> {
        Ok(format!("{}/rest/v1/{}", self.base_url, check_identifier(table)?))
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

fn filter_param(filter: &Filter) -> Result<(String, String), StoreError> {
    let column = check_identifier(filter.column())?.to_string();
    let op = match filter {
        Filter::Eq(..) => "eq",
        Filter::Neq(..) => "neq",
    };
    Ok((column, format!("{op}.{}", filter.value())))
}

/// Turns a non-2xx response into a `StoreError`, preferring the PostgREST
/// error body and falling back to the raw text.
async fn error_from_response(response: Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<PostgrestError>(&body) {
        Ok(err) => {
            let mut message = err
                .message
                .unwrap_or_else(|| format!("request failed with status {status}"));
            if let Some(details) = err.details.filter(|d| !d.is_empty()) {
                message = format!("{message} ({details})");
            }
            StoreError::Backend {
                code: err.code,
                message,
            }
        }
        Err(_) => StoreError::Backend {
            code: None,
            message: if body.is_empty() {
                format!("request failed with status {status}")
            } else {
                body
            },
        },
    }
}

#[async_trait]
impl Store for RestStore {
    async fn select(
        &self,
        table: &str,
        columns: &[&str],
        filters: &[Filter],
    ) -> Result<Vec<Row>, StoreError> {
        let mut params = Vec::with_capacity(filters.len() + 1);
        let projection = columns
            .iter()
            .map(|c| check_identifier(c))
            .collect::<Result<Vec<_>, _>>()?
            .join(",");
        if projection.is_empty() {
            params.push(("select".to_string(), "*".to_string()));
        } else {
            params.push(("select".to_string(), projection));
        }
        for filter in filters {
            params.push(filter_param(filter)?);
        }

        let response = self
            .request(reqwest::Method::GET, self.table_url(table)?)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let rows: Vec<Row> = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(format!("select on {table}: {e}")))?;
        debug!("Selected {} rows from {table}", rows.len());
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Row) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::POST, self.table_url(table)?)
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        debug!("Inserted row into {table}");
        Ok(())
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::DELETE, self.table_url(table)?)
            .query(&[filter_param(filter)?])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        debug!("Deleted from {table} where {} = {}", filter.column(), filter.value());
        Ok(())
    }
}
