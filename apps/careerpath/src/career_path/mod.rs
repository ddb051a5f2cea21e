//! Career-path API client: create/read/update/delete against
//! `{base_url}/career-path`.
//!
//! Single-shot calls: no retries, no auth. Any failure comes back as a
//! `CareerPathError` naming the action that failed.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::models::career_path::CareerPath;

const RESOURCE: &str = "career-path";

#[derive(Debug, Error)]
pub enum CareerPathError {
    #[error("Failed to {action} career path: {source}")]
    Http {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to {action} career path (status {status}): {message}")]
    Api {
        action: &'static str,
        status: u16,
        message: String,
    },

    #[error("Failed to {action} career path: invalid response body: {source}")]
    Parse {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl CareerPathError {
    pub fn status(&self) -> Option<u16> {
        match self {
            CareerPathError::Api { status, .. } => Some(*status),
            CareerPathError::Http { source, .. } => source.status().map(|s| s.as_u16()),
            CareerPathError::Parse { .. } => None,
        }
    }
}

/// Error bodies the API may return: `{"message": ...}` or `{"error": ...}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct CareerPathClient {
    client: Client,
    base_url: String,
}

impl CareerPathClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.career_path_api_url, config.http_timeout())
    }

    fn collection_url(&self) -> String {
        format!("{}/{RESOURCE}", self.base_url)
    }

    /// Item URL with `id` percent-encoded as a single path segment.
    fn item_url(&self, id: &str) -> String {
        let mut url = match Url::parse(&self.collection_url()) {
            Ok(url) => url,
            // Unparseable base: reqwest rejects it at send time with a builder error.
            Err(_) => return format!("{}/{id}", self.collection_url()),
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url.to_string()
    }

    pub async fn create(&self, path: &CareerPath) -> Result<CareerPath, CareerPathError> {
        let action = "create";
        let response = self
            .client
            .post(self.collection_url())
            .json(path)
            .send()
            .await
            .map_err(|source| CareerPathError::Http { action, source })?;
        decode(action, response).await
    }

    pub async fn get(&self, id: &str) -> Result<CareerPath, CareerPathError> {
        let action = "fetch";
        let response = self
            .client
            .get(self.item_url(id))
            .send()
            .await
            .map_err(|source| CareerPathError::Http { action, source })?;
        decode(action, response).await
    }

    pub async fn update(&self, id: &str, path: &CareerPath) -> Result<CareerPath, CareerPathError> {
        let action = "update";
        let response = self
            .client
            .put(self.item_url(id))
            .json(path)
            .send()
            .await
            .map_err(|source| CareerPathError::Http { action, source })?;
        decode(action, response).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), CareerPathError> {
        let action = "delete";
        let response = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(|source| CareerPathError::Http { action, source })?;
        check_status(action, response).await?;
        debug!("Deleted career path {id}");
        Ok(())
    }
}

/// Passes 2xx responses through; anything else becomes `CareerPathError::Api`
/// carrying the server's message when it sent one.
async fn check_status(action: &'static str, response: Response) -> Result<Response, CareerPathError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            } else {
                body
            }
        });

    Err(CareerPathError::Api {
        action,
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(
    action: &'static str,
    response: Response,
) -> Result<T, CareerPathError> {
    let response = check_status(action, response).await?;
    let value = response
        .json::<T>()
        .await
        .map_err(|source| CareerPathError::Parse { action, source })?;
    debug!("Career path {action} succeeded");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    type Calls = Arc<Mutex<Vec<(String, Option<String>, Option<Value>)>>>;

    async fn create_handler(
        State(calls): State<Calls>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        calls
            .lock()
            .unwrap()
            .push(("POST".into(), None, Some(body.clone())));
        let mut created = body;
        created["id"] = json!(101);
        (StatusCode::CREATED, Json(created))
    }

    async fn get_handler(
        State(calls): State<Calls>,
        Path(id): Path<String>,
    ) -> (StatusCode, Json<Value>) {
        calls.lock().unwrap().push(("GET".into(), Some(id.clone()), None));
        match id.as_str() {
            "7" => (
                StatusCode::OK,
                Json(json!({"id": "7", "title": "Cloud Architect", "skills": ["aws", "terraform"]})),
            ),
            "garbled" => (StatusCode::OK, Json(json!(["not", "an", "object"]))),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({"message": "Career path not found"})),
            ),
        }
    }

    async fn put_handler(
        State(calls): State<Calls>,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        calls
            .lock()
            .unwrap()
            .push(("PUT".into(), Some(id.clone()), Some(body.clone())));
        let mut updated = body;
        updated["id"] = json!(id);
        Json(updated)
    }

    async fn delete_handler(State(calls): State<Calls>, Path(id): Path<String>) -> StatusCode {
        calls.lock().unwrap().push(("DELETE".into(), Some(id.clone()), None));
        if id == "locked" {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::NO_CONTENT
        }
    }

    async fn spawn() -> (CareerPathClient, Calls) {
        let calls = Calls::default();
        let app = Router::new()
            .route("/api/career-path", post(create_handler))
            .route(
                "/api/career-path/:id",
                get(get_handler).put(put_handler).delete(delete_handler),
            )
            .with_state(calls.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let client = CareerPathClient::new(&format!("http://{addr}/api/"), Duration::from_secs(5));
        (client, calls)
    }

    #[tokio::test]
    async fn test_create_posts_json_and_returns_created() {
        let (client, calls) = spawn().await;
        let path = CareerPath {
            title: Some("ML Engineer".into()),
            skills: vec!["python".into()],
            ..CareerPath::default()
        };

        let created = client.create(&path).await.unwrap();

        assert_eq!(created.id.as_deref(), Some("101"));
        assert_eq!(created.title.as_deref(), Some("ML Engineer"));
        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].0, "POST");
        assert_eq!(
            calls[0].2,
            Some(json!({"title": "ML Engineer", "skills": ["python"]}))
        );
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (client, _) = spawn().await;
        let path = client.get("7").await.unwrap();
        assert_eq!(path.title.as_deref(), Some("Cloud Architect"));
        assert_eq!(path.skills, vec!["aws", "terraform"]);
    }

    #[tokio::test]
    async fn test_not_found_carries_server_message() {
        let (client, _) = spawn().await;
        let err = client.get("404").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "Failed to fetch career path (status 404): Career path not found"
        );
    }

    #[tokio::test]
    async fn test_unexpected_body_is_parse_error() {
        let (client, _) = spawn().await;
        let err = client.get("garbled").await.unwrap_err();
        assert!(matches!(err, CareerPathError::Parse { action: "fetch", .. }));
    }

    #[tokio::test]
    async fn test_reserved_characters_in_id_stay_in_one_segment() {
        let (client, calls) = spawn().await;

        for id in ["a/b", "x?y=1", "50% off"] {
            let err = client.get(id).await.unwrap_err();
            assert_eq!(err.status(), Some(404), "{id}");
        }

        let seen: Vec<_> = calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, id, _)| id.clone().unwrap())
            .collect();
        assert_eq!(seen, vec!["a/b", "x?y=1", "50% off"]);
    }

    #[test]
    fn test_item_url_encodes_id() {
        let client = CareerPathClient::new("http://localhost:5000/api/", Duration::from_secs(1));
        assert_eq!(
            client.item_url("a/b?c"),
            "http://localhost:5000/api/career-path/a%2Fb%3Fc"
        );
        assert_eq!(client.item_url("7"), "http://localhost:5000/api/career-path/7");
    }

    #[tokio::test]
    async fn test_update_puts_to_item_url() {
        let (client, calls) = spawn().await;
        let path = CareerPath {
            description: Some("Owns the data platform".into()),
            ..CareerPath::default()
        };

        let updated = client.update("12", &path).await.unwrap();

        assert_eq!(updated.id.as_deref(), Some("12"));
        assert_eq!(calls.lock().unwrap()[0].1.as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn test_delete_success_and_failure() {
        let (client, calls) = spawn().await;
        client.delete("3").await.unwrap();

        let err = client.delete("locked").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().starts_with("Failed to delete career path (status 500)"));
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = CareerPathClient::new(&format!("http://{addr}"), Duration::from_secs(2));

        let err = client.get("1").await.unwrap_err();

        assert!(matches!(err, CareerPathError::Http { action: "fetch", .. }));
        assert!(err.to_string().starts_with("Failed to fetch career path"));
    }
}
