use thiserror::Error;

/// Postgres SQLSTATE for "relation does not exist".
pub const UNDEFINED_TABLE: &str = "42P01";
/// PostgREST code for a table missing from its schema cache.
pub const TABLE_NOT_IN_SCHEMA_CACHE: &str = "PGRST205";

/// Failure surfaced by a [`Store`](crate::store::Store) backend.
///
/// Backends map their native errors into this shape so callers can branch
/// on `code` without knowing which backend they are talking to.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store error{}: {message}", code_suffix(.code))]
    Backend {
        code: Option<String>,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default()
}

impl StoreError {
    pub fn backend(code: Option<&str>, message: impl Into<String>) -> Self {
        StoreError::Backend {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// The backend error code, when one was reported.
    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::Backend { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// True when the failure means the target table does not exist.
    pub fn is_missing_relation(&self) -> bool {
        matches!(
            self.code(),
            Some(UNDEFINED_TABLE) | Some(TABLE_NOT_IN_SCHEMA_CACHE)
        )
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => StoreError::Backend {
                code: db.code().map(|c| c.into_owned()),
                message: db.message().to_string(),
            },
            _ => StoreError::Database(err),
        }
    }
}
