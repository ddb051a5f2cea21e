use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Library configuration loaded from environment variables.
/// Fails fast if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub career_path_api_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub database_url: Option<String>,
    pub http_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration against an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            career_path_api_url: lookup("CAREER_PATH_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            supabase_url: require("SUPABASE_URL")?,
            supabase_anon_key: require("SUPABASE_ANON_KEY")?,
            database_url: lookup("DATABASE_URL"),
            http_timeout_secs: match lookup("HTTP_TIMEOUT_SECS") {
                Some(v) => v
                    .parse::<u64>()
                    .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
                None => DEFAULT_TIMEOUT_SECS,
            },
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://example.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();
        assert_eq!(config.career_path_api_url, "http://localhost:5000/api");
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.rust_log, "info");
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_missing_required_variable_is_named() {
        let err = Config::from_lookup(lookup_from(&[("SUPABASE_URL", "https://x")])).unwrap_err();
        assert!(err.to_string().contains("SUPABASE_ANON_KEY"));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://x"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("HTTP_TIMEOUT_SECS", "soon"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_respected() {
        let config = Config::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://x"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("CAREER_PATH_API_URL", "https://api.example.com"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("DATABASE_URL", "postgres://localhost/app"),
        ]))
        .unwrap();
        assert_eq!(config.career_path_api_url, "https://api.example.com");
        assert_eq!(config.http_timeout(), std::time::Duration::from_secs(5));
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/app"));
    }
}
