use std::str::FromStr;

use axum::http::HeaderValue;

use todos_core::read_plan::QueryParamMode;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for local development.
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// A configuration value that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{name} must be {expected}, got '{value}'")]
pub struct ConfigError {
    pub name: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Maximum pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// Handling of malformed list query parameters (default: strict).
    pub query_param_mode: QueryParamMode,
    /// Log output format (default: pretty).
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
            request_timeout_secs: 30,
            database_url: None,
            db_max_connections: 20,
            query_param_mode: QueryParamMode::Strict,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`         | unset (in-memory store)    |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    /// | `QUERY_PARAM_MODE`     | `strict`                   |
    /// | `LOG_FORMAT`           | `pretty`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let host = get("HOST").unwrap_or(defaults.host);

        let port = match get("PORT") {
            Some(raw) => parse(raw, "PORT", "a valid port number")?,
            None => defaults.port,
        };

        let cors_origins = match get("CORS_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None => defaults.cors_origins,
        };

        let request_timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => parse(raw, "REQUEST_TIMEOUT_SECS", "a whole number of seconds")?,
            None => defaults.request_timeout_secs,
        };

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => parse(raw, "DB_MAX_CONNECTIONS", "a positive integer")?,
            None => defaults.db_max_connections,
        };

        let query_param_mode = match get("QUERY_PARAM_MODE") {
            Some(raw) => parse(raw, "QUERY_PARAM_MODE", "one of: strict, lenient")?,
            None => defaults.query_param_mode,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => parse(raw, "LOG_FORMAT", "one of: pretty, json")?,
            None => defaults.log_format,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url: get("DATABASE_URL"),
            db_max_connections,
            query_param_mode,
            log_format,
        })
    }
}

fn parse<T: FromStr>(raw: String, name: &'static str, expected: &'static str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError {
        name,
        expected,
        value: raw,
    })
}

/// Split a comma-separated origin list. `*` is refused because
/// credentialed CORS needs explicit origins.
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .ok()
                .filter(|_| origin != "*")
                .ok_or_else(|| ConfigError {
                    name: "CORS_ORIGINS",
                    expected: "a comma-separated list of explicit origins",
                    value: origin.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, [HeaderValue::from_static("http://localhost:5173")]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.database_url, None);
        assert_eq!(config.query_param_mode, QueryParamMode::Strict);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("DATABASE_URL", "postgres://localhost/todos"),
            ("QUERY_PARAM_MODE", "lenient"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors_origins,
            [
                HeaderValue::from_static("http://a.test"),
                HeaderValue::from_static("http://b.test"),
            ]
        );
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/todos"));
        assert_eq!(config.query_param_mode, QueryParamMode::Lenient);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn empty_database_url_means_in_memory() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err.name, "PORT");
        assert!(err.to_string().contains("eighty"));

        let err = config_from(&[("QUERY_PARAM_MODE", "loose")]).unwrap_err();
        assert_eq!(err.name, "QUERY_PARAM_MODE");
    }

    #[test]
    fn invalid_cors_origin_is_a_config_error() {
        let err = config_from(&[("CORS_ORIGINS", "http://ok.test,http://bad\u{7f}.test")])
            .unwrap_err();
        assert_eq!(err.name, "CORS_ORIGINS");
        assert!(err.value.starts_with("http://bad"));

        let err = config_from(&[("CORS_ORIGINS", "*")]).unwrap_err();
        assert_eq!(err.name, "CORS_ORIGINS");
        assert_eq!(err.value, "*");
    }
}
