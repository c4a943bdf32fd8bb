//! Server configuration.

use std::env;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL. The scheme selects the backend.
    pub database_url: String,
    /// Public base URL used in cards and launch metadata.
    pub public_url: String,
    /// Base URL of the message verification hub.
    pub hub_url: String,
    /// API key sent to the hub.
    pub hub_api_key: Option<String>,
    /// Points award endpoint. Awarding is disabled when unset.
    pub points_url: Option<String>,
    /// Notification relay endpoint. Notifications are disabled when unset.
    pub notify_url: Option<String>,
    /// JWT secret for session tokens.
    pub jwt_secret: Option<String>,
    /// JWT expiration in hours.
    pub jwt_expiration_hours: u64,
    /// Timeout for outbound HTTP calls.
    pub http_timeout_secs: u64,
    /// Log level.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: "sqlite:todocast.db?mode=rwc".to_string(),
            public_url: "http://localhost:3000".to_string(),
            hub_url: "https://api.neynar.com".to_string(),
            hub_api_key: None,
            points_url: None,
            notify_url: None,
            jwt_secret: None,
            jwt_expiration_hours: auth::DEFAULT_JWT_EXPIRATION_HOURS,
            http_timeout_secs: 10,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match env::var("TODOCAST_SERVER_PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| anyhow::anyhow!("TODOCAST_SERVER_PORT is not a port: {}", value))?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            host: env::var("TODOCAST_SERVER_HOST").unwrap_or(defaults.host),
            port,
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            public_url: env::var("TODOCAST_PUBLIC_URL").unwrap_or(defaults.public_url),
            hub_url: env::var("TODOCAST_HUB_URL").unwrap_or(defaults.hub_url),
            hub_api_key: non_empty_var("TODOCAST_HUB_API_KEY"),
            points_url: non_empty_var("TODOCAST_POINTS_URL"),
            notify_url: non_empty_var("TODOCAST_NOTIFY_URL"),
            jwt_secret: non_empty_var("TODOCAST_JWT_SECRET"),
            jwt_expiration_hours: match env::var("TODOCAST_JWT_EXPIRATION_HOURS") {
                Ok(value) => parse_expiration_hours(&value)?,
                Err(_) => defaults.jwt_expiration_hours,
            },
            http_timeout_secs: env::var("TODOCAST_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
            log_level: env::var("TODOCAST_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the timeout for outbound HTTP calls.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Returns the storage backend selected by the database URL.
    pub fn database_backend(&self) -> anyhow::Result<DatabaseBackend> {
        if self.database_url.starts_with("sqlite:") {
            Ok(DatabaseBackend::Sqlite)
        } else if self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://")
        {
            Ok(DatabaseBackend::Postgres)
        } else {
            anyhow::bail!("Unsupported DATABASE_URL scheme: {}", self.database_url)
        }
    }
}

/// Storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

fn parse_expiration_hours(value: &str) -> anyhow::Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(hours) if (1..=auth::MAX_JWT_EXPIRATION_HOURS).contains(&hours) => Ok(hours),
        _ => anyhow::bail!(
            "TODOCAST_JWT_EXPIRATION_HOURS must be between 1 and {}: {}",
            auth::MAX_JWT_EXPIRATION_HOURS,
            value
        ),
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.http_timeout(), Duration::from_secs(10));
        assert!(config.points_url.is_none());
        assert_eq!(config.database_backend().unwrap(), DatabaseBackend::Sqlite);
    }

    #[test]
    fn test_database_backend() {
        let mut config = Config {
            database_url: "postgres://user@localhost/todocast".to_string(),
            ..Config::default()
        };
        assert_eq!(config.database_backend().unwrap(), DatabaseBackend::Postgres);

        config.database_url = "mysql://localhost/todocast".to_string();
        assert!(config.database_backend().is_err());
    }

    #[test]
    fn test_expiration_hours_bounds() {
        assert_eq!(parse_expiration_hours("48").unwrap(), 48);
        assert!(parse_expiration_hours("0").is_err());
        assert!(parse_expiration_hours("18446744073709551615").is_err());
        assert!(parse_expiration_hours("soon").is_err());
    }
}
