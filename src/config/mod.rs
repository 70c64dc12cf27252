use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub api: ApiConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub min_password_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Rows returned by the sensor read endpoint when `limit` is absent or invalid
    pub default_row_limit: i64,
    /// Hard ceiling on the `limit` query parameter
    pub max_row_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Leading logger-metadata records skipped before the header row
    pub skip_rows: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        Self::defaults(environment).with_env_overrides()
    }

    fn defaults(environment: Environment) -> Self {
        Self {
            environment,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                min_password_length: 8,
            },
            api: ApiConfig {
                default_row_limit: 500,
                max_row_limit: 10_000,
            },
            ingest: IngestConfig { skip_rows: 29 },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("MIN_PASSWORD_LENGTH") {
            self.security.min_password_length =
                v.parse().unwrap_or(self.security.min_password_length);
        }

        // API overrides
        if let Ok(v) = env::var("API_DEFAULT_ROW_LIMIT") {
            self.api.default_row_limit = v.parse().unwrap_or(self.api.default_row_limit);
        }
        if let Ok(v) = env::var("API_MAX_ROW_LIMIT") {
            self.api.max_row_limit = v.parse().unwrap_or(self.api.max_row_limit);
        }

        // Ingest overrides
        if let Ok(v) = env::var("INGEST_SKIP_ROWS") {
            self.ingest.skip_rows = v.parse().unwrap_or(self.ingest.skip_rows);
        }

        self
    }
}

static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

/// Global configuration singleton, loaded once from the environment
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_contract() {
        let cfg = AppConfig::defaults(Environment::Development);
        assert_eq!(cfg.api.default_row_limit, 500);
        assert_eq!(cfg.api.max_row_limit, 10_000);
        assert_eq!(cfg.ingest.skip_rows, 29);
        assert_eq!(cfg.security.min_password_length, 8);
    }
}
