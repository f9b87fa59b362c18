//! Service configuration from environment variables. A `.env` file in the working directory is loaded first when present.

use crate::error::ConfigError;
use sqlx::postgres::PgSslMode;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub api: ApiConfig,
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// How long in-flight requests get to finish after a shutdown signal.
    pub graceful_timeout: Duration,
    /// Adds a per-request tracing layer.
    pub request_log: bool,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[derive(Clone, Debug, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub ssl_mode: PgSslMode,
    pub max_connections: u32,
    pub max_lifetime: Duration,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .field("max_lifetime", &self.max_lifetime)
            .finish()
    }
}

impl Config {
    /// Load `.env` (if any), then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);
        Ok(Config {
            api: ApiConfig {
                host: vars.required("API_HOST")?,
                port: vars.required_parsed("API_PORT")?,
                graceful_timeout: Duration::from_secs(vars.parsed_or("API_GRACEFUL_TIMEOUT", 10)?),
                request_log: vars.parsed_or("API_REQUEST_LOG", false)?,
            },
            app: AppConfig {
                environment: vars.required("APP_ENVIRONMENT")?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .optional("CORS_ALLOWED_ORIGINS")
                    .map(|v| {
                        v.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                host: vars.required("DB_HOST")?,
                port: vars.required_parsed("DB_PORT")?,
                name: vars.required("DB_NAME")?,
                user: vars.required("DB_USER")?,
                password: vars.required("DB_PASSWORD")?,
                ssl_mode: vars.parsed_or("DB_SSL_MODE", PgSslMode::Prefer)?,
                max_connections: vars.parsed_or("DB_MAX_CONNECTION_POOL", 5)?,
                max_lifetime: Duration::from_secs(vars.parsed_or("DB_CONNECTIONS_MAX_LIFE_TIME", 1800)?),
            },
        })
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn optional(&self, var: &'static str) -> Option<String> {
        (self.0)(var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, var: &'static str) -> Result<String, ConfigError> {
        self.optional(var).ok_or(ConfigError::Missing(var))
    }

    fn required_parsed<T: FromStr>(&self, var: &'static str) -> Result<T, ConfigError> {
        parse(var, self.required(var)?)
    }

    fn parsed_or<T: FromStr>(&self, var: &'static str, default: T) -> Result<T, ConfigError> {
        match self.optional(var) {
            Some(value) => parse(var, value),
            None => Ok(default),
        }
    }
}

fn parse<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    match value.parse() {
        Ok(v) => Ok(v),
        Err(_) => Err(ConfigError::Invalid { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "8080"),
            ("APP_ENVIRONMENT", "development"),
            ("DB_HOST", "localhost"),
            ("DB_PORT", "5432"),
            ("DB_NAME", "tasks"),
            ("DB_USER", "postgres"),
            ("DB_PASSWORD", "secret"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_fill_optional_values() {
        let cfg = load(&base()).unwrap();
        assert_eq!(cfg.api.port, 8080);
        assert_eq!(cfg.api.graceful_timeout, Duration::from_secs(10));
        assert!(!cfg.api.request_log);
        assert!(cfg.app.is_development());
        assert!(cfg.cors.allowed_origins.is_empty());
        assert!(matches!(cfg.database.ssl_mode, PgSslMode::Prefer));
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.max_lifetime, Duration::from_secs(1800));
    }

    #[test]
    fn reads_overrides() {
        let mut vars = base();
        vars.insert("API_REQUEST_LOG", "true");
        vars.insert("API_GRACEFUL_TIMEOUT", "3");
        vars.insert("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,");
        vars.insert("DB_SSL_MODE", "disable");
        vars.insert("DB_MAX_CONNECTION_POOL", "20");
        let cfg = load(&vars).unwrap();
        assert!(cfg.api.request_log);
        assert_eq!(cfg.api.graceful_timeout, Duration::from_secs(3));
        assert_eq!(cfg.cors.allowed_origins, ["http://a.test", "http://b.test"]);
        assert!(matches!(cfg.database.ssl_mode, PgSslMode::Disable));
        assert_eq!(cfg.database.max_connections, 20);
    }

    #[test]
    fn missing_required_variable() {
        let mut vars = base();
        vars.remove("DB_PASSWORD");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("DB_PASSWORD"));

        vars = base();
        vars.insert("API_HOST", "   ");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("API_HOST"));
    }

    #[test]
    fn invalid_number() {
        let mut vars = base();
        vars.insert("API_PORT", "eighty");
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid { var: "API_PORT", value: "eighty".into() }
        );
    }

    #[test]
    fn debug_hides_password() {
        let cfg = load(&base()).unwrap();
        assert!(!format!("{:?}", cfg.database).contains("secret"));
    }
}
