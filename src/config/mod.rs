use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::env;
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

/// Startup configuration failures. None of these are retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set; refusing to sign tokens without a configured secret")]
    MissingSecret,

    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseConfig {
    #[serde(serialize_with = "serialize_redacted_url")]
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Clone, Serialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
    pub demo_user: String,
}

// Keep the secret out of `{:?}` output.
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .field("cors_origins", &self.cors_origins)
            .field("demo_user", &self.demo_user)
            .finish()
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseConfig {
    pub fn require_url(&self) -> Result<&str, ConfigError> {
        self.url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }
}

impl SecurityConfig {
    /// Returns the configured signing secret, rejecting absent or blank values.
    pub fn require_secret(&self) -> Result<&str, ConfigError> {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// `from_env` is the production entry point; tests hand in a map so they
    /// never have to mutate the process environment.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        };

        config.with_overrides(&lookup)
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_source(|key| vars.get(key).cloned())
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("HOST") {
            self.server.host = parse_var("HOST", v)?;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse_var("PORT", v)?;
        }

        // Database overrides
        self.database.url = lookup("DATABASE_URL").or_else(|| lookup("DB_DSN"));
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse_var("DATABASE_CONNECTION_TIMEOUT", v)?;
        }

        // Security overrides
        self.security.jwt_secret = lookup("JWT_SECRET");
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_HOURS") {
            let hours: u64 = parse_var("SECURITY_JWT_EXPIRY_HOURS", v.clone())?;
            if hours == 0 {
                return Err(ConfigError::Invalid {
                    var: "SECURITY_JWT_EXPIRY_HOURS",
                    value: v,
                });
            }
            self.security.jwt_expiry_hours = hours;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS").or_else(|| lookup("CORS_ORIGIN")) {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("NOTES_DEMO_USER") {
            if v.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    var: "NOTES_DEMO_USER",
                    value: v,
                });
            }
            self.security.demo_user = v;
        }

        Ok(self)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default_bind(),
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: None,
                jwt_expiry_hours: 24,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                demo_user: "demo".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig::default_bind(),
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: None,
                jwt_expiry_hours: 24,
                cors_origins: Vec::new(),
                demo_user: "demo".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::default_bind(),
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: None,
                jwt_expiry_hours: 24,
                cors_origins: Vec::new(),
                demo_user: "demo".to_string(),
            },
        }
    }
}

impl ServerConfig {
    fn default_bind() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8088,
        }
    }
}

// Passwords in the DSN never reach serialized output.
fn serialize_redacted_url<S: Serializer>(url: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    match url {
        Some(url) => {
            let shown = crate::database::DatabaseManager::redacted_url(url)
                .unwrap_or_else(|_| "<invalid>".to_string());
            s.serialize_some(&shown)
        }
        None => s.serialize_none(),
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_map(&HashMap::new()).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.security.jwt_expiry_hours, 24);
        assert_eq!(config.security.demo_user, "demo");
        assert!(config.security.jwt_secret.is_none());
    }

    #[test]
    fn test_production_preset_has_no_cors_origins() {
        let config = AppConfig::from_map(&vars(&[("APP_ENV", "prod")])).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.security.cors_origins.is_empty());
        assert_eq!(config.database.max_connections, 20);
    }

    #[test]
    fn missing_secret_is_a_config_error() {
        let config = AppConfig::from_map(&HashMap::new()).unwrap();
        assert!(matches!(
            config.security.require_secret(),
            Err(ConfigError::MissingSecret)
        ));

        let blank = AppConfig::from_map(&vars(&[("JWT_SECRET", "   ")])).unwrap();
        assert!(matches!(
            blank.security.require_secret(),
            Err(ConfigError::MissingSecret)
        ));
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let config = AppConfig::from_map(&vars(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "9000"),
            ("DB_DSN", "postgres://localhost/notes"),
            ("SECURITY_JWT_EXPIRY_HOURS", "2"),
            ("CORS_ORIGIN", "https://notes.example.com, https://other.example.com"),
            ("NOTES_DEMO_USER", "alice"),
        ]))
        .unwrap();

        assert_eq!(config.security.require_secret().unwrap(), "s3cret");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.database.require_url().unwrap(),
            "postgres://localhost/notes"
        );
        assert_eq!(config.security.jwt_expiry_hours, 2);
        assert_eq!(
            config.security.cors_origins,
            vec!["https://notes.example.com", "https://other.example.com"]
        );
        assert_eq!(config.security.demo_user, "alice");
    }

    #[test]
    fn database_url_takes_precedence_over_dsn() {
        let config = AppConfig::from_map(&vars(&[
            ("DATABASE_URL", "postgres://primary/notes"),
            ("DB_DSN", "postgres://fallback/notes"),
        ]))
        .unwrap();
        assert_eq!(config.database.require_url().unwrap(), "postgres://primary/notes");
    }

    #[test]
    fn rejects_unparseable_and_zero_values() {
        assert!(matches!(
            AppConfig::from_map(&vars(&[("PORT", "eighty")])),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));
        assert!(matches!(
            AppConfig::from_map(&vars(&[("SECURITY_JWT_EXPIRY_HOURS", "0")])),
            Err(ConfigError::Invalid { var: "SECURITY_JWT_EXPIRY_HOURS", .. })
        ));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = AppConfig::from_map(&vars(&[("JWT_SECRET", "hunter2")])).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn serialized_config_hides_secret_and_db_password() {
        let config = AppConfig::from_map(&vars(&[
            ("APP_ENV", "staging"),
            ("JWT_SECRET", "super-secret-value"),
            ("DATABASE_URL", "postgres://notes:hunter2@db:5432/notes"),
        ]))
        .unwrap();

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["environment"], "staging");
        assert!(json["security"].get("jwt_secret").is_none());
        assert_eq!(json["database"]["url"], "postgres://notes:***@db:5432/notes");

        let text = json.to_string();
        assert!(!text.contains("super-secret-value"));
        assert!(!text.contains("hunter2"));
    }
}
