//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// PostgreSQL connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_db_name")]
    pub dbname: String,

    /// Maximum number of pooled connections
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "authgate".to_string()
}

fn default_pool_size() -> usize {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: String::new(),
            dbname: default_db_name(),
            pool_size: default_pool_size(),
        }
    }
}

/// Session cookie and lifetime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Fixed session lifetime in hours, counted from creation
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,

    /// Only send the cookie over HTTPS. Enable in production.
    #[serde(default)]
    pub secure: bool,
}

fn default_cookie_name() -> String {
    "authgate.sid".to_string()
}

fn default_ttl_hours() -> i64 {
    24
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_hours: default_ttl_hours(),
            secure: false,
        }
    }
}

/// Cross-origin policy: a single allow-listed origin may send
/// credentialed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

fn default_allowed_origin() -> String {
    "http://localhost:3000".to_string()
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: default_allowed_origin(),
        }
    }
}

/// Login rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_window_minutes")]
    pub window_minutes: u64,
}

fn default_max_attempts() -> u32 {
    10
}

fn default_window_minutes() -> u64 {
    15
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_minutes: default_window_minutes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.pool_size, 10);
        assert_eq!(config.session.ttl_hours, 24);
        assert_eq!(config.rate_limit.max_attempts, 10);
        assert_eq!(config.rate_limit.window_minutes, 15);
        assert!(!config.session.secure);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [session]
            secure = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.session.secure);
        assert_eq!(config.session.cookie_name, "authgate.sid");
    }
}
