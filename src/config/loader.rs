//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

const CONFIG_FILENAME: &str = "authgate.toml";

/// Load configuration from authgate.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Authgate Configuration

[server]
host = "0.0.0.0"
port = 5000

[database]
host = "${DB_HOST:-localhost}"
port = 5432
user = "${DB_USER:-postgres}"
password = "${DB_PASSWORD:-}"
dbname = "${DB_NAME:-authgate}"
pool_size = 10

[session]
cookie_name = "authgate.sid"
ttl_hours = 24
# Set to true when serving over HTTPS
secure = false

[cors]
# The single origin allowed to send credentialed requests
allowed_origin = "http://localhost:3000"

[rate_limit]
max_attempts = 10
window_minutes = 15
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_interpolation() {
        env::set_var("TEST_VAR", "hello");
        let content = "value = \"${TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_default_config_parses() {
        let content = interpolate_env_vars(default_config_content());
        let config: Config = toml::from_str(&content).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.host, "localhost");
    }
}
