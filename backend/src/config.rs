use std::env;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub static_files_path: Option<String>,
    pub cors_origins: Vec<String>,
    /// JSON file used to populate an empty achievements table on startup
    pub seed_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber {
                name: "PORT",
                value: port.clone(),
            })?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:achievements.db?mode=rwc".to_string()),
            static_files_path: env::var("STATIC_FILES_PATH").ok(),
            cors_origins: parse_origins(
                &env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost".to_string()),
            ),
            seed_file: env::var("SEED_FILE").ok().filter(|path| !path.trim().is_empty()),
        })
    }

    /// Scheme and host must match a configured origin. A configured origin
    /// without a port allows any port on that host.
    pub fn allows_origin(&self, origin: &str) -> bool {
        let Ok(origin) = Url::parse(origin) else {
            return false;
        };

        self.cors_origins.iter().any(|allowed| {
            let Ok(allowed) = Url::parse(allowed) else {
                return false;
            };
            allowed.scheme() == origin.scheme()
                && allowed.host_str().is_some()
                && allowed.host_str() == origin.host_str()
                && allowed
                    .port()
                    .map_or(true, |port| origin.port_or_known_default() == Some(port))
        })
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
