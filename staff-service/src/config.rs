use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "staff-service.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings. File values are overridden by environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server_port: u16,
    /// Postgres URL; the in-memory store is used when unset.
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Redis URL; caching is off when unset.
    pub redis_url: Option<String>,
    /// Origin of the web client allowed by CORS.
    pub cors_origin: String,
    /// Timezone that decides what "today" is for hire dates.
    pub timezone: String,
    /// Load demo staff into the in-memory store on start-up.
    pub seed_demo_data: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server_port: 8080,
            database_url: None,
            max_connections: 5,
            redis_url: None,
            cors_origin: "http://localhost:3000".to_string(),
            timezone: "UTC".to_string(),
            seed_demo_data: true,
        }
    }
}

impl ServiceConfig {
    /// Reads `path` (defaults when the file is missing) and applies the
    /// `SERVER_PORT`, `DATABASE_URL`, `REDIS_URL`, `CORS_ORIGIN`,
    /// `STAFF_TIMEZONE` and `SEED_DEMO_DATA` environment overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Self::from_file(path)?;
        config.with_overrides(|key| std::env::var(key).ok())
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        if !Path::new(path).exists() {
            tracing::info!("Config file not found at {path}, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        tracing::info!(?config, "Loaded staff-service config from {path}");

        Ok(config)
    }

    /// Applies overrides from `lookup`; blank values are ignored.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(port) = get("SERVER_PORT") {
            self.server_port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                value: port,
            })?;
        }
        if let Some(url) = get("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(url) = get("REDIS_URL") {
            self.redis_url = Some(url);
        }
        if let Some(origin) = get("CORS_ORIGIN") {
            self.cors_origin = origin;
        }
        if let Some(timezone) = get("STAFF_TIMEZONE") {
            self.timezone = timezone;
        }
        if let Some(seed) = get("SEED_DEMO_DATA") {
            self.seed_demo_data = seed.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "SEED_DEMO_DATA",
                value: seed,
            })?;
        }

        Ok(self)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(
                timezone = %self.timezone,
                "Invalid timezone, falling back to UTC"
            );
            Tz::UTC
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = ServiceConfig::from_file("does-not-exist.toml").unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            server_port = 9000
            timezone = "Asia/Ho_Chi_Minh"
            "#,
        )
        .unwrap();

        assert_eq!(config.server_port, 9000);
        assert_eq!(config.timezone(), chrono_tz::Asia::Ho_Chi_Minh);
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert!(config.seed_demo_data);
    }

    #[test]
    fn environment_overrides_file_values() {
        let config = ServiceConfig::default()
            .with_overrides(env(&[
                ("SERVER_PORT", "8099"),
                ("DATABASE_URL", "postgres://localhost/staff"),
                ("SEED_DEMO_DATA", "false"),
                ("REDIS_URL", "  "),
            ]))
            .unwrap();

        assert_eq!(config.server_port, 8099);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/staff")
        );
        assert!(!config.seed_demo_data);
        assert_eq!(config.redis_url, None);
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = ServiceConfig::default()
            .with_overrides(env(&[("SERVER_PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "SERVER_PORT",
                ..
            }
        ));
    }

    #[test]
    fn invalid_timezone_falls_back_to_utc() {
        let config = ServiceConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..ServiceConfig::default()
        };
        assert_eq!(config.timezone(), Tz::UTC);
    }
}
