use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

/// Settings every service shares: listen port and log filter.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    /// Load from `configuration.*` and `APP__*` variables.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// [`Config::load`] plus the bare `PORT` and `LOG_LEVEL` variables set
    /// by hosting platforms. `PORT` wins over `APP__PORT`; with neither set
    /// the port is `service_port`.
    pub fn load_for_service(service_port: u16) -> Result<Self, AppError> {
        let mut config = Self::load()?;
        config.apply_overrides(
            non_empty_env("PORT"),
            env::var("APP__PORT").is_ok(),
            non_empty_env("LOG_LEVEL"),
            service_port,
        )?;
        Ok(config)
    }

    fn apply_overrides(
        &mut self,
        port: Option<String>,
        app_port_set: bool,
        log_level: Option<String>,
        service_port: u16,
    ) -> Result<(), AppError> {
        match port {
            Some(raw) => {
                self.port = raw.trim().parse().map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("PORT is not a valid port: {}", e))
                })?;
            }
            None if !app_port_set => self.port = service_port,
            None => {}
        }

        if let Some(level) = log_level {
            self.log_level = level;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            port: default_port(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn platform_port_wins() {
        let mut config = base();
        config
            .apply_overrides(Some("10000".into()), true, Some("debug".into()), 3001)
            .unwrap();
        assert_eq!(config.port, 10000);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn service_port_applies_only_without_app_port() {
        let mut config = base();
        config.apply_overrides(None, false, None, 3001).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.log_level, "info");

        let mut config = base();
        config.apply_overrides(None, true, None, 3001).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err = base()
            .apply_overrides(Some("http".into()), false, None, 3001)
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
