//! Runtime configuration read from the environment.

use std::env;

use crate::domain::Side;
use crate::error::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub redis_url: String,
    /// Side played by the chess engine.
    pub engine_side: Side,
    pub physical_board_health_url: Option<String>,
    pub engine_health_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("BACKEND_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|err| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got `{raw}`"), err)
            })?,
            None => DEFAULT_PORT,
        };

        let engine_side = match get("ENGINE_SIDE") {
            Some(raw) => raw
                .parse::<Side>()
                .map_err(|err| AppError::config(format!("ENGINE_SIDE must be white or black, got `{raw}`"), err))?,
            None => Side::Black,
        };

        Ok(Self {
            host: get("BACKEND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            redis_url: get("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            engine_side,
            physical_board_health_url: get("PHYSICAL_BOARD_HEALTH_URL"),
            engine_health_url: get("ENGINE_HEALTH_URL"),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            engine_side: Side::Black,
            physical_board_health_url: None,
            engine_health_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::ErrorCode;

    fn from_map(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(from_map(&[]).unwrap(), AppConfig::default());
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = from_map(&[
            ("BACKEND_PORT", " 8080 "),
            ("ENGINE_SIDE", "White"),
            ("REDIS_URL", "redis://bus:6379"),
            ("ENGINE_HEALTH_URL", "http://engine:5000"),
            ("PHYSICAL_BOARD_HEALTH_URL", "  "),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.engine_side, Side::White);
        assert_eq!(config.redis_url, "redis://bus:6379");
        assert_eq!(config.engine_health_url.as_deref(), Some("http://engine:5000"));
        assert_eq!(config.physical_board_health_url, None);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let err = from_map(&[("BACKEND_PORT", "99999")]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigError);
        let err = from_map(&[("ENGINE_SIDE", "purple")]).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
