//! 服务配置

use serde::Deserialize;
use shop_config::{ConfigError, ConfigLoader, LegacyEnvMapping, ServerConfig, TelemetryConfig};

const DEFAULT_PORT: u16 = 8001;

const LEGACY_ENV: LegacyEnvMapping = &[
    ("PORT", "server.port"),
    ("LOG_LEVEL", "telemetry.log_level"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct ProductServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl ProductServiceConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        ConfigLoader::new(config_dir)
            .with_default("server.port", DEFAULT_PORT)
            .with_legacy_env(LEGACY_ENV)
            .load()
    }
}
