//! 服务配置

use serde::Deserialize;
use shop_config::{
    ConfigError, ConfigLoader, LegacyEnvMapping, RedisConfig, ServerConfig, TelemetryConfig,
};

const DEFAULT_PORT: u16 = 8002;

const LEGACY_ENV: LegacyEnvMapping = &[
    ("PORT", "server.port"),
    ("REDIS_ADDR", "redis.addr"),
    ("LOG_LEVEL", "telemetry.log_level"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct CartServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub redis: RedisConfig,
}

impl CartServiceConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        ConfigLoader::new(config_dir)
            .with_default("server.port", DEFAULT_PORT)
            .with_legacy_env(LEGACY_ENV)
            .load()
    }
}
