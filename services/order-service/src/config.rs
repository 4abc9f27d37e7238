//! 服务配置

use serde::Deserialize;
use shop_config::{
    ConfigError, ConfigLoader, DatabaseConfig, LegacyEnvMapping, ServerConfig, StartupRetryConfig,
    TelemetryConfig,
};

const DEFAULT_PORT: u16 = 8003;

const LEGACY_ENV: LegacyEnvMapping = &[
    ("PORT", "server.port"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("LOG_LEVEL", "telemetry.log_level"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct OrderServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub startup_retry: StartupRetryConfig,
}

impl OrderServiceConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        ConfigLoader::new(config_dir)
            .with_default("server.port", DEFAULT_PORT)
            .with_legacy_env(LEGACY_ENV)
            .load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use secrecy::ExposeSecret;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config = OrderServiceConfig::load(".").map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 8003);
            assert_eq!(config.database.display_target(), "postgres@localhost:5432/orders");
            assert_eq!(config.startup_retry.max_attempts, 10);
            assert_eq!(config.startup_retry.delay_secs, 3);
            Ok(())
        });
    }

    #[test]
    fn test_legacy_database_variables() {
        Jail::expect_with(|jail| {
            jail.set_env("DB_HOST", "postgres");
            jail.set_env("DB_PORT", "5433");
            jail.set_env("DB_USER", "shop");
            jail.set_env("DB_PASSWORD", "s3cret");
            jail.set_env("DB_NAME", "shop_orders");

            let config = OrderServiceConfig::load(".").map_err(|e| e.to_string())?;
            assert_eq!(config.database.display_target(), "shop@postgres:5433/shop_orders");
            assert_eq!(config.database.password.expose_secret(), "s3cret");
            assert!(!format!("{:?}", config).contains("s3cret"));
            Ok(())
        });
    }
}
