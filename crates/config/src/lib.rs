//! shop-config - 配置加载库
//!
//! 加载顺序（后者覆盖前者）：
//! 1. 结构体上的 serde 默认值
//! 2. 服务注册的默认值（如各服务的默认端口）
//! 3. `{config_dir}/default.toml`
//! 4. `{config_dir}/{APP_ENV}.toml`
//! 5. 兼容旧部署的环境变量（`PORT`、`REDIS_ADDR`、`DB_HOST` ...）
//! 6. `SHOP_` 前缀环境变量，`__` 表示嵌套，如 `SHOP_SERVER__PORT`

use std::fmt;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, Secret};
use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 旧部署使用的环境变量到配置路径的映射
pub type LegacyEnvMapping = &'static [(&'static str, &'static str)];

/// 当前运行环境，取自 `APP_ENV`
pub fn app_env() -> String {
    std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string())
}

pub fn is_production() -> bool {
    app_env() == "production"
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
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
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 输出 JSON 格式日志；生产环境总是 JSON
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

/// Redis 配置
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// `host:port`
    #[serde(default = "default_redis_addr")]
    pub addr: String,
    #[serde(default)]
    pub db: u8,
}

fn default_redis_addr() -> String {
    "localhost:6379".to_string()
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            addr: default_redis_addr(),
            db: 0,
        }
    }
}

impl RedisConfig {
    pub fn url(&self) -> String {
        format!("redis://{}/{}", self.addr, self.db)
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_user", deserialize_with = "string_or_number")]
    pub user: String,
    #[serde(default = "default_db_password", deserialize_with = "secret_string_or_number")]
    pub password: Secret<String>,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// 从连接池取连接的等待上限，数据库不可达时请求在此时间内失败
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
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

fn default_db_password() -> Secret<String> {
    Secret::new("postgres".to_string())
}

fn default_db_name() -> String {
    "orders".to_string()
}

fn default_ssl_mode() -> String {
    "disable".to_string()
}

fn default_max_connections() -> u32 {
    // 开发环境: 10, 生产环境: 50
    if is_production() { 50 } else { 10 }
}

fn default_acquire_timeout_secs() -> u64 {
    3
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: default_db_password(),
            name: default_db_name(),
            ssl_mode: default_ssl_mode(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    /// 连接串，包含密码
    pub fn url(&self) -> Secret<String> {
        Secret::new(format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            urlencoding::encode(&self.user),
            urlencoding::encode(self.password.expose_secret()),
            self.host,
            self.port,
            self.name,
            self.ssl_mode,
        ))
    }

    /// 不含密码的连接描述，用于日志
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

/// 接受字符串或数字，数字按十进制文本保存
///
/// 环境变量和 TOML 中的纯数字账号、密码会被解析成数字
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl Visitor<'_> for StringOrNumber {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f32<E: de::Error>(self, v: f32) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

fn secret_string_or_number<'de, D>(deserializer: D) -> Result<Secret<String>, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_number(deserializer).map(Secret::new)
}

/// 启动阶段连接存储的重试策略（固定间隔）
#[derive(Debug, Clone, Deserialize)]
pub struct StartupRetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

fn default_max_attempts() -> u32 {
    10
}

fn default_delay_secs() -> u64 {
    3
}

impl Default for StartupRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_delay_secs(),
        }
    }
}

/// 配置加载器
pub struct ConfigLoader {
    config_dir: String,
    figment: Figment,
    legacy_env: LegacyEnvMapping,
}

impl ConfigLoader {
    pub fn new(config_dir: impl Into<String>) -> Self {
        Self {
            config_dir: config_dir.into(),
            figment: Figment::new(),
            legacy_env: &[],
        }
    }

    /// 注册某个配置路径的默认值，如 `("server.port", 8001)`
    pub fn with_default<V: serde::Serialize>(mut self, key: &str, value: V) -> Self {
        self.figment = self.figment.merge(Serialized::default(key, value));
        self
    }

    /// 注册兼容旧部署的环境变量映射
    pub fn with_legacy_env(mut self, mapping: LegacyEnvMapping) -> Self {
        self.legacy_env = mapping;
        self
    }

    /// 旧环境变量按原始字符串合并，`DB_PASSWORD=0123` 不会被解析成数字
    fn legacy_env_provider(mapping: LegacyEnvMapping) -> Figment {
        std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .filter(|(_, value)| !value.is_empty())
            .filter_map(|(name, value)| {
                mapping
                    .iter()
                    .find(|(legacy, _)| name.eq_ignore_ascii_case(legacy))
                    .map(|(_, path)| (*path, value))
            })
            .fold(Figment::new(), |figment, (path, value)| {
                figment.merge(Serialized::default(path, value))
            })
    }

    fn figment(self) -> Figment {
        let env = app_env();

        self.figment
            .merge(Toml::file(format!("{}/default.toml", self.config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", self.config_dir, env)))
            .merge(Self::legacy_env_provider(self.legacy_env))
            .merge(Env::prefixed("SHOP_").split("__"))
    }

    /// 加载配置
    ///
    /// 数字和布尔字段接受字符串形式，如旧环境变量 `PORT=8002`
    pub fn load<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
        Ok(self.figment().extract_lossy()?)
    }
}
