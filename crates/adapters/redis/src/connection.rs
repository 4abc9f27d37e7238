//! Redis 连接管理

use std::time::Duration;

use redis::Client;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use shop_errors::{AppError, AppResult};
use tracing::info;

/// 建连和重连的重试次数
pub const RECONNECT_RETRIES: usize = 1;
/// 两次重试之间的最大间隔（毫秒）
pub const RECONNECT_MAX_DELAY_MS: u64 = 500;
/// 单次建连超时
pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(2);
/// 单条命令的响应超时
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);

fn manager_config() -> ConnectionManagerConfig {
    ConnectionManagerConfig::new()
        .set_number_of_retries(RECONNECT_RETRIES)
        .set_factor(2)
        .set_max_delay(RECONNECT_MAX_DELAY_MS)
        .set_connection_timeout(CONNECTION_TIMEOUT)
        .set_response_timeout(RESPONSE_TIMEOUT)
}

/// 创建 Redis 连接管理器
///
/// `ConnectionManager` 可以廉价克隆，所有请求共享同一个底层连接并自动重连。
/// 重连次数和超时都有上限，Redis 不可达时请求会很快失败
pub async fn create_connection_manager(url: &str) -> AppResult<ConnectionManager> {
    let client = Client::open(url)
        .map_err(|e| AppError::internal(format!("Failed to create Redis client: {}", e)))?;

    let conn = ConnectionManager::new_with_config(client, manager_config())
        .await
        .map_err(|e| {
            AppError::internal(format!("Failed to create Redis connection manager: {}", e))
        })?;

    info!("Redis connection manager created");
    Ok(conn)
}

/// 检查 Redis 连接
pub async fn check_connection(conn: &mut ConnectionManager) -> AppResult<()> {
    redis::cmd("PING")
        .query_async::<String>(conn)
        .await
        .map_err(|e| AppError::internal(format!("Redis health check failed: {}", e)))?;
    Ok(())
}
