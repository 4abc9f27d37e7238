//! Cart Service 入口

use std::sync::Arc;

use cart_service::{SERVICE_NAME, api, application::CartService, config::CartServiceConfig};
use shop_adapter_redis::{RedisKeyValueStore, create_connection_manager};
use shop_bootstrap::{init_runtime, serve};
use shop_ports::KeyValuePort;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置
    let config = CartServiceConfig::load("config")?;

    // 2. 初始化运行时
    let metrics = init_runtime(SERVICE_NAME, &config.telemetry)?;

    // 3. 连接 Redis，启动时不可达直接退出
    let store = connect_store(&config).await.inspect_err(|e| {
        error!(addr = %config.redis.addr, error = %e, "Failed to connect to Redis");
    })?;
    info!(addr = %config.redis.addr, "Connected to Redis successfully");

    // 4. 组装服务
    let service = Arc::new(CartService::new(store));

    // 5. 启动服务
    serve(SERVICE_NAME, api::router(service), &config.server, metrics).await?;

    Ok(())
}

async fn connect_store(
    config: &CartServiceConfig,
) -> shop_errors::AppResult<Arc<dyn KeyValuePort>> {
    let conn = create_connection_manager(&config.redis.url()).await?;
    let store = RedisKeyValueStore::new(conn);
    store.ping().await?;
    Ok(Arc::new(store))
}
