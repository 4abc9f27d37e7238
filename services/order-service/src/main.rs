//! Order Service 入口

use std::sync::Arc;
use std::time::Duration;

use order_service::{
    SERVICE_NAME, api,
    application::OrderService,
    config::OrderServiceConfig,
    domain::OrderRepository,
    infrastructure::persistence::{PostgresOrderRepository, run_migrations},
};
use secrecy::ExposeSecret;
use shop_adapter_postgres::{PostgresConfig, create_pool};
use shop_bootstrap::{RetryConfig, init_runtime, serve, with_retry};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置
    let config = OrderServiceConfig::load("config")?;

    // 2. 初始化运行时
    let metrics = init_runtime(SERVICE_NAME, &config.telemetry)?;

    // 3. 连接数据库（固定间隔重试，耗尽后退出）
    let target = config.database.display_target();
    let pg_config = PostgresConfig::new(config.database.url().expose_secret())
        .with_max_connections(config.database.max_connections)
        .with_acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs));
    let retry = RetryConfig::from(&config.startup_retry);

    let pool = with_retry(&retry, "connect_postgres", || create_pool(&pg_config))
        .await
        .inspect_err(|e| {
            error!(
                %target,
                attempts = retry.max_attempts,
                error = %e,
                "Could not connect to database"
            );
        })?;
    info!(%target, "Connected to PostgreSQL successfully");

    // 4. 建表
    run_migrations(&pool).await?;

    // 5. 组装服务
    let repo: Arc<dyn OrderRepository> = Arc::new(PostgresOrderRepository::new(pool));
    let service = Arc::new(OrderService::new(repo));

    // 6. 启动服务
    serve(SERVICE_NAME, api::router(service), &config.server, metrics).await?;

    Ok(())
}
