//! Product Service 入口

use std::sync::Arc;

use product_service::{SERVICE_NAME, api, catalog::Catalog, config::ProductServiceConfig};
use shop_bootstrap::{init_runtime, serve};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置
    let config = ProductServiceConfig::load("config")?;

    // 2. 初始化运行时
    let metrics = init_runtime(SERVICE_NAME, &config.telemetry)?;

    // 3. 构建目录
    let catalog = Arc::new(Catalog::seeded());
    info!(products = catalog.list().len(), "Catalog loaded");

    // 4. 启动服务
    serve(SERVICE_NAME, api::router(catalog), &config.server, metrics).await?;

    Ok(())
}
