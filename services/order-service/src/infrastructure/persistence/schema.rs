//! 订单库表结构

use shop_adapter_postgres::{Migration, MigrationReport, apply_migrations};
use shop_errors::AppResult;
use sqlx::PgPool;
use tracing::info;

const CREATE_ORDERS: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id SERIAL PRIMARY KEY,
    user_id VARCHAR(255) NOT NULL,
    total DECIMAL(10, 2) NOT NULL,
    status VARCHAR(50) NOT NULL,
    created_at TIMESTAMPTZ DEFAULT NOW()
)
"#;

const CREATE_ORDER_ITEMS: &str = r#"
CREATE TABLE IF NOT EXISTS order_items (
    id SERIAL PRIMARY KEY,
    order_id INTEGER REFERENCES orders(id) ON DELETE CASCADE,
    product_id INTEGER NOT NULL,
    quantity INTEGER NOT NULL
)
"#;

/// 按版本排列的迁移
pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(1, "create_orders", CREATE_ORDERS),
        Migration::new(2, "create_order_items", CREATE_ORDER_ITEMS),
    ]
}

/// 创建缺失的表，任一迁移失败即返回错误
///
/// 多个实例同时启动时由迁移锁串行执行
pub async fn run_migrations(pool: &PgPool) -> AppResult<MigrationReport> {
    let report = apply_migrations(pool, &migrations()).await?;
    info!(applied = ?report.applied, "Database tables ready");
    Ok(report)
}
