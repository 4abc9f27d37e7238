//! PostgreSQL 事务管理模块

use shop_errors::{AppError, AppResult};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;

/// 事务管理器
///
/// 未提交的事务在 drop 时由 sqlx 自动回滚
#[derive(Clone)]
pub struct TransactionManager {
    pool: PgPool,
}

impl TransactionManager {
    /// 创建新的事务管理器
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取连接池引用
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 开始事务
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))
    }

    /// 提交事务
    pub async fn commit(tx: Transaction<'static, Postgres>) -> AppResult<()> {
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))
    }

    /// 回滚事务
    pub async fn rollback(tx: Transaction<'static, Postgres>) -> AppResult<()> {
        tx.rollback()
            .await
            .map_err(|e| AppError::database(format!("Failed to rollback transaction: {}", e)))
    }

    /// 回滚事务并返回原始错误
    ///
    /// 回滚本身失败只记日志，调用方看到的始终是第一个错误
    pub async fn abort(tx: Transaction<'static, Postgres>, cause: AppError) -> AppError {
        if let Err(e) = Self::rollback(tx).await {
            warn!(error = %e, cause = %cause, "Rollback failed after aborted transaction");
        }
        cause
    }
}
