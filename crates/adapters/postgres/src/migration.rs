//! PostgreSQL 迁移
//!
//! 全部迁移在一个事务内完成，并持有事务级咨询锁，
//! 同时启动的多个实例会排队执行，后到者只会看到已记录的版本

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use shop_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::{debug, info};

/// 迁移咨询锁的键（ASCII "shop_mig"）
pub const MIGRATION_LOCK_KEY: i64 = 0x7368_6f70_5f6d_6967;

const CREATE_MIGRATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS _migrations (
    version BIGINT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    checksum VARCHAR(64) NOT NULL,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// 单个迁移，`sql` 只能包含一条语句
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub sql: String,
    pub checksum: String,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self {
            version,
            name: name.into(),
            checksum: hex::encode(Sha256::digest(sql.as_bytes())),
            sql,
        }
    }
}

/// 一次迁移的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// 本次执行的版本
    pub applied: Vec<i64>,
    /// 之前已执行的版本
    pub skipped: Vec<i64>,
}

/// 按版本排序，区分待执行和已执行的迁移
///
/// 已记录版本的校验和与当前 SQL 不一致时返回错误
fn plan<'a>(
    migrations: &'a [Migration],
    recorded: &HashMap<i64, String>,
) -> AppResult<(Vec<&'a Migration>, Vec<i64>)> {
    let mut ordered: Vec<&Migration> = migrations.iter().collect();
    ordered.sort_by_key(|m| m.version);

    let mut pending = Vec::new();
    let mut skipped = Vec::new();
    for migration in ordered {
        match recorded.get(&migration.version) {
            None => pending.push(migration),
            Some(checksum) if *checksum == migration.checksum => skipped.push(migration.version),
            Some(_) => {
                return Err(AppError::database(format!(
                    "Migration {} ({}) was modified after it was applied",
                    migration.version, migration.name
                )));
            }
        }
    }
    Ok((pending, skipped))
}

/// 执行尚未应用的迁移
///
/// 任一步失败时事务回滚，不会留下只执行了一半的版本
pub async fn apply_migrations(pool: &PgPool, migrations: &[Migration]) -> AppResult<MigrationReport> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database(format!("Failed to begin migration transaction: {}", e)))?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to acquire migration lock: {}", e)))?;

    sqlx::query(CREATE_MIGRATION_TABLE)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create migration table: {}", e)))?;

    let recorded: HashMap<i64, String> =
        sqlx::query_as::<_, (i64, String)>("SELECT version, checksum FROM _migrations")
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to read migration history: {}", e)))?
            .into_iter()
            .collect();

    let (pending, skipped) = plan(migrations, &recorded)?;
    let mut report = MigrationReport {
        applied: Vec::with_capacity(pending.len()),
        skipped,
    };

    for migration in pending {
        sqlx::query(&migration.sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::database(format!(
                    "Migration {} ({}) failed: {}",
                    migration.version, migration.name, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, name, checksum) VALUES ($1, $2, $3)")
            .bind(migration.version)
            .bind(&migration.name)
            .bind(&migration.checksum)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to record migration: {}", e)))?;

        debug!(version = migration.version, name = %migration.name, "Migration applied");
        report.applied.push(migration.version);
    }

    tx.commit()
        .await
        .map_err(|e| AppError::database(format!("Failed to commit migrations: {}", e)))?;

    info!(
        applied = report.applied.len(),
        skipped = report.skipped.len(),
        "Migrations finished"
    );
    Ok(report)
}
