//! Redis Key-Value 存储实现

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use shop_errors::{AppError, AppResult};
use shop_ports::KeyValuePort;

use crate::connection::check_connection;

/// 基于 Redis 字符串类型的 Key-Value 存储
#[derive(Clone)]
pub struct RedisKeyValueStore {
    conn: ConnectionManager,
}

impl RedisKeyValueStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl KeyValuePort for RedisKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(key)
            .await
            .map_err(|e| AppError::internal(format!("Redis get failed: {}", e)))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.set(key, value)
            .await
            .map_err(|e| AppError::internal(format!("Redis set failed: {}", e)))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.del(key)
            .await
            .map_err(|e| AppError::internal(format!("Redis delete failed: {}", e)))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        check_connection(&mut conn).await
    }
}
