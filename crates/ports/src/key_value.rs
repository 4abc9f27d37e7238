//! Key-Value 存储 trait 定义

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use shop_errors::{AppError, AppResult};
use tokio::sync::RwLock;

/// Key-Value 存储
///
/// 值按整体读写，写入不设置过期时间
#[async_trait]
pub trait KeyValuePort: Send + Sync {
    /// 读取，不存在时返回 `None`
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// 覆盖写入
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// 删除，键不存在也视为成功
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// 连通性检查
    async fn ping(&self) -> AppResult<()>;
}

/// 进程内实现，用于测试和本地开发
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟存储不可用：之后的所有调用都返回错误
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::internal("in-memory store marked unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValuePort for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.check_available()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.check_available()?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.check_available()?;
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));

        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        // 删除不存在的键不报错
        store.delete("k").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = InMemoryKeyValueStore::new();
        store.set_unavailable(true);

        assert!(store.get("k").await.is_err());
        assert!(store.set("k", "v").await.is_err());
        assert!(store.delete("k").await.is_err());
        assert!(store.ping().await.is_err());

        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }
}
