//! 健康检查模块
//!
//! 所有服务的 `/health` 返回 `{"status": ..., "service": ...}`，
//! 依赖不可达时 status 为 `unhealthy`，HTTP 状态码仍为 200

use serde::{Deserialize, Serialize};
use shop_errors::AppResult;
use tracing::warn;

pub const HEALTHY: &str = "healthy";
pub const UNHEALTHY: &str = "unhealthy";

/// 健康检查响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>) -> Self {
        Self {
            status: HEALTHY.to_string(),
            service: service.into(),
        }
    }

    pub fn unhealthy(service: impl Into<String>) -> Self {
        Self {
            status: UNHEALTHY.to_string(),
            service: service.into(),
        }
    }

    /// 根据依赖探测结果构造
    pub fn from_check(service: impl Into<String>, check: AppResult<()>) -> Self {
        let service = service.into();
        match check {
            Ok(()) => Self::healthy(service),
            Err(e) => {
                warn!(service = %service, error = %e, "Dependency health check failed");
                Self::unhealthy(service)
            }
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY
    }
}
