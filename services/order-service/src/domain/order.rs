//! 订单实体

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shop_bootstrap::null_as_default;
use shop_errors::{AppError, AppResult};

/// 订单状态
///
/// 目前只有创建时的 `pending`，没有状态流转
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            other => Err(AppError::internal(format!("Unknown order status: {}", other))),
        }
    }
}

/// 订单条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i32,
}

/// 订单
///
/// `id` 和 `created_at` 由数据库在插入时分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i32,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// 下单请求
///
/// 字段缺失或为 null 时按空值处理，由 [`NewOrder::validate`] 统一校验
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOrder {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: Decimal,
}

impl NewOrder {
    /// 只校验用户和条目非空，不校验数量和金额
    pub fn validate(&self) -> AppResult<()> {
        if self.user_id.is_empty() || self.items.is_empty() {
            return Err(AppError::validation("User ID and items are required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(OrderStatus::Pending.as_str(), "pending");
        assert_eq!("pending".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            r#""pending""#
        );
    }

    #[test]
    fn test_validate_requires_user_and_items() {
        let empty: NewOrder = serde_json::from_str(r#"{"user_id":"","items":[]}"#).unwrap();
        let err = empty.validate().unwrap_err();
        assert_eq!(err.public_message(), "User ID and items are required");

        let no_items: NewOrder = serde_json::from_str(r#"{"user_id":"u1"}"#).unwrap();
        assert!(no_items.validate().is_err());

        let no_user: NewOrder =
            serde_json::from_str(r#"{"items":[{"product_id":1,"quantity":1}]}"#).unwrap();
        assert!(no_user.validate().is_err());

        let null_items: NewOrder =
            serde_json::from_str(r#"{"user_id":"u1","items":null,"total":null}"#).unwrap();
        assert!(null_items.validate().is_err());
    }

    #[test]
    fn test_validate_ignores_quantity_and_total() {
        let order: NewOrder = serde_json::from_str(
            r#"{"user_id":"u1","items":[{"product_id":1,"quantity":-3}],"total":-1}"#,
        )
        .unwrap();
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_total_parsed_from_number() {
        let order: NewOrder = serde_json::from_str(
            r#"{"user_id":"u1","items":[{"product_id":1,"quantity":2}],"total":1999.98}"#,
        )
        .unwrap();
        assert_eq!(order.total, Decimal::new(199998, 2));
    }
}
