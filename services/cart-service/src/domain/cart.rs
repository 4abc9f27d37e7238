//! 购物车实体

use serde::{Deserialize, Serialize};
use shop_bootstrap::null_as_default;

/// 存储键前缀
const KEY_PREFIX: &str = "cart:";

/// 用户购物车在存储中的键
pub fn cart_key(user_id: &str) -> String {
    format!("{}{}", KEY_PREFIX, user_id)
}

/// 购物车条目
///
/// 缺失或为 null 的字段按 0 处理
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i32,
}

/// 购物车
///
/// 每个 product_id 至多一个条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            items: Vec::new(),
        }
    }

    /// 添加商品，已存在时累加数量
    pub fn add_item(&mut self, item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    /// 移除该商品的所有条目
    pub fn remove_product(&mut self, product_id: i32) {
        self.items.retain(|item| item.product_id != product_id);
    }
}
