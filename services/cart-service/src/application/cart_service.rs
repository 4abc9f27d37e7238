//! 购物车应用服务
//!
//! 每次操作都是一次完整的读取、修改、写回，没有并发控制：
//! 同一用户的并发修改可能丢失更新

use std::sync::Arc;

use metrics::counter;
use shop_errors::{AppError, AppResult, ResultExt};
use shop_ports::KeyValuePort;
use tracing::debug;

use crate::domain::{Cart, CartItem, cart_key};

pub struct CartService {
    store: Arc<dyn KeyValuePort>,
}

impl CartService {
    pub fn new(store: Arc<dyn KeyValuePort>) -> Self {
        Self { store }
    }

    /// 获取购物车，不存在时返回空购物车
    pub async fn get_cart(&self, user_id: &str) -> AppResult<Cart> {
        record_operation("get");
        Ok(self
            .load(user_id)
            .await?
            .unwrap_or_else(|| Cart::empty(user_id)))
    }

    /// 添加商品
    pub async fn add_item(&self, user_id: &str, item: CartItem) -> AppResult<Cart> {
        record_operation("add");
        let mut cart = self
            .load(user_id)
            .await?
            .unwrap_or_else(|| Cart::empty(user_id));

        cart.add_item(item);
        self.save(user_id, &cart).await?;

        debug!(user_id, items = cart.items.len(), "Item added to cart");
        Ok(cart)
    }

    /// 移除商品，购物车不存在时返回 NotFound
    pub async fn remove_item(&self, user_id: &str, product_id: i32) -> AppResult<Cart> {
        record_operation("remove");
        let mut cart = self
            .load(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cart not found"))?;

        cart.remove_product(product_id);
        self.save(user_id, &cart).await?;

        debug!(user_id, product_id, "Item removed from cart");
        Ok(cart)
    }

    /// 清空购物车，不存在也视为成功
    pub async fn clear_cart(&self, user_id: &str) -> AppResult<()> {
        record_operation("clear");
        self.store
            .delete(&cart_key(user_id))
            .await
            .or_internal("Failed to clear cart")
    }

    pub async fn check_health(&self) -> AppResult<()> {
        self.store.ping().await
    }

    async fn load(&self, user_id: &str) -> AppResult<Option<Cart>> {
        let raw = self
            .store
            .get(&cart_key(user_id))
            .await
            .or_internal("Failed to retrieve cart")?;

        raw.map(|data| serde_json::from_str::<Cart>(&data).or_internal("Failed to parse cart"))
            .transpose()
    }

    async fn save(&self, user_id: &str, cart: &Cart) -> AppResult<()> {
        let data = serde_json::to_string(cart).or_internal("Failed to save cart")?;
        self.store
            .set(&cart_key(user_id), &data)
            .await
            .or_internal("Failed to save cart")
    }
}

fn record_operation(op: &'static str) {
    counter!("cart_operations_total", "op" => op).increment(1);
}
