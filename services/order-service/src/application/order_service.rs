//! 订单应用服务

use std::sync::Arc;

use metrics::counter;
use shop_errors::{AppError, AppResult};
use tracing::{info, warn};

use crate::domain::{NewOrder, Order, OrderRepository};

/// 读取订单条目失败时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFetchPolicy {
    /// 条目读取失败时返回不含条目的订单（列表查询）
    BestEffort,
    /// 条目读取失败时整个请求失败（详情查询）
    Required,
}

pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// 创建订单
    pub async fn create_order(&self, new_order: NewOrder) -> AppResult<Order> {
        new_order.validate()?;

        match self.repo.create(&new_order).await {
            Ok(order) => {
                counter!("orders_created_total").increment(1);
                info!(
                    order_id = order.id,
                    user_id = %order.user_id,
                    items = order.items.len(),
                    "Order created"
                );
                Ok(order)
            }
            Err(e) => {
                counter!("order_creation_failures_total").increment(1);
                Err(e)
            }
        }
    }

    /// 用户的订单，按创建时间倒序
    pub async fn list_orders(&self, user_id: &str) -> AppResult<Vec<Order>> {
        let mut orders = self.repo.find_by_user(user_id).await?;
        for order in &mut orders {
            self.attach_items(order, ItemFetchPolicy::BestEffort).await?;
        }
        Ok(orders)
    }

    /// 订单详情
    pub async fn get_order(&self, order_id: i32) -> AppResult<Order> {
        let mut order = self
            .repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))?;

        self.attach_items(&mut order, ItemFetchPolicy::Required)
            .await?;
        Ok(order)
    }

    pub async fn check_health(&self) -> AppResult<()> {
        self.repo.ping().await
    }

    async fn attach_items(&self, order: &mut Order, policy: ItemFetchPolicy) -> AppResult<()> {
        match self.repo.find_items(order.id).await {
            Ok(items) => order.items = items,
            Err(e) if policy == ItemFetchPolicy::BestEffort => {
                warn!(order_id = order.id, error = %e, "Returning order without items");
                order.items.clear();
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}
