//! 进程内订单 Repository，用于测试和本地开发

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use shop_errors::{AppError, AppResult};
use tokio::sync::RwLock;

use crate::domain::{NewOrder, Order, OrderItem, OrderRepository, OrderStatus};

/// 可注入的失败点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    InsertOrder,
    InsertItems,
    Commit,
    FindByUser,
    FindById,
    FindItems,
    Ping,
}

impl FailurePoint {
    fn message(&self) -> &'static str {
        match self {
            Self::InsertOrder => "Failed to create order",
            Self::InsertItems => "Failed to create order items",
            Self::Commit => "Failed to commit order",
            Self::FindByUser => "Failed to retrieve orders",
            Self::FindById => "Failed to retrieve order",
            Self::FindItems => "Failed to retrieve order items",
            Self::Ping => "in-memory store marked unavailable",
        }
    }
}

#[derive(Default)]
struct State {
    next_id: i32,
    orders: Vec<Order>,
    items: HashMap<i32, Vec<OrderItem>>,
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    state: RwLock<State>,
    failure: RwLock<Option<FailurePoint>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 之后的调用在该点失败，`None` 取消注入
    pub async fn fail_at(&self, point: Option<FailurePoint>) {
        *self.failure.write().await = point;
    }

    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    async fn check(&self, point: FailurePoint) -> AppResult<()> {
        if *self.failure.read().await == Some(point) {
            return Err(AppError::internal(point.message()));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, new_order: &NewOrder) -> AppResult<Order> {
        // 三个写入步骤都在提交前检查，失败时状态不变
        self.check(FailurePoint::InsertOrder).await?;
        self.check(FailurePoint::InsertItems).await?;
        self.check(FailurePoint::Commit).await?;

        let mut state = self.state.write().await;
        state.next_id += 1;
        let order = Order {
            id: state.next_id,
            user_id: new_order.user_id.clone(),
            items: new_order.items.clone(),
            total: new_order.total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };

        state.items.insert(order.id, new_order.items.clone());
        state.orders.push(Order {
            items: Vec::new(),
            ..order.clone()
        });
        Ok(order)
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Order>> {
        self.check(FailurePoint::FindByUser).await?;

        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Order>> {
        self.check(FailurePoint::FindById).await?;
        Ok(self
            .state
            .read()
            .await
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn find_items(&self, order_id: i32) -> AppResult<Vec<OrderItem>> {
        self.check(FailurePoint::FindItems).await?;
        Ok(self
            .state
            .read()
            .await
            .items
            .get(&order_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn ping(&self) -> AppResult<()> {
        self.check(FailurePoint::Ping).await
    }
}
