//! 订单 Repository trait

use async_trait::async_trait;
use shop_errors::AppResult;

use super::order::{NewOrder, Order, OrderItem};

/// 订单存储
///
/// 返回的错误已经是对外的通用消息，底层细节只写日志
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 在一个事务内写入订单头和全部条目
    ///
    /// 任一步失败整体回滚，返回第一个错误
    async fn create(&self, order: &NewOrder) -> AppResult<Order>;

    /// 用户的订单，按创建时间倒序，不含条目
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Order>>;

    /// 根据 ID 查找订单，不含条目
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Order>>;

    /// 订单条目，按写入顺序
    async fn find_items(&self, order_id: i32) -> AppResult<Vec<OrderItem>>;

    /// 连通性检查
    async fn ping(&self) -> AppResult<()>;
}
