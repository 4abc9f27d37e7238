//! PostgreSQL 订单 Repository 实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shop_adapter_postgres::{TransactionManager, check_connection};
use shop_errors::{AppResult, ResultExt};
use sqlx::PgPool;
use tracing::debug;

use crate::domain::{NewOrder, Order, OrderItem, OrderRepository, OrderStatus};

pub struct PostgresOrderRepository {
    tx_manager: TransactionManager,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tx_manager: TransactionManager::new(pool),
        }
    }

    fn pool(&self) -> &PgPool {
        self.tx_manager.pool()
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: String,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> AppResult<Order> {
        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            items: Vec::new(),
            total: self.total,
            status: self.status.parse()?,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, new_order: &NewOrder) -> AppResult<Order> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .or_internal("Failed to create order")?;

        let inserted = sqlx::query_as::<_, (i32, Decimal, DateTime<Utc>)>(
            r#"
            INSERT INTO orders (user_id, total, status)
            VALUES ($1, $2, $3)
            RETURNING id, total, created_at
            "#,
        )
        .bind(&new_order.user_id)
        .bind(new_order.total)
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await
        .or_internal("Failed to create order");

        let (id, total, created_at) = match inserted {
            Ok(row) => row,
            Err(e) => return Err(TransactionManager::abort(tx, e).await),
        };

        for item in &new_order.items {
            let result = sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .or_internal("Failed to create order items");

            if let Err(e) = result {
                return Err(TransactionManager::abort(tx, e).await);
            }
        }

        TransactionManager::commit(tx)
            .await
            .or_internal("Failed to commit order")?;

        debug!(order_id = id, items = new_order.items.len(), "Order persisted");

        Ok(Order {
            id,
            user_id: new_order.user_id.clone(),
            items: new_order.items.clone(),
            total,
            status: OrderStatus::Pending,
            created_at,
        })
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, user_id, total, status, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .or_internal("Failed to retrieve orders")?;

        rows.into_iter()
            .map(|row| row.into_order().or_internal("Failed to retrieve orders"))
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, total, status, created_at FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .or_internal("Failed to retrieve order")?;

        row.map(|r| r.into_order().or_internal("Failed to retrieve order"))
            .transpose()
    }

    async fn find_items(&self, order_id: i32) -> AppResult<Vec<OrderItem>> {
        sqlx::query_as::<_, OrderItem>(
            "SELECT product_id, quantity FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(self.pool())
        .await
        .or_internal("Failed to retrieve order items")
    }

    async fn ping(&self) -> AppResult<()> {
        check_connection(self.pool()).await
    }
}
