//! Order Service - 订单服务
//!
//! 订单头和条目在同一个 PostgreSQL 事务内写入

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub const SERVICE_NAME: &str = "order-service";
