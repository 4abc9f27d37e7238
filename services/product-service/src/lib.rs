//! Product Service - 商品目录服务
//!
//! 只读的固定商品目录，无外部依赖

pub mod api;
pub mod catalog;
pub mod config;

pub const SERVICE_NAME: &str = "product-service";
