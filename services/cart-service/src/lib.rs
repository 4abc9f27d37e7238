//! Cart Service - 购物车服务
//!
//! 每个用户一个购物车，整体序列化为 JSON 存放在 Key-Value 存储中

pub mod api;
pub mod application;
pub mod config;
pub mod domain;

pub const SERVICE_NAME: &str = "cart-service";
