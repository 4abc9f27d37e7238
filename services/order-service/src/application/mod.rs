//! 应用层

mod order_service;

pub use order_service::*;
