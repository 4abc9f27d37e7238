//! 持久化层

mod in_memory_order_repository;
mod postgres_order_repository;
mod schema;

pub use in_memory_order_repository::*;
pub use postgres_order_repository::*;
pub use schema::*;
