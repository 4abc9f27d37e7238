//! shop-adapter-redis - Redis 适配器

mod connection;
mod store;

pub use connection::*;
pub use store::*;
