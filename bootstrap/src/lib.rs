//! shop-bootstrap - 统一服务启动骨架
//!
//! 所有服务复用的启动逻辑

mod extract;
mod health;
mod retry;
mod runtime;
mod starter;

pub use extract::*;
pub use health::*;
pub use retry::*;
pub use runtime::*;
pub use starter::*;
