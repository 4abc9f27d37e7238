//! ports - 抽象 trait 层
//!
//! 定义基础设施的抽象接口，服务只依赖这里的 trait

mod key_value;

pub use key_value::*;
