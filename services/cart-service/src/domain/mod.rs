//! 领域层

mod cart;

pub use cart::*;
