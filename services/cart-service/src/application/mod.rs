//! 应用层

mod cart_service;

pub use cart_service::*;
