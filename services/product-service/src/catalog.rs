//! 商品目录
//!
//! 启动时构建的只读目录，顺序固定

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 商品
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
}

impl Product {
    fn new(id: i32, name: &str, description: &str, price_cents: i64, stock: i32) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price: Decimal::new(price_cents, 2),
            stock,
        }
    }
}

/// 商品目录
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// 默认目录
    pub fn seeded() -> Self {
        Self::new(vec![
            Product::new(1, "Laptop", "High-performance laptop", 99999, 10),
            Product::new(2, "Mouse", "Wireless mouse", 2999, 50),
            Product::new(3, "Keyboard", "Mechanical keyboard", 7999, 30),
            Product::new(4, "Monitor", "4K Monitor", 39999, 15),
            Product::new(5, "Headphones", "Noise-cancelling headphones", 19999, 25),
        ])
    }

    pub fn list(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: i32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}
