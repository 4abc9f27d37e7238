//! HTTP 接口

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use shop_bootstrap::HealthResponse;
use shop_errors::{AppError, AppResult};

use crate::SERVICE_NAME;
use crate::catalog::{Catalog, Product};

pub fn router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .with_state(catalog)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(SERVICE_NAME))
}

async fn list_products(State(catalog): State<Arc<Catalog>>) -> Json<Vec<Product>> {
    Json(catalog.list().to_vec())
}

async fn get_product(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let id: i32 = id
        .parse()
        .map_err(|_| AppError::validation("Invalid product ID"))?;

    catalog
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("Product not found"))
}
