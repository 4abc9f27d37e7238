//! HTTP 接口

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use shop_bootstrap::{ApiJson, HealthResponse, null_as_default};
use shop_errors::AppResult;

use crate::SERVICE_NAME;
use crate::application::CartService;
use crate::domain::{Cart, CartItem};

pub fn router(service: Arc<CartService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/cart/{user_id}", get(get_cart))
        .route("/cart/{user_id}/add", post(add_to_cart))
        .route("/cart/{user_id}/remove", post(remove_from_cart))
        .route("/cart/{user_id}/clear", delete(clear_cart))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_id: i32,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

async fn health(State(service): State<Arc<CartService>>) -> Json<HealthResponse> {
    Json(HealthResponse::from_check(
        SERVICE_NAME,
        service.check_health().await,
    ))
}

async fn get_cart(
    State(service): State<Arc<CartService>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Cart>> {
    service.get_cart(&user_id).await.map(Json)
}

async fn add_to_cart(
    State(service): State<Arc<CartService>>,
    Path(user_id): Path<String>,
    ApiJson(item): ApiJson<CartItem>,
) -> AppResult<(StatusCode, Json<Cart>)> {
    let cart = service.add_item(&user_id, item).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

async fn remove_from_cart(
    State(service): State<Arc<CartService>>,
    Path(user_id): Path<String>,
    ApiJson(req): ApiJson<RemoveItemRequest>,
) -> AppResult<Json<Cart>> {
    service.remove_item(&user_id, req.product_id).await.map(Json)
}

async fn clear_cart(
    State(service): State<Arc<CartService>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    service.clear_cart(&user_id).await?;
    Ok(Json(MessageResponse {
        message: "Cart cleared successfully".to_string(),
    }))
}
