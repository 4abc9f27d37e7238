//! HTTP 接口

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use shop_bootstrap::{ApiJson, HealthResponse};
use shop_errors::{AppError, AppResult};

use crate::SERVICE_NAME;
use crate::application::OrderService;
use crate::domain::{NewOrder, Order};

pub fn router(service: Arc<OrderService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/orders", post(create_order))
        .route("/orders/{user_id}", get(list_user_orders))
        .route("/orders/detail/{order_id}", get(get_order_detail))
        .with_state(service)
}

async fn health(State(service): State<Arc<OrderService>>) -> Json<HealthResponse> {
    Json(HealthResponse::from_check(
        SERVICE_NAME,
        service.check_health().await,
    ))
}

async fn create_order(
    State(service): State<Arc<OrderService>>,
    ApiJson(new_order): ApiJson<NewOrder>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = service.create_order(new_order).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn list_user_orders(
    State(service): State<Arc<OrderService>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    service.list_orders(&user_id).await.map(Json)
}

async fn get_order_detail(
    State(service): State<Arc<OrderService>>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Order>> {
    let order_id: i32 = order_id
        .parse()
        .map_err(|_| AppError::validation("Invalid order ID"))?;

    service.get_order(order_id).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::{FailurePoint, InMemoryOrderRepository};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        repo: Arc<InMemoryOrderRepository>,
    }

    impl TestApp {
        fn new() -> Self {
            let repo = Arc::new(InMemoryOrderRepository::new());
            let service = Arc::new(OrderService::new(repo.clone()));
            Self {
                router: router(service),
                repo,
            }
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            (status, serde_json::from_slice(&bytes).unwrap())
        }

        async fn get(&self, uri: &str) -> (StatusCode, Value) {
            self.send(Request::get(uri).body(Body::empty()).unwrap())
                .await
        }

        async fn create(&self, body: Value) -> (StatusCode, Value) {
            self.send(
                Request::post("/orders")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }
    }

    fn sample_order() -> Value {
        json!({
            "user_id": "u1",
            "items": [{"product_id": 1, "quantity": 2}],
            "total": 1999.98
        })
    }

    #[tokio::test]
    async fn test_health_reflects_store() {
        let app = TestApp::new();

        let (status, body) = app.get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy", "service": "order-service"}));

        app.repo.fail_at(Some(FailurePoint::Ping)).await;
        let (_, body) = app.get("/health").await;
        assert_eq!(body["status"], "unhealthy");
    }

    #[tokio::test]
    async fn test_create_order() {
        let app = TestApp::new();

        let (status, body) = app.create(sample_order()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].as_i64().unwrap() > 0);
        assert_eq!(body["user_id"], "u1");
        assert_eq!(body["status"], "pending");
        assert_eq!(body["total"], json!(1999.98));
        assert_eq!(body["items"], json!([{"product_id": 1, "quantity": 2}]));
        assert!(body["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_create_order_requires_user_and_items() {
        let app = TestApp::new();

        let (status, body) = app.create(json!({"user_id": "", "items": []})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "User ID and items are required"}));
    }

    #[tokio::test]
    async fn test_create_order_with_null_items() {
        let app = TestApp::new();

        let (status, body) = app.create(json!({"user_id": "u1", "items": null})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "User ID and items are required"}));
    }

    #[tokio::test]
    async fn test_create_order_malformed_body() {
        let app = TestApp::new();

        let (status, body) = app.create(json!({"user_id": 42})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid request body"}));
    }

    #[tokio::test]
    async fn test_create_order_store_failure() {
        let app = TestApp::new();
        app.repo.fail_at(Some(FailurePoint::Commit)).await;

        let (status, body) = app.create(sample_order()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to commit order"}));
    }

    #[tokio::test]
    async fn test_atomic_create_is_invisible_on_failure() {
        let app = TestApp::new();
        app.repo.fail_at(Some(FailurePoint::InsertItems)).await;

        let (status, _) = app.create(sample_order()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        app.repo.fail_at(None).await;
        let (status, body) = app.get("/orders/u1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_list_user_orders() {
        let app = TestApp::new();
        let (_, first) = app.create(sample_order()).await;
        let (_, second) = app.create(sample_order()).await;

        let (status, body) = app.get("/orders/u1").await;
        assert_eq!(status, StatusCode::OK);
        let orders = body.as_array().unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0]["id"], second["id"]);
        assert_eq!(orders[1]["id"], first["id"]);
        assert_eq!(orders[0]["items"], json!([{"product_id": 1, "quantity": 2}]));

        let (status, body) = app.get("/orders/nobody").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_order_detail() {
        let app = TestApp::new();
        let (_, created) = app.create(sample_order()).await;

        let (status, body) = app
            .get(&format!("/orders/detail/{}", created["id"]))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, created);
    }

    #[tokio::test]
    async fn test_order_detail_not_found() {
        let app = TestApp::new();

        let (status, body) = app.get("/orders/detail/999999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Order not found"}));
    }

    #[tokio::test]
    async fn test_order_detail_invalid_id() {
        let app = TestApp::new();

        let (status, body) = app.get("/orders/detail/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid order ID"}));
    }
}
