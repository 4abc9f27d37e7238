//! 请求提取器
//!
//! 解析失败统一转换为 `AppError::Validation`，响应体与其他错误一致

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use shop_errors::AppError;
use tracing::debug;

pub const INVALID_REQUEST_BODY: &str = "Invalid request body";

/// JSON 请求体
///
/// 不要求 `Content-Type: application/json`，只要求请求体是合法 JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            debug!(error = %rejection, "Failed to read request body");
            AppError::validation(INVALID_REQUEST_BODY)
        })?;

        serde_json::from_slice(&bytes).map(ApiJson).map_err(|e| {
            debug!(error = %e, "Failed to parse request body");
            AppError::validation(INVALID_REQUEST_BODY)
        })
    }
}

/// 字段缺失或为 `null` 时取类型默认值
///
/// 配合 `#[serde(default, deserialize_with = "null_as_default")]` 使用
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "null_as_default")]
        product_id: i32,
    }

    fn app() -> Router {
        Router::new().route(
            "/echo",
            post(|ApiJson(payload): ApiJson<Payload>| async move { payload.product_id.to_string() }),
        )
    }

    async fn send(body: &'static str) -> (StatusCode, String) {
        let response = app()
            .oneshot(
                axum::http::Request::post("/echo")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_body_without_content_type() {
        let (status, body) = send(r#"{"product_id": 3}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "3");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (status, body) = send("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"error":"Invalid request body"}"#);
    }

    #[tokio::test]
    async fn test_wrong_field_type() {
        let (status, _) = send(r#"{"product_id": "three"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_or_null_field_takes_default() {
        assert_eq!(send("{}").await, (StatusCode::OK, "0".to_string()));
        assert_eq!(
            send(r#"{"product_id": null}"#).await,
            (StatusCode::OK, "0".to_string())
        );
    }
}
