//! 服务启动器
//!
//! 统一的 HTTP 服务启动模式：合并 `/metrics`，挂载 TraceLayer，
//! 收到关闭信号后优雅退出

use axum::{Router, http::header, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use shop_config::ServerConfig;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::runtime::shutdown_signal;

/// Prometheus 文本格式的 `/metrics` 路由
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move {
                (
                    [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
                    handle.render(),
                )
            }
        }),
    )
}

/// 启动 HTTP 服务，直到收到关闭信号
pub async fn serve(
    service_name: &str,
    app: Router,
    server: &ServerConfig,
    metrics: PrometheusHandle,
) -> std::io::Result<()> {
    let app = app
        .merge(metrics_router(metrics))
        .layer(TraceLayer::new_for_http());

    let addr = server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(service = service_name, %addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(service = service_name, "Service stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_metrics_endpoint_renders_text() {
        let handle = PrometheusBuilder::new().build_recorder().handle();

        let response = metrics_router(handle)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(std::str::from_utf8(&bytes).is_ok());
    }
}
