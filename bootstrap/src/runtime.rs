//! 服务运行时

use metrics_exporter_prometheus::PrometheusHandle;
use shop_config::TelemetryConfig;
use shop_telemetry::{TelemetryError, init_from_config, init_metrics};
use tracing::{info, warn};

/// 初始化服务运行时：日志和 Prometheus recorder
pub fn init_runtime(
    service_name: &str,
    telemetry: &TelemetryConfig,
) -> Result<PrometheusHandle, TelemetryError> {
    init_from_config(telemetry);
    let handle = init_metrics()?;

    info!(
        service = service_name,
        app_env = %shop_config::app_env(),
        log_level = %telemetry.log_level,
        "Runtime initialized"
    );

    Ok(handle)
}

/// 等待关闭信号（Ctrl+C 或 SIGTERM）
///
/// 信号处理器安装失败时只记录日志，对应分支永远不会完成
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
