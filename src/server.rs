//! HTTP 入口
//!
//! - `POST /webhook`：处理一条通知，返回 `DeliveryOutcome`（投递失败也返回 200）
//! - `GET /health`：健康检查
//!
//! 校验失败、配置错误、超时统一映射为 500，响应体 `{"detail": "..."}`。

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::notification::{DeliveryOutcome, InboundMessage, NotificationPipeline};

/// 服务名（健康检查中返回）
pub const SERVICE_NAME: &str = "discord-alert";

/// 请求处理共享状态
#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: NotificationPipeline,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(pipeline: NotificationPipeline, request_timeout: Duration) -> Self {
        Self { pipeline, request_timeout }
    }
}

/// 健康检查响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// 错误响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// 管道错误到 HTTP 响应的映射
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: format!("Message processing failed: {}", self.0),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook", post(receive_message))
        .route("/health", get(health_check))
        .with_state(state)
}

/// POST /webhook
async fn receive_message(
    State(state): State<Arc<AppState>>,
    Json(message): Json<InboundMessage>,
) -> Result<Json<DeliveryOutcome>, ApiError> {
    let outcome = state
        .pipeline
        .process_with_deadline(message, state.request_timeout)
        .await?;
    Ok(Json(outcome))
}

/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 启动 HTTP 服务，直到收到 Ctrl-C
pub async fn serve(config: &RelayConfig) -> Result<()> {
    let pipeline = NotificationPipeline::from_config(config)?;
    let state = Arc::new(AppState::new(pipeline, config.request_timeout()));

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.bind_address))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(addr = %addr, "discord-alert listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    warn!("discord-alert shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
