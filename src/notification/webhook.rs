//! Discord Webhook 投递客户端
//!
//! 负责单次 HTTP POST、解析响应码，并驱动重试状态机：
//! - 204：成功
//! - 429：按响应头给出的等待时间重试（最多 `max_retries` 次）
//! - 其他状态码：立即失败，不重试
//! - 网络错误：按 `2^attempt` 秒指数退避重试，耗尽后以 500 失败
//!
//! 投递失败不会作为错误抛出，而是收敛为 `DeliveryOutcome`。

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::payload::RenderedPayload;
use crate::error::{RelayError, Result};

/// 默认最大重试次数（不含首次发送）
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// 限流响应缺少等待时间时的默认值（秒）
pub const DEFAULT_RETRY_AFTER_SECS: f64 = 5.0;

/// 默认 HTTP 超时（秒）
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Discord 限流等待时间响应头
const RATE_LIMIT_RESET_AFTER: &str = "X-RateLimit-Reset-After";

/// 成功状态码
const STATUS_NO_CONTENT: u16 = 204;

/// 限流状态码
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// 网络错误耗尽重试后上报的状态码
const STATUS_TRANSPORT_FAILURE: u16 = 500;

/// Webhook 客户端配置
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Webhook URL（必填）
    pub webhook_url: Option<String>,
    /// 首次发送之外的最大重试次数
    pub max_retries: u32,
    /// 限流默认等待时间
    pub default_retry_after: Duration,
    /// 单次 HTTP 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            max_retries: DEFAULT_MAX_RETRIES,
            default_retry_after: Duration::from_secs_f64(DEFAULT_RETRY_AFTER_SECS),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl WebhookConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            webhook_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// 校验并返回 webhook URL
    fn validated_url(&self) -> Result<String> {
        let url = self
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| RelayError::configuration("Discord webhook URL not configured"))?;

        Url::parse(url)
            .map_err(|e| RelayError::configuration(format!("Invalid webhook URL: {}", e)))?;

        Ok(url.to_string())
    }
}

/// 单次 HTTP 调用的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// 限流响应头中的原始等待时间
    pub retry_after: Option<String>,
}

impl TransportResponse {
    pub fn status(status: u16) -> Self {
        Self { status, retry_after: None }
    }

    pub fn rate_limited(retry_after: impl Into<String>) -> Self {
        Self {
            status: STATUS_TOO_MANY_REQUESTS,
            retry_after: Some(retry_after.into()),
        }
    }
}

/// 出站 HTTP 调用
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// POST payload，返回状态码；连接失败、超时等网络错误返回 Err
    async fn post(&self, url: &str, payload: &RenderedPayload) -> AnyResult<TransportResponse>;
}

/// 重试之间的挂起
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// 基于 reqwest 的传输层，连接池由 reqwest 管理
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                RelayError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn post(&self, url: &str, payload: &RenderedPayload) -> AnyResult<TransportResponse> {
        let response = self.client.post(url).json(payload).send().await?;

        let headers = response.headers();
        let retry_after = headers
            .get(RATE_LIMIT_RESET_AFTER)
            .or_else(|| headers.get(reqwest::header::RETRY_AFTER))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(TransportResponse {
            status: response.status().as_u16(),
            retry_after,
        })
    }
}

/// tokio 定时器
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// 重试循环的终态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryState {
    Succeeded { status: u16 },
    /// 重试耗尽时仍被限流
    RateLimited { status: u16, attempts: u32 },
    Failed { status: u16, message: String },
}

/// 返回给调用方的投递结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub status: u16,
    pub success: bool,
    pub message: String,
}

impl From<DeliveryState> for DeliveryOutcome {
    fn from(state: DeliveryState) -> Self {
        match state {
            DeliveryState::Succeeded { status } => Self {
                status,
                success: true,
                message: "Message sent successfully".to_string(),
            },
            DeliveryState::RateLimited { status, attempts } => Self {
                status,
                success: false,
                message: format!(
                    "Failed to send message. Status: {} (rate limited after {} attempts)",
                    status, attempts
                ),
            },
            DeliveryState::Failed { status, message } => Self {
                status,
                success: false,
                message,
            },
        }
    }
}

/// 网络错误的退避时间：1s, 2s, 4s, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

/// 解析限流等待时间（秒，允许小数）
///
/// 缺失、无法解析、为负或超出 `Duration` 范围时使用默认值。
pub fn parse_retry_after(raw: Option<&str>, default: Duration) -> Duration {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(default)
}

/// Webhook 投递客户端
#[derive(Clone)]
pub struct WebhookClient {
    url: String,
    max_retries: u32,
    default_retry_after: Duration,
    transport: Arc<dyn WebhookTransport>,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for WebhookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookClient")
            .field("max_retries", &self.max_retries)
            .field("default_retry_after", &self.default_retry_after)
            .finish_non_exhaustive()
    }
}

impl WebhookClient {
    /// 创建使用 reqwest 和 tokio 定时器的客户端
    ///
    /// URL 缺失或无效时返回 `RelayError::Configuration`。
    pub fn new(config: WebhookConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout_secs)?;
        Self::with_transport(config, Arc::new(transport), Arc::new(TokioSleeper))
    }

    /// 使用自定义传输层和定时器创建客户端
    pub fn with_transport(
        config: WebhookConfig,
        transport: Arc<dyn WebhookTransport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self> {
        let url = config.validated_url()?;

        Ok(Self {
            url,
            max_retries: config.max_retries,
            default_retry_after: config.default_retry_after,
            transport,
            sleeper,
        })
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// 投递 payload，总是返回结构化结果
    pub async fn deliver(&self, payload: &RenderedPayload) -> DeliveryOutcome {
        self.run(payload).await.into()
    }

    /// 有界重试循环，同一份 payload 最多发送 `max_retries + 1` 次
    pub async fn run(&self, payload: &RenderedPayload) -> DeliveryState {
        let mut attempt: u32 = 0;

        loop {
            debug!(attempt, title = %payload.title(), "Posting to webhook");

            let wait = match self.transport.post(&self.url, payload).await {
                Ok(resp) if resp.status == STATUS_NO_CONTENT => {
                    debug!(attempt, "Webhook accepted message");
                    return DeliveryState::Succeeded { status: resp.status };
                }
                Ok(resp) if resp.status == STATUS_TOO_MANY_REQUESTS => {
                    if attempt >= self.max_retries {
                        error!(attempts = attempt + 1, "Rate limited, retries exhausted");
                        return DeliveryState::RateLimited {
                            status: resp.status,
                            attempts: attempt + 1,
                        };
                    }
                    let wait =
                        parse_retry_after(resp.retry_after.as_deref(), self.default_retry_after);
                    warn!(
                        attempt,
                        wait_secs = wait.as_secs_f64(),
                        "Rate limited, retrying after wait"
                    );
                    wait
                }
                Ok(resp) => {
                    let message = format!("Failed to send message. Status: {}", resp.status);
                    error!(status = resp.status, "{}", message);
                    return DeliveryState::Failed { status: resp.status, message };
                }
                Err(e) => {
                    let message = format!("Error sending webhook: {}", e);
                    if attempt >= self.max_retries {
                        error!(
                            attempts = attempt + 1,
                            error = %e,
                            "Webhook unreachable, retries exhausted"
                        );
                        return DeliveryState::Failed {
                            status: STATUS_TRANSPORT_FAILURE,
                            message,
                        };
                    }
                    let wait = backoff_delay(attempt);
                    warn!(
                        attempt,
                        wait_secs = wait.as_secs(),
                        error = %e,
                        "Webhook request failed, backing off"
                    );
                    wait
                }
            };

            self.sleeper.sleep(wait).await;
            attempt += 1;
        }
    }
}
