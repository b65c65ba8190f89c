//! 通知管道 - 校验 → 格式化 → 投递
//!
//! 只有校验失败、配置错误和调用方超时会以 `RelayError` 返回；
//! 投递失败原样作为 `DeliveryOutcome` 交给调用方。

use std::time::Duration;

use tracing::{error, info, warn};

use super::event::InboundMessage;
use super::formatter;
use super::payload::RenderedPayload;
use super::webhook::{DeliveryOutcome, WebhookClient};
use crate::config::RelayConfig;
use crate::error::{RelayError, Result};

/// 校验并格式化，不发送
pub fn render(message: InboundMessage) -> Result<RenderedPayload> {
    let event = message.validate()?;
    Ok(formatter::format(&event))
}

/// 通知管道，可在并发请求间共享
#[derive(Debug, Clone)]
pub struct NotificationPipeline {
    client: WebhookClient,
}

impl NotificationPipeline {
    pub fn new(client: WebhookClient) -> Self {
        Self { client }
    }

    /// 从配置创建，webhook URL 缺失时返回配置错误
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let client = WebhookClient::new(config.webhook_config())?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &WebhookClient {
        &self.client
    }

    /// 处理一条消息并等待投递终态
    pub async fn process(&self, message: InboundMessage) -> Result<DeliveryOutcome> {
        let origin = message.origin.trim().to_string();

        let event = match message.validate() {
            Ok(event) => event,
            Err(e) => {
                warn!(origin = %origin, error = %e, "Rejected notification");
                return Err(e);
            }
        };

        let payload = formatter::format(&event);
        let outcome = self.client.deliver(&payload).await;

        if outcome.success {
            info!(
                origin = %event.origin(),
                severity = %event.severity(),
                status = outcome.status,
                "Message processed and sent successfully"
            );
        } else {
            error!(
                origin = %event.origin(),
                severity = %event.severity(),
                status = outcome.status,
                detail = %outcome.message,
                "Message delivery failed"
            );
        }

        Ok(outcome)
    }

    /// 带截止时间的 `process`，超时后放弃投递
    pub async fn process_with_deadline(
        &self,
        message: InboundMessage,
        deadline: Duration,
    ) -> Result<DeliveryOutcome> {
        match tokio::time::timeout(deadline, self.process(message)).await {
            Ok(result) => result,
            Err(_) => {
                error!(deadline = ?deadline, "Notification processing timed out");
                Err(RelayError::Timeout(deadline))
            }
        }
    }
}
