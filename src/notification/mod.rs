//! 通知投递管道
//!
//! 数据单向流动：原始消息 → 校验后的事件 → 渲染后的 payload → 投递尝试 → 投递结果。
//!
//! # 使用示例
//! ```ignore
//! use discord_alert::notification::{
//!     InboundMessage, NotificationPipeline, WebhookClient, WebhookConfig,
//! };
//!
//! let config = WebhookConfig::with_url("https://discord.com/api/webhooks/...");
//! let client = WebhookClient::new(config)?;
//! let pipeline = NotificationPipeline::new(client);
//!
//! let outcome = pipeline
//!     .process(InboundMessage::new("ERROR", "Payment gateway timeout", "billing"))
//!     .await?;
//! ```

pub mod event;
pub mod formatter;
pub mod payload;
pub mod pipeline;
pub mod severity;
pub mod webhook;

pub use event::{InboundMessage, NotificationEvent, NotificationEventBuilder};
pub use formatter::{format, humanize_key, stringify_value};
pub use payload::{Embed, EmbedField, EmbedFooter, RenderedPayload};
pub use pipeline::{render, NotificationPipeline};
pub use severity::{Severity, SeverityStyle};
pub use webhook::{
    DeliveryOutcome, DeliveryState, ReqwestTransport, Sleeper, TokioSleeper, TransportResponse,
    WebhookClient, WebhookConfig, WebhookTransport,
};
