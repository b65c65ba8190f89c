//! Discord Alert - 将结构化通知事件转发到 Discord webhook

pub mod cli;
pub mod config;
pub mod error;
pub mod notification;
pub mod server;

pub use config::RelayConfig;
pub use error::RelayError;
pub use notification::{
    DeliveryOutcome, InboundMessage, NotificationEvent, NotificationPipeline, RenderedPayload,
    Severity, WebhookClient, WebhookConfig,
};
