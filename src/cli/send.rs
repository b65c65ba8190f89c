// src/cli/send.rs
//! Send / Preview 命令
//!
//! `send` 走完整管道并输出投递结果；`preview` 只校验和格式化，打印将要发送的 payload。

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde_json::{Map, Value};
use tracing::info;

use super::output::{format_outcome, to_pretty_json};
use crate::config::RelayConfig;
use crate::notification::{render, InboundMessage, NotificationPipeline};

/// 消息参数（send 和 preview 共用）
#[derive(Args, Debug, Clone)]
pub struct MessageArgs {
    /// 消息类型: INFO, WARNING, ERROR, SUCCESS, DEBUG, CRITICAL
    #[arg(long = "type", short = 't', default_value = "INFO")]
    pub msg_type: String,

    /// 消息正文
    #[arg(long, short)]
    pub content: String,

    /// 来源系统或服务
    #[arg(long, short)]
    pub origin: String,

    /// 附加信息 key=value，可重复；value 是合法 JSON 时按 JSON 解析
    #[arg(long = "detail", short = 'd', value_parser = parse_detail)]
    pub details: Vec<(String, Value)>,

    /// 时间戳 (RFC 3339)，默认当前时间
    #[arg(long)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl MessageArgs {
    pub fn into_message(self) -> InboundMessage {
        let mut message = InboundMessage::new(self.msg_type, self.content, self.origin);
        if !self.details.is_empty() {
            let details: Map<String, Value> = self.details.into_iter().collect();
            message = message.with_details(details);
        }
        if let Some(ts) = self.timestamp {
            message = message.with_timestamp(ts);
        }
        message
    }
}

/// 解析 `key=value`
pub fn parse_detail(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{}`", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Send 命令参数
#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub message: MessageArgs,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// Preview 命令参数
#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub message: MessageArgs,
}

/// 处理 send 命令，投递失败时返回错误（退出码非 0）
pub async fn handle_send(args: SendArgs, config: &RelayConfig) -> Result<()> {
    let pipeline = NotificationPipeline::from_config(config)?;
    let message = args.message.into_message();

    info!(origin = %message.origin, msg_type = %message.msg_type, "Sending notification");

    let outcome = pipeline
        .process_with_deadline(message, config.request_timeout())
        .await?;

    println!("{}", format_outcome(&outcome, args.json));

    if !outcome.success {
        bail!("Delivery failed with status {}", outcome.status);
    }
    Ok(())
}

/// 处理 preview 命令
pub fn handle_preview(args: PreviewArgs) -> Result<()> {
    let payload = render(args.message.into_message())?;
    println!("{}", to_pretty_json(&payload));
    Ok(())
}
