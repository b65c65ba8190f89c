//! 通知事件结构
//!
//! `InboundMessage` 是调用方提交的原始记录；经过校验后得到不可变的 `NotificationEvent`。
//! 校验规则：content 与 origin 去除首尾空白后不能为空，且分别不超过 2000 / 100 个字符。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::severity::Severity;
use crate::error::{RelayError, Result};

/// content 最大长度（字符数）
pub const MAX_CONTENT_CHARS: usize = 2000;

/// origin 最大长度（字符数）
pub const MAX_ORIGIN_CHARS: usize = 100;

/// 调用方提交的原始消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// 消息类型（INFO / ERROR / ...，未知值按 INFO 处理）
    #[serde(rename = "type")]
    pub msg_type: String,
    /// 消息正文
    pub content: String,
    /// 产生消息的系统或服务
    pub origin: String,
    /// 附加上下文
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
    /// 时间戳（缺省为接收时间）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl InboundMessage {
    pub fn new(
        msg_type: impl Into<String>,
        content: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            msg_type: msg_type.into(),
            content: content.into(),
            origin: origin.into(),
            details: None,
            timestamp: None,
        }
    }

    /// 设置 details（链式调用）
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    /// 设置时间戳（链式调用）
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// 校验并转换为 `NotificationEvent`
    pub fn validate(self) -> Result<NotificationEvent> {
        let mut builder = NotificationEventBuilder::new()
            .severity(Severity::from_label(&self.msg_type))
            .content(self.content)
            .origin(self.origin);
        if let Some(details) = self.details {
            builder = builder.details(details);
        }
        if let Some(timestamp) = self.timestamp {
            builder = builder.timestamp(timestamp);
        }
        builder.build()
    }
}

/// 已校验的通知事件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationEvent {
    severity: Severity,
    content: String,
    origin: String,
    details: Map<String, Value>,
    timestamp: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// 去除首尾空白后的正文
    pub fn content(&self) -> &str {
        &self.content
    }

    /// 去除首尾空白后的来源
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// 按插入顺序排列的 details
    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 事件构建器
#[derive(Debug, Default)]
pub struct NotificationEventBuilder {
    severity: Option<Severity>,
    content: Option<String>,
    origin: Option<String>,
    details: Option<Map<String, Value>>,
    timestamp: Option<DateTime<Utc>>,
}

impl NotificationEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    /// 添加单个 detail，保持插入顺序
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// 构建事件，校验失败返回 `RelayError::Validation`
    pub fn build(self) -> Result<NotificationEvent> {
        let content = validate_text("Content", self.content.as_deref(), MAX_CONTENT_CHARS)?;
        let origin = validate_text("Origin", self.origin.as_deref(), MAX_ORIGIN_CHARS)?;

        debug!(origin = %origin, "Message validated successfully");

        Ok(NotificationEvent {
            severity: self.severity.unwrap_or_default(),
            content,
            origin,
            details: self.details.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        })
    }
}

fn validate_text(field: &str, value: Option<&str>, max_chars: usize) -> Result<String> {
    let trimmed = value.map(str::trim).unwrap_or_default();

    if trimmed.is_empty() {
        debug!(field, "Empty field");
        return Err(RelayError::validation(format!("{} cannot be empty", field)));
    }

    let len = trimmed.chars().count();
    if len > max_chars {
        debug!(field, len, max_chars, "Field too long");
        return Err(RelayError::validation(format!(
            "{} exceeds {} characters ({})",
            field, max_chars, len
        )));
    }

    Ok(trimmed.to_string())
}
