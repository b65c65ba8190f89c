//! Payload 结构 - Discord webhook 的 embed 消息
//!
//! Payload 格式：
//! ```json
//! {
//!   "embeds": [{
//!     "title": "❌ ERROR from billing",
//!     "description": "⚠️ Payment gateway timeout",
//!     "color": 15158332,
//!     "fields": [{ "name": "Order Id", "value": "A-42", "inline": true }],
//!     "footer": { "text": "Timestamp: 2024-01-02 03:04:05 UTC" }
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// 发送到 webhook 的完整 payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPayload {
    pub embeds: Vec<Embed>,
}

impl RenderedPayload {
    pub fn single(embed: Embed) -> Self {
        Self { embeds: vec![embed] }
    }

    /// 第一个 embed 的标题（用于日志）
    pub fn title(&self) -> &str {
        self.embeds.first().map(|e| e.title.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}
