//! 消息格式化模块 - 将通知事件转换为 Discord embed
//!
//! 纯函数，无 I/O，不会失败。样式来自固定的 severity 查找表。
//!
//! details 取值的字符串化规则：
//! - JSON 字符串原样输出
//! - 其他值（数字、布尔、null、数组、对象）输出为紧凑 JSON，如 `42`、`true`、`{"a":1}`

use serde_json::Value;

use super::event::NotificationEvent;
use super::payload::{Embed, EmbedField, EmbedFooter, RenderedPayload};

/// footer 时间格式
const FOOTER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 将事件格式化为 webhook payload
pub fn format(event: &NotificationEvent) -> RenderedPayload {
    let severity = event.severity();
    let style = severity.style();

    let fields = event
        .details()
        .iter()
        .map(|(key, value)| EmbedField {
            name: humanize_key(key),
            value: stringify_value(value),
            inline: true,
        })
        .collect();

    RenderedPayload::single(Embed {
        title: format!("{} {} from {}", style.title_glyph, severity.as_str(), event.origin()),
        description: format!("{} {}", style.symbol, event.content()),
        color: style.color,
        fields,
        footer: EmbedFooter {
            text: format!(
                "Timestamp: {} UTC",
                event.timestamp().format(FOOTER_TIME_FORMAT)
            ),
        },
    })
}

/// `user_id` -> `User Id`
///
/// 下划线替换为空格后按单词首字母大写：字母串的第一个字母大写，其余小写。
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_is_alpha = false;

    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }

    out
}

/// details 取值转字符串
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
