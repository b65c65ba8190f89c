//! 错误类型
//!
//! 只有无法恢复的前置条件会作为错误向外传播：输入校验失败、配置缺失、调用方超时。
//! 投递阶段的失败（限流耗尽、非 204 响应、网络错误）都收敛为 `DeliveryOutcome`。

use std::time::Duration;

use thiserror::Error;

/// Relay 错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// 输入校验失败（content / origin 为空或超长）
    #[error("Message validation failed: {0}")]
    Validation(String),

    /// 配置错误（webhook URL 缺失或无效、HTTP 客户端无法创建）
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 调用方设置的截止时间已到
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl RelayError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
