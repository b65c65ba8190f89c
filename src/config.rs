//! 配置加载
//!
//! 优先级（后者覆盖前者）：
//! 1. 内置默认值
//! 2. 配置文件 `~/.config/discord-alert/config.json`（或 `--config` 指定的路径）
//! 3. 环境变量 `DISCORD_WEBHOOK_URL`、`DISCORD_ALERT_BIND`、
//!    `DISCORD_ALERT_MAX_RETRIES`、`DISCORD_ALERT_TIMEOUT_SECS`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RelayError, Result};
use crate::notification::webhook::{
    WebhookConfig, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_AFTER_SECS,
};

pub const ENV_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
pub const ENV_BIND: &str = "DISCORD_ALERT_BIND";
pub const ENV_MAX_RETRIES: &str = "DISCORD_ALERT_MAX_RETRIES";
pub const ENV_TIMEOUT_SECS: &str = "DISCORD_ALERT_TIMEOUT_SECS";

/// 默认监听地址
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// 单次调用的默认截止时间（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Relay 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Discord webhook URL
    pub webhook_url: Option<String>,
    /// 首次发送之外的最大重试次数
    pub max_retries: u32,
    /// 限流响应缺少等待时间时的默认值（秒）
    pub default_retry_after_secs: f64,
    /// 单次 HTTP 请求超时（秒）
    pub http_timeout_secs: u64,
    /// 整个 `process` 调用的截止时间（秒）
    pub request_timeout_secs: u64,
    /// HTTP 服务监听地址
    pub bind_address: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            max_retries: DEFAULT_MAX_RETRIES,
            default_retry_after_secs: DEFAULT_RETRY_AFTER_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

impl RelayConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("discord-alert").join("config.json"))
    }

    /// 加载配置：默认值 → 配置文件 → 环境变量
    ///
    /// 指定了 `path` 时文件必须存在；默认路径不存在则跳过。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 从 JSON 文件读取
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RelayError::configuration(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            RelayError::configuration(format!("Invalid config {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// 用环境变量覆盖；`lookup` 便于测试时注入
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_WEBHOOK_URL).filter(|u| !u.trim().is_empty()) {
            debug!("Using {} from environment", ENV_WEBHOOK_URL);
            self.webhook_url = Some(url);
        }

        if let Some(bind) = lookup(ENV_BIND).filter(|b| !b.trim().is_empty()) {
            self.bind_address = bind;
        }

        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            match raw.trim().parse() {
                Ok(n) => self.max_retries = n,
                Err(_) => warn!(key = ENV_MAX_RETRIES, value = %raw, "Ignoring invalid value"),
            }
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse() {
                Ok(n) => self.http_timeout_secs = n,
                Err(_) => warn!(key = ENV_TIMEOUT_SECS, value = %raw, "Ignoring invalid value"),
            }
        }
    }

    /// 投递客户端配置
    pub fn webhook_config(&self) -> WebhookConfig {
        // 负数、NaN 或超出范围的值回退到默认等待时间
        let retry_after = Duration::try_from_secs_f64(self.default_retry_after_secs)
            .unwrap_or(Duration::from_secs_f64(DEFAULT_RETRY_AFTER_SECS));

        WebhookConfig {
            webhook_url: self.webhook_url.clone(),
            max_retries: self.max_retries,
            default_retry_after: retry_after,
            timeout_secs: self.http_timeout_secs,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
