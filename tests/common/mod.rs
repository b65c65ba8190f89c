//! 集成测试共用的传输层和定时器替身

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use discord_alert::notification::{
    NotificationPipeline, RenderedPayload, Sleeper, TransportResponse, WebhookClient,
    WebhookConfig, WebhookTransport,
};

pub const TEST_WEBHOOK_URL: &str = "https://discord.test/api/webhooks/1/token";

/// 按脚本依次返回响应；脚本耗尽后一直返回 204
pub struct ScriptedTransport {
    script: Mutex<VecDeque<anyhow::Result<TransportResponse>>>,
    sent: Mutex<Vec<RenderedPayload>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<anyhow::Result<TransportResponse>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn always(status: u16) -> Arc<Self> {
        Self::new((0..16).map(|_| Ok(TransportResponse::status(status))).collect())
    }

    pub fn sent(&self) -> Vec<RenderedPayload> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl WebhookTransport for ScriptedTransport {
    async fn post(
        &self,
        _url: &str,
        payload: &RenderedPayload,
    ) -> anyhow::Result<TransportResponse> {
        self.sent.lock().unwrap().push(payload.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(TransportResponse::status(204)))
    }
}

/// 只记录等待时长，不真正挂起
#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

pub fn pipeline_with(
    transport: Arc<ScriptedTransport>,
    sleeper: Arc<RecordingSleeper>,
) -> NotificationPipeline {
    let client = WebhookClient::with_transport(
        WebhookConfig::with_url(TEST_WEBHOOK_URL),
        transport,
        sleeper,
    )
    .expect("valid test webhook config");
    NotificationPipeline::new(client)
}
