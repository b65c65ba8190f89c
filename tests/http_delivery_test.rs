//! 真实 HTTP 投递测试：本地 axum 服务模拟 Discord webhook

mod common;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use common::RecordingSleeper;
use discord_alert::notification::{
    InboundMessage, NotificationPipeline, ReqwestTransport, WebhookClient, WebhookConfig,
};
use serde_json::Value;
use tokio::net::TcpListener;

/// 模拟的 webhook 响应
#[derive(Clone)]
enum Reply {
    NoContent,
    RateLimited(&'static str),
    /// 只带标准 `Retry-After`
    RetryAfter(&'static str),
    /// 两个头同时存在：(X-RateLimit-Reset-After, Retry-After)
    BothHeaders(&'static str, &'static str),
    Status(StatusCode),
}

#[derive(Default)]
struct FakeDiscord {
    replies: Mutex<VecDeque<Reply>>,
    received: Mutex<Vec<Value>>,
}

async fn hook(State(fake): State<Arc<FakeDiscord>>, Json(body): Json<Value>) -> Response {
    fake.received.lock().unwrap().push(body);
    let reply = fake.replies.lock().unwrap().pop_front().unwrap_or(Reply::NoContent);

    match reply {
        Reply::NoContent => StatusCode::NO_CONTENT.into_response(),
        Reply::RateLimited(after) => (
            StatusCode::TOO_MANY_REQUESTS,
            [("x-ratelimit-reset-after", after)],
        )
            .into_response(),
        Reply::RetryAfter(after) => {
            (StatusCode::TOO_MANY_REQUESTS, [("retry-after", after)]).into_response()
        }
        Reply::BothHeaders(reset_after, retry_after) => (
            StatusCode::TOO_MANY_REQUESTS,
            [
                ("x-ratelimit-reset-after", reset_after),
                ("retry-after", retry_after),
            ],
        )
            .into_response(),
        Reply::Status(status) => status.into_response(),
    }
}

async fn start_fake(replies: Vec<Reply>) -> (SocketAddr, Arc<FakeDiscord>) {
    let fake = Arc::new(FakeDiscord {
        replies: Mutex::new(replies.into()),
        received: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/api/webhooks/1/token", post(hook))
        .with_state(fake.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, fake)
}

fn pipeline(url: String, sleeper: Arc<RecordingSleeper>) -> NotificationPipeline {
    let transport = Arc::new(ReqwestTransport::new(5).unwrap());
    let client =
        WebhookClient::with_transport(WebhookConfig::with_url(url), transport, sleeper).unwrap();
    NotificationPipeline::new(client)
}

#[tokio::test]
async fn test_delivers_embed_over_http() {
    let (addr, fake) = start_fake(vec![]).await;
    let sleeper = Arc::new(RecordingSleeper::default());

    let outcome = pipeline(format!("http://{addr}/api/webhooks/1/token"), sleeper)
        .process(InboundMessage::new("ERROR", "Payment gateway timeout", "billing"))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.status, 204);

    let received = fake.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let embed = &received[0]["embeds"][0];
    assert_eq!(embed["title"], "❌ ERROR from billing");
    assert_eq!(embed["description"], "⚠️ Payment gateway timeout");
    assert_eq!(embed["color"], 0xe74c3c);
    assert!(embed["fields"].as_array().unwrap().is_empty());
    assert!(embed["footer"]["text"].as_str().unwrap().starts_with("Timestamp: "));
}

#[tokio::test]
async fn test_reads_rate_limit_header() {
    let (addr, fake) =
        start_fake(vec![Reply::RateLimited("0.25"), Reply::RateLimited("1")]).await;
    let sleeper = Arc::new(RecordingSleeper::default());

    let outcome = pipeline(format!("http://{addr}/api/webhooks/1/token"), sleeper.clone())
        .process(InboundMessage::new("INFO", "hello", "svc"))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(
        sleeper.waits(),
        vec![Duration::from_millis(250), Duration::from_secs(1)]
    );

    let received = fake.received.lock().unwrap();
    assert_eq!(received.len(), 3);
    assert!(received.iter().all(|body| *body == received[0]));
}

#[tokio::test]
async fn test_falls_back_to_retry_after_header() {
    let (addr, fake) = start_fake(vec![Reply::RetryAfter("2")]).await;
    let sleeper = Arc::new(RecordingSleeper::default());

    let outcome = pipeline(format!("http://{addr}/api/webhooks/1/token"), sleeper.clone())
        .process(InboundMessage::new("INFO", "hello", "svc"))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(sleeper.waits(), vec![Duration::from_secs(2)]);
    assert_eq!(fake.received.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_reset_after_header_takes_precedence() {
    let (addr, _fake) = start_fake(vec![Reply::BothHeaders("0.5", "30")]).await;
    let sleeper = Arc::new(RecordingSleeper::default());

    let outcome = pipeline(format!("http://{addr}/api/webhooks/1/token"), sleeper.clone())
        .process(InboundMessage::new("INFO", "hello", "svc"))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(sleeper.waits(), vec![Duration::from_millis(500)]);
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let (addr, fake) = start_fake(vec![Reply::Status(StatusCode::BAD_GATEWAY)]).await;
    let sleeper = Arc::new(RecordingSleeper::default());

    let outcome = pipeline(format!("http://{addr}/api/webhooks/1/token"), sleeper.clone())
        .process(InboundMessage::new("INFO", "hello", "svc"))
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.status, 502);
    assert!(sleeper.waits().is_empty());
    assert_eq!(fake.received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_connection_refused_backs_off() {
    // 绑定后立即释放，得到一个无人监听的端口
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sleeper = Arc::new(RecordingSleeper::default());

    let outcome = pipeline(format!("http://{addr}/api/webhooks/1/token"), sleeper.clone())
        .process(InboundMessage::new("INFO", "hello", "svc"))
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.status, 500);
    assert!(outcome.message.starts_with("Error sending webhook: "));
    assert_eq!(
        sleeper.waits(),
        vec![Duration::from_secs(1), Duration::from_secs(2), Duration::from_secs(4)]
    );
}
