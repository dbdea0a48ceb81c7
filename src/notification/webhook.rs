//! 飞书机器人 Webhook 客户端
//!
//! 消息格式：`{"msg_type": "text", "content": {"text": "..."}}`

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// 请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// 文本消息内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

/// Webhook 请求载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeishuMessage {
    /// 消息类型，固定为 "text"
    pub msg_type: String,
    pub content: TextContent,
}

impl FeishuMessage {
    /// 创建文本消息
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            msg_type: "text".to_string(),
            content: TextContent { text: text.into() },
        }
    }
}

/// Webhook 传输层
///
/// 成功只看 HTTP 2xx；连接失败、超时、非 2xx 都返回 `Err`，内容为错误描述。
pub trait WebhookTransport: Send + Sync {
    fn post(&self, url: &str, message: &FeishuMessage, timeout: Duration) -> Result<(), String>;
}

/// 基于 reqwest blocking 的实现
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl WebhookTransport for HttpTransport {
    fn post(&self, url: &str, message: &FeishuMessage, timeout: Duration) -> Result<(), String> {
        let start = std::time::Instant::now();
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(message)
            .timeout(timeout)
            .send()
            .map_err(|e| e.to_string())?;

        let status = response.status();
        response.error_for_status().map_err(|e| e.to_string())?;

        debug!(
            status = %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Feishu webhook accepted message"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_shape() {
        let message = FeishuMessage::text("Host: srv1 Status: 502");
        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"msg_type":"text","content":{"text":"Host: srv1 Status: 502"}}"#
        );
    }

    #[test]
    fn test_message_round_trips_through_json() {
        let parsed: FeishuMessage =
            serde_json::from_str(r#"{"msg_type":"text","content":{"text":"hi"}}"#).unwrap();
        assert_eq!(parsed, FeishuMessage::text("hi"));
    }

    #[test]
    fn test_http_transport_reports_connection_failure() {
        // 端口 1 上通常没有服务，连接会被拒绝
        let transport = HttpTransport::new();
        let result = transport.post(
            "http://127.0.0.1:1/open-apis/bot/v2/hook/B",
            &FeishuMessage::text("x"),
            Duration::from_secs(2),
        );
        assert!(result.is_err());
    }
}
