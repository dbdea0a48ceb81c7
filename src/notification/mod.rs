//! 通知层 - 飞书机器人告警
//!
//! # 使用示例
//! ```ignore
//! use feishu_alert::notification::{Alerter, FeishuAlerter};
//!
//! let alerter = FeishuAlerter::new(serde_json::json!({
//!     "feishualert_botid": "xxxx",
//!     "feishualert_title": "Nginx 5xx",
//!     "feishualert_body": "Host: {host.name} Status: {status}",
//! }))?;
//!
//! alerter.alert(&[serde_json::json!({"host": {"name": "srv1"}, "status": 502})])?;
//! ```

pub mod channel;
pub mod feishu;
pub mod webhook;

pub use channel::{AlertInfo, AlertOutcome, Alerter};
pub use feishu::{FeishuAlerter, ALERTER_TYPE};
pub use webhook::{FeishuMessage, HttpTransport, TextContent, WebhookTransport, DEFAULT_TIMEOUT_SECS};
