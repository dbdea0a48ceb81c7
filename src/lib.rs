//! Feishu Alert - 日志监控规则命中后推送飞书机器人消息

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod flatten;
pub mod notification;
pub mod observer;
pub mod template;

pub use clock::{Clock, FixedClock, LocalClock};
pub use config::{RuleConfig, SkipWindow, DEFAULT_WEBHOOK_URL, REQUIRED_OPTIONS};
pub use error::{AlertError, RenderError};
pub use flatten::{apply_defaults, flatten};
pub use notification::{
    AlertInfo, AlertOutcome, Alerter, FeishuAlerter, FeishuMessage, HttpTransport, WebhookTransport,
};
pub use observer::{AlertObserver, Level, RecordingObserver, TracingObserver};
pub use template::{render, Rendered, TemplateWarning};
