//! 告警器 trait 定义（宿主调用约定）

use serde::Serialize;
use serde_json::Value;

use super::webhook::FeishuMessage;
use crate::error::AlertError;

/// 告警器描述，宿主用来展示插件类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertInfo {
    #[serde(rename = "type")]
    pub kind: String,
}

impl AlertInfo {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

/// 单次 dispatch 的结果
#[derive(Debug, Clone, PartialEq)]
pub enum AlertOutcome {
    /// 已发送
    Sent,
    /// 跳过（静默时段）
    Skipped(String),
    /// dry-run，只生成消息不发送
    DryRun(FeishuMessage),
}

/// 告警器 trait
///
/// 宿主构造一次，每次规则命中时调用 `alert`。实现只持有不可变状态，可以跨线程并发调用。
pub trait Alerter: Send + Sync {
    /// 告警器名称（用于日志）
    fn name(&self) -> &str;

    /// 处理一批命中记录，只有投递失败会返回错误
    fn alert(&self, matches: &[Value]) -> Result<(), AlertError>;

    /// 插件描述
    fn info(&self) -> AlertInfo;
}
