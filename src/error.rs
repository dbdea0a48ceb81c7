//! 错误类型

use thiserror::Error;

/// 告警插件对外暴露的错误
///
/// 只有两类会到达调用方：构造时的配置错误，以及发送时的投递错误。
/// 模板问题在 dispatch 内部降级处理，不会从这里抛出。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlertError {
    /// 规则配置无效（缺少 botid/title/body 等）
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Webhook 请求失败（连接失败、超时、非 2xx 状态）
    #[error("delivery error: {0}")]
    Delivery(String),
}

impl AlertError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, AlertError::Configuration(_))
    }

    pub fn is_delivery(&self) -> bool {
        matches!(self, AlertError::Delivery(_))
    }
}

/// 模板渲染失败
///
/// 仅在回退替换阶段无法把上下文值转成文本时产生。
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot render value for key '{key}': {source}")]
    Value {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
