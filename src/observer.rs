//! 日志观察者
//!
//! 告警器不直接调用 `tracing` 宏，而是通过 `AlertObserver` 上报，
//! 测试里可以换成 `RecordingObserver` 检查输出了什么。

use std::sync::Mutex;
use tracing::{error, info, warn};

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

pub trait AlertObserver: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// 转发到 `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    rule: Option<String>,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 日志中附带规则名
    pub fn for_rule(rule: impl Into<String>) -> Self {
        Self {
            rule: Some(rule.into()),
        }
    }
}

impl AlertObserver for TracingObserver {
    fn info(&self, message: &str) {
        info!(alerter = "feishu", rule = ?self.rule, "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(alerter = "feishu", rule = ?self.rule, "{}", message);
    }

    fn error(&self, message: &str) {
        error!(alerter = "feishu", rule = ?self.rule, "{}", message);
    }
}

/// 记录所有日志，测试用
#[derive(Debug, Default)]
pub struct RecordingObserver {
    records: Mutex<Vec<(Level, String)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// 指定级别的消息
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((level, message.to_string()));
        }
    }
}

impl AlertObserver for RecordingObserver {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer_filters_by_level() {
        let observer = RecordingObserver::new();
        observer.info("skipped");
        observer.warn("missing key");
        observer.error("format failed");
        observer.warn("second");

        assert_eq!(observer.records().len(), 4);
        assert_eq!(observer.messages(Level::Warn), vec!["missing key", "second"]);
        assert_eq!(observer.messages(Level::Error), vec!["format failed"]);
    }
}
