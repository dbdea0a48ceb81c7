//! 时间源

use chrono::{Local, NaiveDateTime};

/// 时刻格式，用于静默时段比较
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";
/// 发送时间格式
pub const ALERT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 当前本地时间
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// 系统本地时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// 固定时钟（预览和测试用）
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// 解析 `YYYY-MM-DD HH:MM:SS`
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, ALERT_TIME_FORMAT).map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
