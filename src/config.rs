//! 规则配置 - 构造时一次性校验
//!
//! 规则是一个 JSON 对象。插件相关的键带 `feishualert_` 前缀（与宿主规则文件一致），
//! 同时接受不带前缀的别名：
//!
//! ```json
//! {
//!   "name": "nginx-5xx",
//!   "feishualert_botid": "xxxxxxxx-xxxx",
//!   "feishualert_title": "Nginx 5xx",
//!   "feishualert_body": "Host: {host.name} Status: {status}",
//!   "feishualert_skip": { "start": "22:00:00", "end": "23:00:00" }
//! }
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use regex::Regex;
use tracing::warn;

use crate::error::AlertError;

/// 飞书机器人 Webhook 默认前缀
pub const DEFAULT_WEBHOOK_URL: &str = "https://open.feishu.cn/open-apis/bot/v2/hook/";

pub const KEY_BOT_ID: &str = "feishualert_botid";
pub const KEY_TITLE: &str = "feishualert_title";
pub const KEY_BODY: &str = "feishualert_body";
pub const KEY_URL: &str = "feishualert_url";
pub const KEY_SKIP: &str = "feishualert_skip";

/// 宿主加载规则时要求必须存在的键
pub const REQUIRED_OPTIONS: [&str; 3] = [KEY_BOT_ID, KEY_TITLE, KEY_BODY];

const INVALID_REQUIRED: &str = "Configure botid|title|body is invalid";

/// 静默时段
///
/// 比较是纯字符串字典序：`start <= now <= end`。跨午夜的时段
/// （如 `22:00:00`-`06:00:00`）因为 `start > end` 永远不会命中。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipWindow {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl SkipWindow {
    /// `now` 为 `HH:MM:SS` 格式的当前时刻
    pub fn contains(&self, now: &str) -> bool {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => start.as_str() <= now && now <= end.as_str(),
            _ => false,
        }
    }

    /// 两端都配置了才会生效
    pub fn is_active(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// 跨午夜（start > end），按字典序永远不会命中
    pub fn crosses_midnight(&self) -> bool {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => start > end,
            _ => false,
        }
    }

    fn from_value(value: &Value) -> Result<Self, AlertError> {
        let obj = value.as_object().ok_or_else(|| {
            AlertError::Configuration(format!("{} must be a mapping", KEY_SKIP))
        })?;

        let bound = |name: &str| -> Result<Option<String>, AlertError> {
            match obj.get(name) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(AlertError::Configuration(format!(
                    "{}.{} must be a HH:MM:SS string, got {}",
                    KEY_SKIP, name, other
                ))),
            }
        };

        Ok(Self {
            start: bound("start")?,
            end: bound("end")?,
        })
    }
}

/// 校验后的规则配置
#[derive(Debug, Clone)]
pub struct RuleConfig {
    /// 机器人 ID（Webhook 路径最后一段）
    pub bot_id: String,
    /// 标题模板
    pub title: String,
    /// 消息正文模板
    pub body: String,
    /// Webhook 前缀
    pub url: String,
    /// 静默时段
    pub skip: SkipWindow,
    /// 原始规则，合并进模板上下文，也供 `rule()` 返回
    raw: Map<String, Value>,
}

impl RuleConfig {
    /// 从任意 JSON 值构造，必须是对象
    pub fn from_value(value: Value) -> Result<Self, AlertError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(AlertError::Configuration(format!(
                "rule must be a mapping, got {}",
                type_name(&other)
            ))),
        }
    }

    pub fn from_map(raw: Map<String, Value>) -> Result<Self, AlertError> {
        let bot_id = optional_string(&raw, KEY_BOT_ID, "botid")?.unwrap_or_default();
        let title = optional_string(&raw, KEY_TITLE, "title")?.unwrap_or_default();
        let body = optional_string(&raw, KEY_BODY, "body")?.unwrap_or_default();

        if bot_id.is_empty() || title.is_empty() || body.is_empty() {
            return Err(AlertError::Configuration(INVALID_REQUIRED.to_string()));
        }

        let url = optional_string(&raw, KEY_URL, "url")?
            .unwrap_or_else(|| DEFAULT_WEBHOOK_URL.to_string());

        let skip = match lookup(&raw, KEY_SKIP, "skip") {
            None | Some(Value::Null) => SkipWindow::default(),
            Some(value) => SkipWindow::from_value(value)?,
        };

        for bound in [&skip.start, &skip.end].into_iter().flatten() {
            if !is_hms(bound) {
                warn!(bound = %bound, "Skip window bound is not HH:MM:SS, comparison is lexicographic");
            }
        }
        if skip.crosses_midnight() {
            warn!(
                start = ?skip.start,
                end = ?skip.end,
                "Skip window crosses midnight and will never match"
            );
        }

        Ok(Self {
            bot_id,
            title,
            body,
            url,
            skip,
            raw,
        })
    }

    /// 从 JSON 规则文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule file {}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse rule file {}", path.display()))?;
        Ok(Self::from_value(value)?)
    }

    /// 完整的 Webhook 地址
    pub fn webhook_url(&self) -> String {
        format!("{}{}", self.url, self.bot_id)
    }

    /// 原始规则
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}

/// 默认规则文件：`~/.config/feishu-alert/rule.json`
pub fn default_rule_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
    Ok(home.join(".config/feishu-alert/rule.json"))
}

/// 先找带前缀的键，再找别名
fn lookup<'a>(raw: &'a Map<String, Value>, key: &str, alias: &str) -> Option<&'a Value> {
    raw.get(key).or_else(|| raw.get(alias))
}

fn optional_string(
    raw: &Map<String, Value>,
    key: &str,
    alias: &str,
) -> Result<Option<String>, AlertError> {
    match lookup(raw, key, alias) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(AlertError::Configuration(format!(
            "{} must be a string, got {}",
            key,
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

fn is_hms(s: &str) -> bool {
    static HMS: OnceLock<Regex> = OnceLock::new();
    HMS.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d:[0-5]\d$").unwrap())
        .is_match(s)
}
