//! 飞书告警器
//!
//! 规则命中时由宿主调用：静默时段检查 -> 合并上下文 -> 渲染正文 -> POST 到机器人 Webhook。
//! 除投递失败外，所有格式问题都降级处理，保证至少尝试发出一条消息。

use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

use super::channel::{AlertInfo, AlertOutcome, Alerter};
use super::webhook::{FeishuMessage, HttpTransport, WebhookTransport, DEFAULT_TIMEOUT_SECS};
use crate::clock::{Clock, LocalClock, ALERT_TIME_FORMAT, TIME_OF_DAY_FORMAT};
use crate::config::RuleConfig;
use crate::error::AlertError;
use crate::flatten::{apply_defaults, flatten};
use crate::observer::{AlertObserver, TracingObserver};
use crate::template;

/// 插件类型名
pub const ALERTER_TYPE: &str = "FeishuAlert";

/// 合成的标题键
pub const CONTEXT_TITLE_KEY: &str = "feishualert_title";
/// 合成的发送时间键
pub const CONTEXT_TIME_KEY: &str = "feishualert_time";

/// 飞书告警器
pub struct FeishuAlerter {
    config: RuleConfig,
    transport: Arc<dyn WebhookTransport>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn AlertObserver>,
    timeout: Duration,
    dry_run: bool,
}

impl FeishuAlerter {
    /// 从规则 JSON 构造，配置无效时直接失败
    pub fn new(rule: Value) -> Result<Self, AlertError> {
        let config = RuleConfig::from_value(rule)?;
        let observer = match config.raw().get("name").and_then(|n| n.as_str()) {
            Some(name) => TracingObserver::for_rule(name),
            None => TracingObserver::new(),
        };
        Ok(Self::with_parts(
            config,
            Arc::new(HttpTransport::new()),
            Arc::new(LocalClock),
            Arc::new(observer),
        ))
    }

    /// 显式注入传输层、时钟和日志观察者
    pub fn with_parts(
        config: RuleConfig,
        transport: Arc<dyn WebhookTransport>,
        clock: Arc<dyn Clock>,
        observer: Arc<dyn AlertObserver>,
    ) -> Self {
        Self {
            config,
            transport,
            clock,
            observer,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            dry_run: false,
        }
    }

    /// 设置 dry-run 模式：生成消息但不发送
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 原始规则配置
    pub fn rule(&self) -> &Map<String, Value> {
        self.config.raw()
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// 处理命中记录
    pub fn dispatch(&self, matches: &[Value]) -> Result<AlertOutcome, AlertError> {
        let now = self.clock.now();
        let time_of_day = now.format(TIME_OF_DAY_FORMAT).to_string();
        if self.config.skip.contains(&time_of_day) {
            self.observer.info("Skip match in silence time...");
            return Ok(AlertOutcome::Skipped(format!(
                "{} is within silence window",
                time_of_day
            )));
        }

        let alert_time = now.format(ALERT_TIME_FORMAT).to_string();
        let message = self.build_message(matches, &alert_time);

        if self.dry_run {
            self.observer.info(&format!(
                "[DRY-RUN] Would send to {}: {}",
                self.config.webhook_url(),
                message.content.text
            ));
            return Ok(AlertOutcome::DryRun(message));
        }

        self.transport
            .post(&self.config.webhook_url(), &message, self.timeout)
            .map_err(|e| AlertError::Delivery(format!("Feishu request failed: {}", e)))?;

        self.observer
            .info(&format!("Alert sent to Feishu bot {}", self.config.bot_id));
        Ok(AlertOutcome::Sent)
    }

    /// 只渲染不发送，不做静默时段检查
    pub fn render_preview(&self, matches: &[Value]) -> String {
        let alert_time = self.clock.now().format(ALERT_TIME_FORMAT).to_string();
        self.build_message(matches, &alert_time).content.text
    }

    /// 模板上下文：合成字段 < 规则配置 < 展平后的第一条命中记录
    pub fn merge_context(&self, matches: &[Value], alert_time: &str) -> Map<String, Value> {
        let mut context = Map::new();
        context.insert(
            CONTEXT_TITLE_KEY.to_string(),
            Value::String(self.config.title.clone()),
        );
        context.insert(
            CONTEXT_TIME_KEY.to_string(),
            Value::String(alert_time.to_string()),
        );
        for (key, value) in self.config.raw() {
            context.insert(key.clone(), value.clone());
        }

        match matches.first() {
            Some(Value::Object(first)) => {
                let mut flat = flatten(first);
                apply_defaults(&mut flat, alert_time);
                context.extend(flat);
            }
            Some(other) => {
                self.observer
                    .warn(&format!("Ignoring non-mapping match record: {}", other));
            }
            None => {}
        }

        context
    }

    fn build_message(&self, matches: &[Value], alert_time: &str) -> FeishuMessage {
        let context = self.merge_context(matches, alert_time);
        let body = &self.config.body;

        let text = match template::render(body, &context) {
            Ok(rendered) => {
                for warning in &rendered.warnings {
                    self.observer.warn(&warning.to_string());
                }
                rendered.text
            }
            Err(e) => {
                self.observer
                    .error(&format!("Failed to format alert: {}", e));
                format!("?? Format error: {}\nRaw message:\n{}", e, body)
            }
        };

        FeishuMessage::text(text)
    }
}

impl Alerter for FeishuAlerter {
    fn name(&self) -> &str {
        "feishu"
    }

    fn alert(&self, matches: &[Value]) -> Result<(), AlertError> {
        self.dispatch(matches).map(|_| ())
    }

    fn info(&self) -> AlertInfo {
        AlertInfo::new(ALERTER_TYPE)
    }
}

impl std::fmt::Debug for FeishuAlerter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeishuAlerter")
            .field("config", &self.config)
            .field("timeout", &self.timeout)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}
