//! Render 命令 - 预览消息正文，不发送

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use super::input::{read_matches, resolve_rule_path};
use crate::clock::{Clock, FixedClock, LocalClock};
use crate::config::RuleConfig;
use crate::notification::{FeishuAlerter, HttpTransport};
use crate::observer::TracingObserver;

/// Render 命令参数
#[derive(Args)]
pub struct RenderArgs {
    /// 规则文件（JSON），默认 ~/.config/feishu-alert/rule.json
    #[arg(long, short)]
    pub rule: Option<PathBuf>,

    /// 命中记录文件（JSON 对象或数组），`-` 表示 stdin
    #[arg(long = "match", short)]
    pub matches: Option<PathBuf>,

    /// 固定渲染时间，格式 "YYYY-MM-DD HH:MM:SS"
    #[arg(long)]
    pub at: Option<String>,
}

/// 处理 render 命令
pub fn handle_render(args: RenderArgs) -> Result<()> {
    let path = resolve_rule_path(args.rule)?;
    let config = RuleConfig::load(&path)?;
    let matches = read_matches(args.matches.as_deref())?;

    let clock: Arc<dyn Clock> = match args.at {
        Some(at) => Arc::new(
            FixedClock::parse(&at).with_context(|| format!("Invalid --at value: {}", at))?,
        ),
        None => Arc::new(LocalClock),
    };

    let alerter = FeishuAlerter::with_parts(
        config,
        Arc::new(HttpTransport::new()),
        clock,
        Arc::new(TracingObserver::new()),
    );
    println!("{}", alerter.render_preview(&matches));
    Ok(())
}
