//! Check 命令 - 校验规则配置

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::input::{read_rule, resolve_rule_path};
use super::output::format_output;
use crate::config::SkipWindow;
use crate::notification::{Alerter, FeishuAlerter};

/// Check 命令参数
#[derive(Args)]
pub struct CheckArgs {
    /// 规则文件（JSON），默认 ~/.config/feishu-alert/rule.json
    #[arg(long, short)]
    pub rule: Option<PathBuf>,
}

/// Check 命令输出
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    #[serde(rename = "type")]
    pub kind: String,
    pub webhook_url: String,
    pub skip: SkipWindow,
}

/// 处理 check 命令
pub fn handle_check(args: CheckArgs) -> Result<()> {
    let path = resolve_rule_path(args.rule)?;
    let alerter = FeishuAlerter::new(read_rule(&path)?)?;

    let output = CheckOutput {
        kind: alerter.info().kind,
        webhook_url: alerter.config().webhook_url(),
        skip: alerter.config().skip.clone(),
    };
    println!("{}", format_output(&output));
    Ok(())
}
