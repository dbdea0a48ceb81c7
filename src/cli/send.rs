//! Send 命令 - 充当宿主，把命中记录交给告警器

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use super::input::{read_matches, read_rule, resolve_rule_path};
use crate::notification::{AlertOutcome, FeishuAlerter};

/// Send 命令参数
#[derive(Args)]
pub struct SendArgs {
    /// 规则文件（JSON），默认 ~/.config/feishu-alert/rule.json
    #[arg(long, short)]
    pub rule: Option<PathBuf>,

    /// 命中记录文件（JSON 对象或数组），`-` 表示 stdin
    #[arg(long = "match", short)]
    pub matches: Option<PathBuf>,

    /// 只生成消息，不发送
    #[arg(long)]
    pub dry_run: bool,
}

/// 处理 send 命令
pub fn handle_send(args: SendArgs) -> Result<()> {
    let path = resolve_rule_path(args.rule)?;
    let alerter = FeishuAlerter::new(read_rule(&path)?)?.with_dry_run(args.dry_run);
    let matches = read_matches(args.matches.as_deref())?;

    info!(rule = %path.display(), matches = matches.len(), "Dispatching alert");

    match alerter.dispatch(&matches)? {
        AlertOutcome::Sent => println!("sent"),
        AlertOutcome::Skipped(reason) => println!("skipped: {}", reason),
        AlertOutcome::DryRun(message) => {
            println!("{}", serde_json::to_string_pretty(&message)?)
        }
    }
    Ok(())
}
