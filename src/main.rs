//! Feishu Alert CLI
//!
//! 读取规则和命中记录，渲染并发送飞书机器人告警

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use feishu_alert::cli::{handle_check, handle_render, handle_send, CheckArgs, RenderArgs, SendArgs};

#[derive(Parser)]
#[command(name = "feishu-alert")]
#[command(about = "Feishu Alert - 把日志告警规则命中推送到飞书机器人")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 校验规则配置
    Check(CheckArgs),
    /// 预览渲染后的消息正文（不发送）
    Render(RenderArgs),
    /// 渲染并发送告警
    Send(SendArgs),
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feishu_alert=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => handle_check(args),
        Commands::Render(args) => handle_render(args),
        Commands::Send(args) => handle_send(args),
    }
}
