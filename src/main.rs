//! Discord Alert CLI
//!
//! 将结构化通知事件转发到 Discord webhook

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use discord_alert::{
    cli::{handle_preview, handle_send, handle_serve, PreviewArgs, SendArgs, ServeArgs},
    RelayConfig,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "dalert")]
#[command(about = "Discord Alert - 将通知事件转发到 Discord webhook")]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 ~/.config/discord-alert/config.json）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动 HTTP 服务 (POST /webhook, GET /health)
    Serve(ServeArgs),
    /// 发送一条通知并输出投递结果
    Send(SendArgs),
    /// 打印渲染后的 payload，不发送
    Preview(PreviewArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("discord_alert=info,dalert=info,tower_http=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = RelayConfig::load(cli.config.as_deref())?;
            handle_serve(args, config).await
        }
        Commands::Send(args) => {
            let config = RelayConfig::load(cli.config.as_deref())?;
            handle_send(args, &config).await
        }
        Commands::Preview(args) => handle_preview(args),
    }
}
