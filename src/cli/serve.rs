// src/cli/serve.rs
//! Serve 命令 - 启动 HTTP 服务

use anyhow::Result;
use clap::Args;

use crate::config::RelayConfig;
use crate::server;

/// Serve 命令参数
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// 监听地址，覆盖配置文件和环境变量
    #[arg(long, short)]
    pub bind: Option<String>,
}

/// 处理 serve 命令
pub async fn handle_serve(args: ServeArgs, mut config: RelayConfig) -> Result<()> {
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    server::serve(&config).await
}
