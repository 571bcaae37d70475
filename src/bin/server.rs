//! GraphBench 服务器入口
//!
//! 启动 HTTP API 服务器

use clap::Parser;
use graphbench::server::{start_server, ServerConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "graphbench-server")]
#[command(about = "GraphBench HTTP API 服务器")]
struct Args {
    /// 监听地址
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// 监听端口
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// /save 与 /load 使用的文件
    #[arg(short, long, default_value = "graph.json")]
    save_path: PathBuf,

    /// 悬空边直接拒绝（默认跳过并警告）
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("graphbench=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    println!("GraphBench - 图算法工作台");
    println!("=========================");
    println!("保存文件: {}", args.save_path.display());
    println!("严格模式: {}", args.strict);

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        save_path: args.save_path,
        strict_links: args.strict,
    };

    start_server(config).await?;

    Ok(())
}
