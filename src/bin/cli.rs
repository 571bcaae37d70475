//! GraphBench CLI 工具
//!
//! 交互式工作台：加载图、执行算法、逐步回放

use clap::Parser;
use colored::Colorize;
use graphbench::cli::{execute_command, CommandResult, Workbench, WorkbenchCompleter};
use graphbench::engine::{Engine, EngineConfig};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "graphbench-cli")]
#[command(about = "GraphBench 命令行工作台")]
struct Args {
    /// 启动时加载的图 JSON
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// 执行单条命令后退出
    #[arg(short = 'e', long)]
    execute: Option<String>,

    /// 悬空边直接拒绝
    #[arg(long)]
    strict: bool,
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".graphbench_history"))
}

/// 打印命令结果，返回是否退出
fn report(result: CommandResult) -> bool {
    match result {
        CommandResult::Continue => false,
        CommandResult::Exit => true,
        CommandResult::Message(msg) => {
            println!("{}", msg);
            false
        }
        CommandResult::Error(err) => {
            println!("{}", format!("错误: {}", err).red());
            false
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("graphbench=warn")),
        )
        .init();

    let args = Args::parse();
    let mut bench = Workbench::new(Engine::new(EngineConfig {
        strict_links: args.strict,
    }));

    if let Some(file) = &args.file {
        report(execute_command(
            &format!("load {}", file.display()),
            &mut bench,
        ));
    }

    // 单条命令模式
    if let Some(command) = args.execute {
        report(execute_command(&command, &mut bench));
        return Ok(());
    }

    println!("{}", "GraphBench CLI - 图算法工作台".green().bold());
    println!("输入 'help' 查看命令列表，'quit' 退出\n");

    let mut rl: Editor<WorkbenchCompleter, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(WorkbenchCompleter::new()));
    let history = history_path();
    if let Some(path) = &history {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline("graphbench> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;
                if report(execute_command(line, &mut bench)) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("{}", format!("读取输入失败: {:?}", err).red());
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = rl.save_history(path);
    }
    println!("再见！");
    Ok(())
}
