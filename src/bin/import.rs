//! GraphBench 数据导入工具
//!
//! 把 CSV 边列表、邻接矩阵或邻接表转换为图 JSON

use anyhow::{bail, Context};
use clap::Parser;
use graphbench::convert;
use graphbench::import::{self, BatchImporter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "graphbench-import")]
#[command(about = "GraphBench 数据导入工具")]
struct Args {
    /// 输入文件路径
    #[arg(short, long)]
    input: PathBuf,

    /// 输出的图 JSON
    #[arg(short, long, default_value = "graph.json")]
    output: PathBuf,

    /// 输入格式: csv, matrix, adj
    #[arg(short, long, default_value = "csv")]
    format: String,

    /// 生成有向图
    #[arg(short, long)]
    directed: bool,

    /// 批次大小（仅 csv）
    #[arg(short, long, default_value = "10000")]
    batch_size: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("graphbench=info")),
        )
        .init();

    let args = Args::parse();

    println!("GraphBench 数据导入工具");
    println!("========================");
    println!("输入文件: {:?}", args.input);
    println!("输出文件: {:?}", args.output);
    println!("格式: {}", args.format);
    println!("有向: {}", args.directed);

    let graph = match args.format.as_str() {
        "csv" => {
            let (graph, stats) = BatchImporter::new(args.directed)
                .with_batch_size(args.batch_size)
                .import_edges_csv(&args.input)
                .with_context(|| format!("无法导入 {:?}", args.input))?;
            println!("\n导入完成!");
            println!("  节点数: {}", stats.nodes_imported);
            println!("  边数: {}", stats.links_imported);
            println!("  错误数: {}", stats.errors);
            println!("  耗时: {} ms", stats.duration_ms);
            graph
        }
        "matrix" => {
            let matrix = import::load_matrix(&args.input)?;
            convert::from_matrix(&matrix, args.directed, None)?
        }
        "adj" | "adj_list" => {
            let list = import::load_adj_list(&args.input)?;
            convert::from_adj_list(&list, args.directed, None)?
        }
        other => bail!("不支持的格式: {}", other),
    };

    import::save_graph(&graph, &args.output)?;
    println!(
        "\n已写入 {:?} ({} 个节点, {} 条边)",
        args.output,
        graph.node_count(),
        graph.link_count()
    );

    Ok(())
}
