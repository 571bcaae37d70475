//! 数据导入模块
//!
//! 支持从 CSV 边列表批量导入图，以及图 JSON 的读写（同步与 tokio 异步）

use crate::convert::{AdjacencyEntry, AdjacencyMatrix};
use crate::error::{Error, Result};
use crate::graph::{grid_position, Graph, Link, Node};
use crate::types::NodeId;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

/// 导入统计
#[derive(Debug, Default, Clone)]
pub struct ImportStats {
    pub nodes_imported: usize,
    pub links_imported: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

/// CSV 边记录：`source,target,weight[,capacity]`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EdgeRecord {
    source: String,
    target: String,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    capacity: Option<f64>,
}

impl EdgeRecord {
    fn into_link(self) -> Result<Link> {
        if self.source.is_empty() || self.target.is_empty() {
            return Err(Error::Import("端点不能为空".to_string()));
        }
        let weight = self.weight.unwrap_or(1.0);
        if !weight.is_finite() {
            return Err(Error::Import(format!("权重无效: {}", weight)));
        }
        let link = Link::new(self.source, self.target, weight);
        Ok(match self.capacity {
            Some(c) if !c.is_finite() || c < 0.0 => {
                return Err(Error::Import(format!("容量无效: {}", c)))
            }
            Some(c) => link.with_capacity(c),
            None => link,
        })
    }
}

/// 批量导入器
pub struct BatchImporter {
    is_directed: bool,
    batch_size: usize,
}

impl BatchImporter {
    /// 创建导入器
    pub fn new(is_directed: bool) -> Self {
        Self {
            is_directed,
            batch_size: 10000,
        }
    }

    /// 设置批次大小
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// 从 CSV 文件导入边列表
    pub fn import_edges_csv<P: AsRef<Path>>(&self, path: P) -> Result<(Graph, ImportStats)> {
        let file = File::open(path)?;
        self.import_edges_reader(BufReader::new(file))
    }

    /// 从任意读取器导入边列表（首行为表头）
    ///
    /// 每批记录并行解析，解析失败的行计入 `errors` 并跳过。
    /// 节点按端点首次出现的顺序创建。
    pub fn import_edges_reader<R: Read>(&self, reader: R) -> Result<(Graph, ImportStats)> {
        let start = std::time::Instant::now();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();

        let mut stats = ImportStats::default();
        let mut ids: IndexMap<NodeId, ()> = IndexMap::new();
        let mut links: Vec<Link> = Vec::new();
        let mut batch: Vec<csv::StringRecord> = Vec::with_capacity(self.batch_size);
        let mut records = rdr.records();

        loop {
            batch.clear();
            for record in records.by_ref().take(self.batch_size) {
                match record {
                    Ok(record) => batch.push(record),
                    Err(e) => {
                        stats.errors += 1;
                        tracing::warn!("CSV 读取失败: {}", e);
                    }
                }
            }
            if batch.is_empty() {
                break;
            }

            // 并行处理，结果保持原顺序
            let parsed: Vec<Result<Link>> = batch
                .par_iter()
                .map(|record| {
                    record
                        .deserialize::<EdgeRecord>(Some(&headers))
                        .map_err(Error::from)
                        .and_then(EdgeRecord::into_link)
                })
                .collect();

            for outcome in parsed {
                match outcome {
                    Ok(link) => {
                        ids.entry(link.source.clone()).or_insert(());
                        ids.entry(link.target.clone()).or_insert(());
                        links.push(link);
                    }
                    Err(e) => {
                        stats.errors += 1;
                        tracing::warn!("跳过无效的边记录: {}", e);
                    }
                }
            }
        }

        let mut graph = Graph::new(self.is_directed);
        graph.nodes = ids
            .into_keys()
            .enumerate()
            .map(|(i, id)| {
                let (x, y) = grid_position(i);
                Node::new(id).with_position(x, y)
            })
            .collect();
        graph.links = links;

        stats.nodes_imported = graph.node_count();
        stats.links_imported = graph.link_count();
        stats.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            nodes = stats.nodes_imported,
            links = stats.links_imported,
            errors = stats.errors,
            "CSV 导入完成"
        );
        Ok((graph, stats))
    }
}

/// 从 JSON 文件读取图
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<Graph> {
    let file = File::open(path)?;
    let graph: Graph = serde_json::from_reader(BufReader::new(file))?;
    graph.validate(false)?;
    Ok(graph)
}

/// 把图写入 JSON 文件
pub fn save_graph<P: AsRef<Path>>(graph: &Graph, path: P) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), graph)?;
    Ok(())
}

/// 异步读取图（服务端使用）
pub async fn load_graph_async<P: AsRef<Path>>(path: P) -> Result<Graph> {
    let path = path.as_ref();
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound(format!("没有已保存的图: {}", path.display())))
        }
        Err(e) => return Err(e.into()),
    };
    let graph: Graph = serde_json::from_slice(&bytes)?;
    graph.validate(false)?;
    Ok(graph)
}

/// 异步保存图
pub async fn save_graph_async<P: AsRef<Path>>(graph: &Graph, path: P) -> Result<()> {
    let json = serde_json::to_vec_pretty(graph)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// 读取邻接矩阵 JSON（二维数组）
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<AdjacencyMatrix> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// 读取邻接表 JSON（对象：节点 -> 邻居数组）
pub fn load_adj_list<P: AsRef<Path>>(path: P) -> Result<IndexMap<NodeId, Vec<AdjacencyEntry>>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// 从 CSV 边列表导入
pub fn import_edges_csv<P: AsRef<Path>>(path: P, is_directed: bool) -> Result<(Graph, ImportStats)> {
    BatchImporter::new(is_directed).import_edges_csv(path)
}
