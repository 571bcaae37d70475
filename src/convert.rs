//! 图表示转换
//!
//! 邻接矩阵 / 邻接表 / 边列表与图模型之间的双向转换

use crate::error::{Error, Result};
use crate::graph::{grid_position, Graph, GraphIndex, Link, Node};
use crate::types::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 邻接矩阵：按 `nodes` 顺序编号，值为权重，无边为 0
pub type AdjacencyMatrix = Vec<Vec<f64>>;

/// 邻接表：节点 ID -> 邻居 ID（保持边的插入顺序）
pub type AdjacencyList = IndexMap<NodeId, Vec<NodeId>>;

/// 边列表：[源 ID, 目标 ID, 权重]
pub type EdgeList = Vec<(NodeId, NodeId, f64)>;

/// 邻接表输入项：单独的邻居 ID，或 [邻居 ID, 权重]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdjacencyEntry {
    Plain(NodeId),
    Weighted(NodeId, f64),
}

impl AdjacencyEntry {
    pub fn node(&self) -> &str {
        match self {
            AdjacencyEntry::Plain(id) | AdjacencyEntry::Weighted(id, _) => id,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            AdjacencyEntry::Plain(_) => 1.0,
            AdjacencyEntry::Weighted(_, w) => *w,
        }
    }
}

/// 图 -> 邻接矩阵
///
/// 多重边取第一条；无向图对称填充。
pub fn to_matrix(graph: &Graph) -> Result<AdjacencyMatrix> {
    let index = GraphIndex::build(graph)?;
    let n = index.node_count();
    let mut matrix = vec![vec![0.0; n]; n];

    for &i in index.link_indices() {
        let Some((u, v)) = index.endpoints(i) else {
            continue;
        };
        let weight = index.link(i).weight;
        if matrix[u][v] == 0.0 {
            matrix[u][v] = weight;
        }
        if !graph.is_directed && matrix[v][u] == 0.0 {
            matrix[v][u] = weight;
        }
    }

    Ok(matrix)
}

/// 图 -> 邻接表（所有节点都出现，孤立节点对应空列表）
pub fn to_adj_list(graph: &Graph) -> Result<AdjacencyList> {
    let index = GraphIndex::build(graph)?;
    let mut list = AdjacencyList::with_capacity(index.node_count());

    for slot in 0..index.node_count() {
        let neighbors = index
            .neighbors(slot)
            .iter()
            .map(|adj| index.id(adj.node).to_string())
            .collect();
        list.insert(index.id(slot).to_string(), neighbors);
    }

    Ok(list)
}

/// 图 -> 边列表（保持边的顺序，跳过悬空边）
pub fn to_edge_list(graph: &Graph) -> Result<EdgeList> {
    let index = GraphIndex::build(graph)?;
    Ok(index
        .link_indices()
        .iter()
        .map(|&i| {
            let link = index.link(i);
            (link.source.clone(), link.target.clone(), link.weight)
        })
        .collect())
}

/// 邻接矩阵 -> 图
///
/// 节点 ID 依次生成为 "1".."n"。无向图只读取上三角（含对角线）。
pub fn from_matrix(
    matrix: &[Vec<f64>],
    is_directed: bool,
    labels: Option<&[String]>,
) -> Result<Graph> {
    let n = matrix.len();
    if let Some(row) = matrix.iter().position(|row| row.len() != n) {
        return Err(Error::InvalidInput(format!(
            "邻接矩阵必须是方阵: 第 {} 行长度为 {}, 期望 {}",
            row + 1,
            matrix[row].len(),
            n
        )));
    }

    let ids: Vec<NodeId> = (1..=n).map(|i| i.to_string()).collect();
    let mut graph = Graph::new(is_directed);
    graph.nodes = build_nodes(&ids, labels)?;

    for (i, row) in matrix.iter().enumerate() {
        let start = if is_directed { 0 } else { i };
        for (j, &w) in row.iter().enumerate().skip(start) {
            if !w.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "邻接矩阵 [{}][{}] 的值无效: {}",
                    i, j, w
                )));
            }
            if w != 0.0 {
                graph.links.push(Link::new(ids[i].clone(), ids[j].clone(), w));
            }
        }
    }

    Ok(graph)
}

/// 邻接表 -> 图
///
/// 节点 ID 依次生成为 "1".."n"，键与邻居文本作为节点标签。
/// 给出 `labels` 时先按其顺序建节点，未在其中出现的文本再按首次出现顺序追加。
/// 无向图中 u: [v] 与 v: [u] 成对出现时合并为一条边（多重边按次数配对）。
pub fn from_adj_list(
    list: &IndexMap<NodeId, Vec<AdjacencyEntry>>,
    is_directed: bool,
    labels: Option<&[String]>,
) -> Result<Graph> {
    let mut names = seed_names(labels)?;
    for key in list.keys() {
        intern(&mut names, key);
    }
    for entries in list.values() {
        for entry in entries {
            intern(&mut names, entry.node());
        }
    }

    let mut graph = Graph::new(is_directed);
    graph.nodes = label_nodes(&names);

    // 无向图：等待反向条目来配对的次数
    let mut pending: HashMap<(&str, &str), usize> = HashMap::new();
    for (source, entries) in list {
        for entry in entries {
            let target = entry.node();
            if !is_directed {
                if let Some(count) = pending.get_mut(&(source.as_str(), target)) {
                    if *count > 0 {
                        *count -= 1;
                        continue;
                    }
                }
                *pending.entry((target, source.as_str())).or_insert(0) += 1;
            }
            graph.links.push(Link::new(
                names[source.as_str()].clone(),
                names[target].clone(),
                entry.weight(),
            ));
        }
    }

    Ok(graph)
}

/// 边列表 -> 图
///
/// 节点 ID 依次生成为 "1".."n"，端点文本作为节点标签。
/// 给出 `labels` 时先按其顺序建节点，孤立节点因此得以保留。
pub fn from_edge_list(
    edges: &[(NodeId, NodeId, f64)],
    is_directed: bool,
    labels: Option<&[String]>,
) -> Result<Graph> {
    let mut names = seed_names(labels)?;
    for (u, v, _) in edges {
        intern(&mut names, u);
        intern(&mut names, v);
    }

    let mut graph = Graph::new(is_directed);
    graph.nodes = label_nodes(&names);
    graph.links = edges
        .iter()
        .map(|(u, v, w)| {
            Link::new(
                names[u.as_str()].clone(),
                names[v.as_str()].clone(),
                *w,
            )
        })
        .collect();

    Ok(graph)
}

/// 标签 -> 生成的节点 ID，标签不可重复
fn seed_names(labels: Option<&[String]>) -> Result<IndexMap<String, NodeId>> {
    let mut names = IndexMap::new();
    for label in labels.unwrap_or_default() {
        if names.contains_key(label) {
            return Err(Error::InvalidInput(format!("标签重复: {}", label)));
        }
        intern(&mut names, label);
    }
    Ok(names)
}

fn intern(names: &mut IndexMap<String, NodeId>, name: &str) {
    if !names.contains_key(name) {
        let id = (names.len() + 1).to_string();
        names.insert(name.to_string(), id);
    }
}

fn label_nodes(names: &IndexMap<String, NodeId>) -> Vec<Node> {
    names
        .iter()
        .enumerate()
        .map(|(i, (label, id))| {
            let (x, y) = grid_position(i);
            Node::new(id.clone())
                .with_position(x, y)
                .with_label(label.clone())
        })
        .collect()
}

/// 生成节点并按网格摆放
fn build_nodes(ids: &[NodeId], labels: Option<&[String]>) -> Result<Vec<Node>> {
    if let Some(labels) = labels {
        if labels.len() != ids.len() {
            return Err(Error::InvalidInput(format!(
                "标签数量 {} 与节点数量 {} 不一致",
                labels.len(),
                ids.len()
            )));
        }
    }

    Ok(ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let (x, y) = grid_position(i);
            let node = Node::new(id.clone()).with_position(x, y);
            match labels {
                Some(labels) => node.with_label(labels[i].clone()),
                None => node,
            }
        })
        .collect())
}
