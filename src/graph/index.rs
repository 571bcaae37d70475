//! 图索引
//!
//! 每次算法调用构建一次：节点 ID 与稠密下标互相映射，
//! 邻接表按边的插入顺序排列，保证遍历顺序稳定可复现。

use super::graph::Graph;
use super::link::Link;
use super::node::Node;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// 邻接项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacent {
    /// 邻居节点下标
    pub node: usize,
    /// 原图中边的下标
    pub link: usize,
}

/// 稠密下标索引
pub struct GraphIndex<'g> {
    graph: &'g Graph,
    /// 节点 ID -> 下标
    slots: HashMap<&'g str, usize>,
    /// 有效边（端点都存在）在原图中的下标，保持原顺序
    links: Vec<usize>,
    /// 每条有效边的端点下标，与原图边下标对齐
    endpoints: Vec<Option<(usize, usize)>>,
    /// 出邻接（无向图中双向）
    outgoing: Vec<Vec<Adjacent>>,
    /// 入邻接（无向图中与出邻接相同）
    incoming: Vec<Vec<Adjacent>>,
    /// 被跳过的悬空边数
    skipped: usize,
}

impl<'g> GraphIndex<'g> {
    /// 构建索引
    ///
    /// 重复节点 ID 直接拒绝；悬空边跳过并记录警告。
    pub fn build(graph: &'g Graph) -> Result<Self> {
        graph.validate(false)?;

        let n = graph.nodes.len();
        let slots: HashMap<&str, usize> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.as_str(), i))
            .collect();

        let mut links = Vec::with_capacity(graph.links.len());
        let mut endpoints = vec![None; graph.links.len()];
        let mut outgoing = vec![Vec::new(); n];
        let mut incoming = vec![Vec::new(); n];
        let mut skipped = 0;

        for (i, link) in graph.links.iter().enumerate() {
            let (u, v) = match (
                slots.get(link.source.as_str()),
                slots.get(link.target.as_str()),
            ) {
                (Some(&u), Some(&v)) => (u, v),
                _ => {
                    skipped += 1;
                    tracing::warn!(
                        source = %link.source,
                        target = %link.target,
                        "跳过引用不存在节点的边"
                    );
                    continue;
                }
            };

            links.push(i);
            endpoints[i] = Some((u, v));
            outgoing[u].push(Adjacent { node: v, link: i });
            incoming[v].push(Adjacent { node: u, link: i });
            if !graph.is_directed {
                outgoing[v].push(Adjacent { node: u, link: i });
                incoming[u].push(Adjacent { node: v, link: i });
            }
        }

        Ok(Self {
            graph,
            slots,
            links,
            endpoints,
            outgoing,
            incoming,
            skipped,
        })
    }

    /// 严格模式构建：悬空边视为输入错误
    pub fn build_strict(graph: &'g Graph) -> Result<Self> {
        graph.validate(true)?;
        Self::build(graph)
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn is_directed(&self) -> bool {
        self.graph.is_directed
    }

    pub fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    /// 有效边数量
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn skipped_links(&self) -> usize {
        self.skipped
    }

    /// 节点 ID -> 下标
    pub fn slot(&self, id: &str) -> Option<usize> {
        self.slots.get(id).copied()
    }

    /// 节点 ID -> 下标，不存在时返回 InvalidStart
    pub fn require_start(&self, id: &str) -> Result<usize> {
        self.slot(id)
            .ok_or_else(|| Error::InvalidStart(id.to_string()))
    }

    pub fn node(&self, slot: usize) -> &'g Node {
        &self.graph.nodes[slot]
    }

    pub fn id(&self, slot: usize) -> &'g str {
        &self.graph.nodes[slot].id
    }

    /// 下标 -> 显示名称
    pub fn label(&self, slot: usize) -> &'g str {
        self.graph.nodes[slot].display_name()
    }

    /// 下标序列 -> ID 序列
    pub fn ids(&self, slots: &[usize]) -> Vec<String> {
        slots.iter().map(|&s| self.id(s).to_string()).collect()
    }

    /// 出邻接（按插入顺序）
    pub fn neighbors(&self, slot: usize) -> &[Adjacent] {
        &self.outgoing[slot]
    }

    /// 入邻接
    pub fn predecessors(&self, slot: usize) -> &[Adjacent] {
        &self.incoming[slot]
    }

    /// 忽略方向的邻接（有向图合并出入邻接）
    pub fn undirected_neighbors(&self, slot: usize) -> impl Iterator<Item = &Adjacent> + '_ {
        let incoming: &[Adjacent] = if self.graph.is_directed {
            &self.incoming[slot]
        } else {
            &[]
        };
        self.outgoing[slot].iter().chain(incoming.iter())
    }

    pub fn out_degree(&self, slot: usize) -> usize {
        self.outgoing[slot].len()
    }

    pub fn in_degree(&self, slot: usize) -> usize {
        self.incoming[slot].len()
    }

    /// 有效边在原图中的下标（原顺序）
    pub fn link_indices(&self) -> &[usize] {
        &self.links
    }

    pub fn link(&self, link: usize) -> &'g Link {
        &self.graph.links[link]
    }

    /// 边的端点下标；悬空边返回 None
    pub fn endpoints(&self, link: usize) -> Option<(usize, usize)> {
        self.endpoints.get(link).copied().flatten()
    }

    /// 沿某条边从 `from` 出发到达的另一端
    pub fn other_end(&self, link: usize, from: usize) -> usize {
        match self.endpoints(link) {
            Some((u, v)) if u == from => v,
            Some((u, _)) => u,
            None => from,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_undirected() {
        let graph = Graph::undirected()
            .with_nodes(["A", "B", "C"])
            .with_link("A", "B", 1.0)
            .with_link("C", "A", 2.0);
        let index = GraphIndex::build(&graph).unwrap();

        let a = index.slot("A").unwrap();
        let ns: Vec<&str> = index.neighbors(a).iter().map(|adj| index.id(adj.node)).collect();
        assert_eq!(ns, vec!["B", "C"]);
        assert_eq!(index.out_degree(index.slot("C").unwrap()), 1);
        assert_eq!(index.other_end(1, index.slot("C").unwrap()), a);
    }

    #[test]
    fn test_index_directed_in_out() {
        let graph = Graph::directed()
            .with_nodes(["A", "B"])
            .with_link("A", "B", 1.0);
        let index = GraphIndex::build(&graph).unwrap();
        let b = index.slot("B").unwrap();
        assert_eq!(index.out_degree(b), 0);
        assert_eq!(index.in_degree(b), 1);
    }

    #[test]
    fn test_dangling_links_skipped() {
        let graph = Graph::undirected()
            .with_nodes(["A", "B"])
            .with_link("A", "B", 1.0)
            .with_link("A", "ghost", 1.0);
        let index = GraphIndex::build(&graph).unwrap();
        assert_eq!(index.link_count(), 1);
        assert_eq!(index.skipped_links(), 1);
        assert!(index.endpoints(1).is_none());

        assert!(GraphIndex::build_strict(&graph).is_err());
    }

    #[test]
    fn test_require_start() {
        let graph = Graph::undirected().with_nodes(["A"]);
        let index = GraphIndex::build(&graph).unwrap();
        let err = index.require_start("Z").unwrap_err();
        assert_eq!(err.kind(), "InvalidStart");
    }
}
