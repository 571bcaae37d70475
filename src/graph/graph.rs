//! 图数据结构
//!
//! 引擎消费的图快照：节点、边与是否有向

use super::link::Link;
use super::node::Node;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 图快照
///
/// 由外部编辑器创建和修改，按值传入算法调用，引擎不保留引用。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// 节点列表（ID 唯一）
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// 边列表
    #[serde(default)]
    pub links: Vec<Link>,
    /// 是否有向
    #[serde(rename = "isDirected", alias = "is_directed", default)]
    pub is_directed: bool,
}

impl Graph {
    /// 创建空图
    pub fn new(is_directed: bool) -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            is_directed,
        }
    }

    /// 无向图
    pub fn undirected() -> Self {
        Self::new(false)
    }

    /// 有向图
    pub fn directed() -> Self {
        Self::new(true)
    }

    /// 添加节点（链式调用）
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// 按 ID 批量添加节点
    pub fn with_nodes<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.extend(ids.into_iter().map(Node::new));
        self
    }

    /// 添加带权边
    pub fn with_link(mut self, source: &str, target: &str, weight: f64) -> Self {
        self.links.push(Link::new(source, target, weight));
        self
    }

    /// 添加带容量的边
    pub fn with_capacity_link(mut self, source: &str, target: &str, capacity: f64) -> Self {
        self.links
            .push(Link::new(source, target, 1.0).with_capacity(capacity));
        self
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// 获取节点
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// 节点显示名称，节点不存在时返回 ID 本身
    pub fn label_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.node(id).map(|n| n.display_name()).unwrap_or(id)
    }

    /// 查找两点之间的边（多重边时取第一条）
    pub fn find_link(&self, source: &str, target: &str) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| l.connects(source, target, self.is_directed))
    }

    /// 引用了不存在节点的边
    pub fn dangling_links(&self) -> Vec<&Link> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.links
            .iter()
            .filter(|l| !ids.contains(l.source.as_str()) || !ids.contains(l.target.as_str()))
            .collect()
    }

    /// 校验图结构
    ///
    /// 重复 ID、空 ID 与非有限的权重/容量总是拒绝；
    /// `strict` 时悬空边也拒绝，否则交给索引构建时跳过。
    pub fn validate(&self, strict: bool) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if node.id.is_empty() {
                return Err(Error::InvalidInput("节点 ID 不能为空".to_string()));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(Error::InvalidInput(format!("重复的节点 ID: {}", node.id)));
            }
        }

        for link in &self.links {
            if !link.weight.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "边 {} -> {} 的权重无效: {}",
                    link.source, link.target, link.weight
                )));
            }
            if let Some(cap) = link.capacity {
                if !cap.is_finite() || cap < 0.0 {
                    return Err(Error::InvalidInput(format!(
                        "边 {} -> {} 的容量无效: {}",
                        link.source, link.target, cap
                    )));
                }
            }
        }

        if strict {
            if let Some(link) = self.dangling_links().first() {
                return Err(Error::InvalidInput(format!(
                    "边 {} -> {} 引用了不存在的节点",
                    link.source, link.target
                )));
            }
        }

        Ok(())
    }

    /// 所有边的总权重
    pub fn total_weight(&self) -> f64 {
        self.links.iter().map(|l| l.weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        Graph::undirected()
            .with_nodes(["A", "B", "C"])
            .with_link("A", "B", 1.0)
            .with_link("B", "C", 2.0)
            .with_link("A", "C", 4.0)
    }

    #[test]
    fn test_graph_basic() {
        let graph = triangle();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.link_count(), 3);
        assert_eq!(graph.find_link("C", "B").map(|l| l.weight), Some(2.0));
        assert_eq!(graph.label_of("A"), "A");
        assert_eq!(graph.label_of("missing"), "missing");
        assert_eq!(graph.total_weight(), 7.0);
    }

    #[test]
    fn test_find_link_directed_is_asymmetric() {
        let mut graph = triangle();
        graph.is_directed = true;
        assert!(graph.find_link("B", "A").is_none());
        assert!(graph.find_link("A", "B").is_some());
    }

    #[test]
    fn test_validate() {
        let graph = triangle().with_link("A", "Z", 1.0);
        assert_eq!(graph.dangling_links().len(), 1);
        assert!(graph.validate(false).is_ok());
        assert_eq!(graph.validate(true).unwrap_err().kind(), "InvalidInput");

        let dup = Graph::undirected().with_nodes(["A", "A"]);
        assert!(dup.validate(false).is_err());

        let nan = triangle().with_link("A", "B", f64::NAN);
        assert!(nan.validate(false).is_err());
    }

    #[test]
    fn test_deserialize_snake_case_flag() {
        let json = r#"{"nodes":[{"id":"1"}],"links":[],"is_directed":true}"#;
        let graph: Graph = serde_json::from_str(json).unwrap();
        assert!(graph.is_directed);

        let out = serde_json::to_string(&graph).unwrap();
        assert!(out.contains("\"isDirected\":true"));
    }
}
