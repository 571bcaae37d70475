//! 边定义

use crate::types::{LinkRef, NodeId};
use serde::{Deserialize, Serialize};

fn default_weight() -> f64 {
    1.0
}

/// 边
///
/// 无向图中 (source, target) 与 (target, source) 表示同一条边。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// 源节点 ID
    pub source: NodeId,
    /// 目标节点 ID
    pub target: NodeId,
    /// 权重（最短路径、最小生成树）
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// 容量（最大流），缺省时使用权重
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
}

impl Link {
    /// 创建边
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
            capacity: None,
        }
    }

    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// 最大流使用的容量
    pub fn capacity(&self) -> f64 {
        self.capacity.unwrap_or(self.weight)
    }

    pub fn link_ref(&self) -> LinkRef {
        LinkRef::new(self.source.clone(), self.target.clone())
    }

    /// 按遍历方向复制一条边（无向边可能被反向走过）
    pub fn oriented(&self, from: &str, to: &str) -> Self {
        Self {
            source: from.to_string(),
            target: to.to_string(),
            weight: self.weight,
            capacity: self.capacity,
        }
    }

    /// 端点匹配，无向时对称比较
    pub fn connects(&self, a: &str, b: &str, directed: bool) -> bool {
        (self.source == a && self.target == b)
            || (!directed && self.source == b && self.target == a)
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_falls_back_to_weight() {
        let link = Link::new("A", "B", 4.0);
        assert_eq!(link.capacity(), 4.0);
        assert_eq!(link.clone().with_capacity(9.0).capacity(), 9.0);
    }

    #[test]
    fn test_connects() {
        let link = Link::new("A", "B", 1.0);
        assert!(link.connects("B", "A", false));
        assert!(!link.connects("B", "A", true));
        assert_eq!(link.oriented("B", "A").source, "B");
    }

    #[test]
    fn test_deserialize_defaults() {
        let link: Link = serde_json::from_str(r#"{"source":"a","target":"b"}"#).unwrap();
        assert_eq!(link.weight, 1.0);
        assert!(link.capacity.is_none());
        let json = serde_json::to_string(&link).unwrap();
        assert!(!json.contains("capacity"));
    }
}
