//! 通用类型定义

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 节点 ID（由外部编辑器分配，创建后不可变）
pub type NodeId = String;

/// 浮点比较容差（流量、距离）
pub const EPSILON: f64 = 1e-9;

/// 节点设备类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Pc,
    Router,
    Switch,
    Server,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeType::Pc => "pc",
            NodeType::Router => "router",
            NodeType::Switch => "switch",
            NodeType::Server => "server",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for NodeType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pc" => Ok(NodeType::Pc),
            "router" => Ok(NodeType::Router),
            "switch" => Ok(NodeType::Switch),
            "server" => Ok(NodeType::Server),
            other => Err(crate::Error::InvalidInput(format!(
                "未知的节点类型: {}",
                other
            ))),
        }
    }
}

/// 边引用（动画中高亮当前边）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkRef {
    pub source: NodeId,
    pub target: NodeId,
}

impl LinkRef {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// 无向比较：(a, b) 与 (b, a) 视为同一条边
    pub fn matches(&self, source: &str, target: &str, directed: bool) -> bool {
        (self.source == source && self.target == target)
            || (!directed && self.source == target && self.target == source)
    }
}

impl fmt::Display for LinkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

/// 流量明细的键: "u->v"
pub fn flow_key(source: &str, target: &str) -> String {
    format!("{}->{}", source, target)
}
