//! 节点定义

use crate::types::{NodeId, NodeType};
use serde::{Deserialize, Serialize};

/// 节点
///
/// 位置由前端布局分配，引擎只读不写。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// 节点 ID（唯一）
    pub id: NodeId,
    /// 画布 X 坐标
    #[serde(default)]
    pub x: f64,
    /// 画布 Y 坐标
    #[serde(default)]
    pub y: f64,
    /// 显示名称
    #[serde(default)]
    pub label: String,
    /// 设备类型
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
}

impl Node {
    /// 创建节点，标签默认与 ID 相同
    pub fn new(id: impl Into<NodeId>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            x: 0.0,
            y: 0.0,
            node_type: NodeType::Pc,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    /// 显示名称，标签为空时退回 ID
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// 按网格排布第 i 个生成节点的位置（每行 5 个，间距 150）
pub(crate) fn grid_position(i: usize) -> (f64, f64) {
    (((i % 5) * 150 + 100) as f64, ((i / 5) * 150 + 100) as f64)
}
