//! 步骤记录
//!
//! 每个算法在执行过程中追加统一格式的步骤记录。步骤只追加、
//! 记录后不可变，前端播放器可以按顺序回放或跳到任意下标。

use crate::graph::Link;
use crate::types::{LinkRef, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 二分图的两个顶点集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BipartiteSets {
    pub set_a: Vec<NodeId>,
    pub set_b: Vec<NodeId>,
}

/// 执行过程中的一个快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited: Option<Vec<NodeId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<NodeId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_node_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_link_id: Option<LinkRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mst_links: Option<Vec<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traversed_edges: Option<Vec<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_details: Option<IndexMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bipartite_sets: Option<BipartiteSets>,
    /// 最短路径的当前距离表（不可达为 null）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distances: Option<IndexMap<NodeId, Option<f64>>>,
    pub log: String,
}

impl AlgorithmStep {
    pub fn new(log: impl Into<String>) -> Self {
        Self {
            log: log.into(),
            ..Default::default()
        }
    }

    pub fn visited(mut self, visited: Vec<NodeId>) -> Self {
        self.visited = Some(visited);
        self
    }

    pub fn path(mut self, path: Vec<NodeId>) -> Self {
        self.path = Some(path);
        self
    }

    pub fn current_node(mut self, id: impl Into<NodeId>) -> Self {
        self.current_node_id = Some(id.into());
        self
    }

    pub fn current_link(mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        self.current_link_id = Some(LinkRef::new(source, target));
        self
    }

    pub fn mst_links(mut self, links: Vec<Link>) -> Self {
        self.mst_links = Some(links);
        self
    }

    pub fn traversed_edges(mut self, edges: Vec<Link>) -> Self {
        self.traversed_edges = Some(edges);
        self
    }

    pub fn flow_details(mut self, flow: IndexMap<String, f64>) -> Self {
        self.flow_details = Some(flow);
        self
    }

    pub fn bipartite_sets(mut self, sets: BipartiteSets) -> Self {
        self.bipartite_sets = Some(sets);
        self
    }

    pub fn distances(mut self, distances: IndexMap<NodeId, Option<f64>>) -> Self {
        self.distances = Some(distances);
        self
    }
}

/// 一次算法调用的最终结果
///
/// 只填充与所请求算法相关的字段，其余字段序列化时省略。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<NodeId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited: Option<Vec<NodeId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distances: Option<IndexMap<NodeId, Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_negative_cycle: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mst_links: Option<Vec<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traversed_edges: Option<Vec<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_flow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_details: Option<IndexMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_cut: Option<Vec<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bipartite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bipartite_sets: Option<BipartiteSets>,
    /// 欧拉回路的节点序列；`Some(None)` 表示不存在回路（序列化为 null）
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "double_option"
    )]
    pub euler_path: Option<Option<Vec<NodeId>>>,
    pub logs: Vec<String>,
    pub steps: Vec<AlgorithmStep>,
}

impl AlgorithmResult {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// 按下标读取步骤（回放/跳转）
    pub fn step(&self, index: usize) -> Option<&AlgorithmStep> {
        self.steps.get(index)
    }

    /// 最小生成树（森林）的总权重
    pub fn mst_weight(&self) -> Option<f64> {
        self.mst_links
            .as_ref()
            .map(|links| links.iter().map(|l| l.weight).sum())
    }
}

/// 区分 "字段缺省" 与 "显式 null"
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// 步骤记录器
///
/// 算法执行期间独占持有，结束时一次性移交给结果。
pub struct StepRecorder {
    algorithm: &'static str,
    steps: Vec<AlgorithmStep>,
    logs: Vec<String>,
}

impl StepRecorder {
    pub fn new(algorithm: &'static str) -> Self {
        Self {
            algorithm,
            steps: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// 追加一个步骤
    pub fn step(&mut self, step: AlgorithmStep) {
        tracing::debug!(
            algorithm = self.algorithm,
            index = self.steps.len(),
            "{}",
            step.log
        );
        self.steps.push(step);
    }

    /// 追加一条文字日志
    pub fn log(&mut self, message: impl Into<String>) {
        self.logs.push(message.into());
    }

    /// 同时记录步骤和日志
    pub fn step_and_log(&mut self, step: AlgorithmStep) {
        self.logs.push(step.log.clone());
        self.step(step);
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn algorithm(&self) -> &'static str {
        self.algorithm
    }

    /// 把记录的步骤和日志移入结果
    pub fn finish(self, mut result: AlgorithmResult) -> AlgorithmResult {
        result.logs = self.logs;
        result.steps = self.steps;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_serialization_omits_absent_fields() {
        let step = AlgorithmStep::new("访问 A")
            .current_node("A")
            .visited(vec!["A".into()]);
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["currentNodeId"], "A");
        assert_eq!(json["log"], "访问 A");
        assert!(json.get("mstLinks").is_none());
        assert!(json.get("currentLinkId").is_none());
    }

    #[test]
    fn test_recorder_finish() {
        let mut recorder = StepRecorder::new("bfs");
        recorder.step_and_log(AlgorithmStep::new("一"));
        recorder.step(AlgorithmStep::new("二"));
        recorder.log("结束");
        assert_eq!(recorder.step_count(), 2);

        let result = recorder.finish(AlgorithmResult {
            visited: Some(vec!["A".into()]),
            ..Default::default()
        });
        assert_eq!(result.logs, vec!["一", "结束"]);
        assert_eq!(result.step(1).map(|s| s.log.as_str()), Some("二"));
        assert!(result.step(2).is_none());
    }

    #[test]
    fn test_euler_path_null_vs_absent() {
        let absent = AlgorithmResult::default();
        let json = serde_json::to_value(&absent).unwrap();
        assert!(json.get("eulerPath").is_none());

        let none = AlgorithmResult {
            euler_path: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_value(&none).unwrap();
        assert!(json["eulerPath"].is_null());
        assert!(json.get("eulerPath").is_some());

        let back: AlgorithmResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.euler_path, Some(None));
    }
}
