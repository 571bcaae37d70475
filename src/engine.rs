//! 算法执行引擎
//!
//! 接收图快照与参数，按算法标签分发到对应的纯函数。
//! 每次调用互不共享可变状态，批量请求可以直接并行执行。

use crate::algorithm::{self, Algorithm};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::metrics::global_metrics;
use crate::trace::AlgorithmResult;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

/// 引擎配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// 为 true 时悬空边直接拒绝，否则跳过并记录警告
    #[serde(default)]
    pub strict_links: bool,
}

/// 一次算法请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmRequest {
    pub algorithm: Algorithm,
    pub graph: Graph,
    #[serde(default, alias = "start_id", skip_serializing_if = "Option::is_none")]
    pub start_id: Option<String>,
    #[serde(default, alias = "end_id", skip_serializing_if = "Option::is_none")]
    pub end_id: Option<String>,
}

impl AlgorithmRequest {
    pub fn new(algorithm: Algorithm, graph: Graph) -> Self {
        Self {
            algorithm,
            graph,
            start_id: None,
            end_id: None,
        }
    }

    pub fn with_start(mut self, start_id: impl Into<String>) -> Self {
        self.start_id = Some(start_id.into());
        self
    }

    pub fn with_end(mut self, end_id: impl Into<String>) -> Self {
        self.end_id = Some(end_id.into());
        self
    }
}

/// 算法执行引擎
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 执行一次算法
    pub fn run(&self, request: &AlgorithmRequest) -> Result<AlgorithmResult> {
        let algorithm = request.algorithm;
        let graph = &request.graph;
        info!(
            algorithm = %algorithm,
            nodes = graph.node_count(),
            links = graph.link_count(),
            directed = graph.is_directed,
            "开始执行算法"
        );

        let metrics = global_metrics();
        let timer = metrics.record_run_start(algorithm);
        let start = Instant::now();

        let outcome = self.dispatch(request);

        match &outcome {
            Ok(result) => {
                metrics.record_run_complete(timer, Some(result.step_count()));
                info!(
                    algorithm = %algorithm,
                    steps = result.step_count(),
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "算法执行完成"
                );
            }
            Err(e) => {
                metrics.record_run_complete(timer, None);
                warn!(algorithm = %algorithm, kind = e.kind(), "算法请求被拒绝: {}", e);
            }
        }
        outcome
    }

    /// 并行执行多个互相独立的请求，结果顺序与输入一致
    pub fn run_batch(&self, requests: &[AlgorithmRequest]) -> Vec<Result<AlgorithmResult>> {
        requests.par_iter().map(|request| self.run(request)).collect()
    }

    fn dispatch(&self, request: &AlgorithmRequest) -> Result<AlgorithmResult> {
        let graph = &request.graph;
        if self.config.strict_links {
            graph.validate(true)?;
        }

        let start = || require_start(request);
        let end = request.end_id.as_deref();
        let path_start = || {
            request
                .start_id
                .as_deref()
                .ok_or_else(|| Error::MissingEndpoints {
                    start: String::new(),
                    end: end.unwrap_or_default().to_string(),
                })
        };

        match request.algorithm {
            Algorithm::Bfs => algorithm::bfs(graph, start()?),
            Algorithm::Dfs => algorithm::dfs(graph, start()?),
            Algorithm::Dijkstra => algorithm::dijkstra(graph, path_start()?, end),
            Algorithm::BellmanFord => algorithm::bellman_ford(graph, path_start()?, end),
            Algorithm::Prim => algorithm::prim(graph),
            Algorithm::Kruskal => algorithm::kruskal(graph),
            Algorithm::FordFulkerson => {
                let (source, sink) = match (request.start_id.as_deref(), end) {
                    (Some(s), Some(t)) => (s, t),
                    (s, t) => {
                        return Err(Error::MissingEndpoints {
                            start: s.unwrap_or_default().to_string(),
                            end: t.unwrap_or_default().to_string(),
                        })
                    }
                };
                algorithm::ford_fulkerson(graph, source, sink)
            }
            Algorithm::Fleury => algorithm::fleury(graph),
            Algorithm::Hierholzer => algorithm::hierholzer(graph),
            Algorithm::Bipartite => algorithm::check_bipartite(graph),
        }
    }
}

fn require_start(request: &AlgorithmRequest) -> Result<&str> {
    request
        .start_id
        .as_deref()
        .ok_or_else(|| Error::InvalidStart("未提供起点".to_string()))
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
    fn test_dispatch_each_algorithm() {
        let engine = Engine::default();
        for algorithm in Algorithm::ALL {
            let request = AlgorithmRequest::new(algorithm, triangle())
                .with_start("A")
                .with_end("C");
            let result = engine.run(&request).unwrap();
            assert!(!result.steps.is_empty(), "{} recorded no steps", algorithm);
        }
    }

    #[test]
    fn test_only_relevant_fields_populated() {
        let engine = Engine::default();
        let result = engine
            .run(&AlgorithmRequest::new(Algorithm::Kruskal, triangle()))
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("mstLinks").is_some());
        assert!(json.get("visited").is_none());
        assert!(json.get("maxFlow").is_none());
        assert!(json.get("eulerPath").is_none());
    }

    #[test]
    fn test_missing_start() {
        let engine = Engine::default();
        let err = engine
            .run(&AlgorithmRequest::new(Algorithm::Bfs, triangle()))
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidStart");

        let err = engine
            .run(&AlgorithmRequest::new(Algorithm::FordFulkerson, triangle()).with_start("A"))
            .unwrap_err();
        assert_eq!(err.kind(), "MissingEndpoints");
    }

    #[test]
    fn test_shortest_path_missing_start() {
        let engine = Engine::default();
        for algorithm in [Algorithm::Dijkstra, Algorithm::BellmanFord] {
            let err = engine
                .run(&AlgorithmRequest::new(algorithm, triangle()).with_end("C"))
                .unwrap_err();
            assert_eq!(err.kind(), "MissingEndpoints");

            let err = engine
                .run(&AlgorithmRequest::new(algorithm, triangle()).with_start("Q"))
                .unwrap_err();
            assert_eq!(err.kind(), "MissingEndpoints");
            assert!(err.is_rejection());
        }
    }

    #[test]
    fn test_strict_links() {
        let graph = triangle().with_link("A", "ghost", 1.0);
        let request = AlgorithmRequest::new(Algorithm::Bfs, graph).with_start("A");

        let lenient = Engine::default().run(&request).unwrap();
        assert_eq!(lenient.visited.unwrap().len(), 3);

        let strict = Engine::new(EngineConfig { strict_links: true });
        assert_eq!(strict.run(&request).unwrap_err().kind(), "InvalidInput");
    }

    #[test]
    fn test_request_json_aliases() {
        let json = r#"{
            "algorithm": "dijkstra",
            "graph": {
                "nodes": [{"id": "A"}, {"id": "B"}],
                "links": [{"source": "A", "target": "B", "weight": 2}],
                "is_directed": false
            },
            "start_id": "A",
            "end_id": "B"
        }"#;
        let request: AlgorithmRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.algorithm, Algorithm::Dijkstra);
        let result = Engine::default().run(&request).unwrap();
        assert_eq!(result.distance, Some(2.0));
    }

    #[test]
    fn test_run_batch_preserves_order() {
        let engine = Engine::default();
        let requests: Vec<AlgorithmRequest> = ["A", "B", "C", "Q"]
            .iter()
            .map(|s| AlgorithmRequest::new(Algorithm::Bfs, triangle()).with_start(*s))
            .collect();
        let results = engine.run_batch(&requests);
        assert_eq!(results.len(), 4);
        for (i, s) in ["A", "B", "C"].iter().enumerate() {
            assert_eq!(results[i].as_ref().unwrap().visited.as_ref().unwrap()[0], *s);
        }
        assert!(results[3].is_err());
    }
}
