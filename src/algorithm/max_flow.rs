//! 最大流算法
//!
//! 实现 Edmonds-Karp 算法（基于 BFS 的 Ford-Fulkerson），
//! 每找到一条增广路径记录一步，并给出最终的最小割

use crate::error::{Error, Result};
use crate::graph::{Graph, GraphIndex, Link};
use crate::trace::{AlgorithmResult, AlgorithmStep, StepRecorder};
use crate::types::{flow_key, EPSILON};
use indexmap::IndexMap;
use std::collections::VecDeque;

/// 残余网络中的一条弧；下标 e 与 e^1 互为反向弧
#[derive(Debug, Clone)]
struct ResidualArc {
    to: usize,
    capacity: f64,
    flow: f64,
    /// 对应原图边的下标
    link: usize,
}

impl ResidualArc {
    fn residual(&self) -> f64 {
        self.capacity - self.flow
    }
}

/// Edmonds-Karp 最大流算法
pub struct EdmondsKarp<'g> {
    index: GraphIndex<'g>,
    arcs: Vec<ResidualArc>,
    /// 节点 -> 出弧下标（含反向弧）
    adjacency: Vec<Vec<usize>>,
}

impl<'g> EdmondsKarp<'g> {
    /// 构建残余网络
    ///
    /// 有向边：正向容量为 capacity，反向为 0；无向边两个方向都为 capacity。
    /// 自环对流量没有贡献，直接忽略。
    pub fn new(graph: &'g Graph) -> Result<Self> {
        let index = GraphIndex::build(graph)?;
        let mut arcs = Vec::with_capacity(index.link_count() * 2);
        let mut adjacency = vec![Vec::new(); index.node_count()];

        for &i in index.link_indices() {
            let Some((u, v)) = index.endpoints(i) else {
                continue;
            };
            if u == v {
                continue;
            }
            let capacity = index.link(i).capacity();
            let reverse = if graph.is_directed { 0.0 } else { capacity };

            adjacency[u].push(arcs.len());
            arcs.push(ResidualArc {
                to: v,
                capacity,
                flow: 0.0,
                link: i,
            });
            adjacency[v].push(arcs.len());
            arcs.push(ResidualArc {
                to: u,
                capacity: reverse,
                flow: 0.0,
                link: i,
            });
        }

        Ok(Self {
            index,
            arcs,
            adjacency,
        })
    }

    /// 计算从 source 到 sink 的最大流
    pub fn run(mut self, source_id: &str, sink_id: &str) -> Result<AlgorithmResult> {
        let (source, sink) = match (self.index.slot(source_id), self.index.slot(sink_id)) {
            (Some(s), Some(t)) => (s, t),
            _ => {
                return Err(Error::MissingEndpoints {
                    start: source_id.to_string(),
                    end: sink_id.to_string(),
                })
            }
        };
        if source == sink {
            return Err(Error::InvalidInput("源点与汇点不能相同".to_string()));
        }

        let mut recorder = StepRecorder::new("ford_fulkerson");
        recorder.step_and_log(
            AlgorithmStep::new(format!(
                "开始计算最大流: {} → {}",
                self.index.label(source),
                self.index.label(sink)
            ))
            .current_node(self.index.id(source))
            .flow_details(IndexMap::new()),
        );

        let mut max_flow = 0.0;
        let mut rounds = 0;

        // 重复 BFS 找增广路径
        while let Some(path) = self.find_augmenting_path(source, sink) {
            rounds += 1;
            let bottleneck = path
                .iter()
                .map(|&e| self.arcs[e].residual())
                .fold(f64::INFINITY, f64::min);

            // 沿路径增广
            for &e in &path {
                self.arcs[e].flow += bottleneck;
                self.arcs[e ^ 1].flow -= bottleneck;
            }
            max_flow += bottleneck;

            let mut nodes = vec![source];
            nodes.extend(path.iter().map(|&e| self.arcs[e].to));
            let labels: Vec<&str> = nodes.iter().map(|&s| self.index.label(s)).collect();
            recorder.step_and_log(
                AlgorithmStep::new(format!(
                    "第 {} 条增广路径: {}，瓶颈 {}，当前总流量 {}",
                    rounds,
                    labels.join(" → "),
                    bottleneck,
                    max_flow
                ))
                .path(self.index.ids(&nodes))
                .flow_details(self.flow_details()),
            );
        }

        let min_cut = self.min_cut(source);
        let cut_capacity: f64 = min_cut.iter().map(Link::capacity).sum();
        let flow = self.flow_details();
        recorder.step_and_log(
            AlgorithmStep::new(format!(
                "不存在增广路径，最大流为 {}（最小割 {} 条边，容量 {}）",
                max_flow,
                min_cut.len(),
                cut_capacity
            ))
            .flow_details(flow.clone()),
        );

        Ok(recorder.finish(AlgorithmResult {
            max_flow: Some(max_flow),
            flow_details: Some(flow),
            min_cut: Some(min_cut),
            ..Default::default()
        }))
    }

    /// BFS 找最短增广路径，返回路径上的弧下标
    fn find_augmenting_path(&self, source: usize, sink: usize) -> Option<Vec<usize>> {
        let n = self.adjacency.len();
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();

        visited[source] = true;
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            if u == sink {
                break;
            }
            for &e in &self.adjacency[u] {
                let arc = &self.arcs[e];
                if !visited[arc.to] && arc.residual() > EPSILON {
                    visited[arc.to] = true;
                    parent[arc.to] = Some(e);
                    queue.push_back(arc.to);
                }
            }
        }

        if !visited[sink] {
            return None;
        }

        // 重构路径
        let mut path = Vec::new();
        let mut current = sink;
        while current != source {
            let e = parent[current]?;
            path.push(e);
            current = self.arcs[e ^ 1].to;
        }
        path.reverse();
        Some(path)
    }

    /// 每条边上的净流量，键为 "u->v"（按实际流向），并行边累加
    fn flow_details(&self) -> IndexMap<String, f64> {
        let mut details = IndexMap::new();
        for (e, arc) in self.arcs.iter().enumerate().step_by(2) {
            if arc.flow.abs() <= EPSILON {
                continue;
            }
            let from = self.index.id(self.arcs[e ^ 1].to);
            let to = self.index.id(arc.to);
            let key = if arc.flow > 0.0 {
                flow_key(from, to)
            } else {
                flow_key(to, from)
            };
            *details.entry(key).or_insert(0.0) += arc.flow.abs();
        }
        details
    }

    /// 最小割：残余网络中从源点可达一侧指向不可达一侧的边
    fn min_cut(&self, source: usize) -> Vec<Link> {
        let n = self.adjacency.len();
        let mut reachable = vec![false; n];
        let mut queue = VecDeque::new();
        reachable[source] = true;
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            for &e in &self.adjacency[u] {
                let arc = &self.arcs[e];
                if !reachable[arc.to] && arc.residual() > EPSILON {
                    reachable[arc.to] = true;
                    queue.push_back(arc.to);
                }
            }
        }

        let mut cut = Vec::new();
        for (e, arc) in self.arcs.iter().enumerate() {
            let from = self.arcs[e ^ 1].to;
            // 只看原始方向上有容量的弧
            if arc.capacity <= 0.0 || !reachable[from] || reachable[arc.to] {
                continue;
            }
            let link = self.index.link(arc.link);
            cut.push(link.oriented(self.index.id(from), self.index.id(arc.to)));
        }
        cut
    }
}

/// Ford-Fulkerson（Edmonds-Karp）最大流
pub fn ford_fulkerson(graph: &Graph, source_id: &str, sink_id: &str) -> Result<AlgorithmResult> {
    EdmondsKarp::new(graph)?.run(source_id, sink_id)
}
