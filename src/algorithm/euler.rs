//! 欧拉回路
//!
//! Fleury 逐边前进，每一步做桥检测；Hierholzer 反复寻找子回路并拼接。
//! 两者共用前置检查：度数条件 + 有边节点弱连通。不满足时结果为
//! `eulerPath: null` 并附带原因，不返回错误。

use crate::error::Result;
use crate::graph::{Adjacent, Graph, GraphIndex, Link};
use crate::trace::{AlgorithmResult, AlgorithmStep, StepRecorder};
use std::collections::VecDeque;

/// 前置检查结果
enum Precheck {
    /// 没有任何边，回路为空
    Empty,
    /// 可以从该节点出发
    Start(usize),
    /// 不存在欧拉回路
    Rejected(String),
}

fn precheck(index: &GraphIndex<'_>) -> Precheck {
    let n = index.node_count();
    let mut out_deg = vec![0usize; n];
    let mut in_deg = vec![0usize; n];
    for &i in index.link_indices() {
        if let Some((u, v)) = index.endpoints(i) {
            out_deg[u] += 1;
            in_deg[v] += 1;
        }
    }

    if index.link_count() == 0 {
        return Precheck::Empty;
    }

    if index.is_directed() {
        if let Some(u) = (0..n).find(|&u| in_deg[u] != out_deg[u]) {
            return Precheck::Rejected(format!(
                "节点 {} 的入度 ({}) 与出度 ({}) 不相等",
                index.label(u),
                in_deg[u],
                out_deg[u]
            ));
        }
    } else if let Some(u) = (0..n).find(|&u| (in_deg[u] + out_deg[u]) % 2 == 1) {
        return Precheck::Rejected(format!(
            "节点 {} 的度数为奇数 ({})",
            index.label(u),
            in_deg[u] + out_deg[u]
        ));
    }

    let has_edges = |u: usize| in_deg[u] + out_deg[u] > 0;
    let Some(start) = (0..n).find(|&u| has_edges(u)) else {
        return Precheck::Empty;
    };

    // 忽略方向的连通性
    let mut seen = vec![false; n];
    let mut queue = VecDeque::from([start]);
    seen[start] = true;
    while let Some(u) = queue.pop_front() {
        for adj in index.undirected_neighbors(u) {
            if !seen[adj.node] {
                seen[adj.node] = true;
                queue.push_back(adj.node);
            }
        }
    }
    if let Some(u) = (0..n).find(|&u| has_edges(u) && !seen[u]) {
        return Precheck::Rejected(format!(
            "图不连通：{} 与 {} 不在同一连通分量",
            index.label(start),
            index.label(u)
        ));
    }

    Precheck::Start(start)
}

/// 执行前置检查；不满足时直接给出结果
fn begin(
    index: &GraphIndex<'_>,
    recorder: &mut StepRecorder,
) -> std::result::Result<usize, AlgorithmResult> {
    match precheck(index) {
        Precheck::Start(start) => {
            recorder.step_and_log(
                AlgorithmStep::new(format!(
                    "满足欧拉回路条件，从 {} 出发",
                    index.label(start)
                ))
                .current_node(index.id(start))
                .path(vec![index.id(start).to_string()])
                .traversed_edges(Vec::new()),
            );
            Ok(start)
        }
        Precheck::Empty => {
            recorder.step_and_log(AlgorithmStep::new("图中没有边，欧拉回路为空"));
            Err(AlgorithmResult {
                euler_path: Some(Some(Vec::new())),
                traversed_edges: Some(Vec::new()),
                ..Default::default()
            })
        }
        Precheck::Rejected(reason) => {
            recorder.step_and_log(AlgorithmStep::new(format!("不存在欧拉回路：{}", reason)));
            Err(AlgorithmResult {
                euler_path: Some(None),
                ..Default::default()
            })
        }
    }
}

/// Fleury 算法
///
/// 每一步优先选择非桥边：暂时移除后，剩余未走的边仍须都能从下一个节点到达。
pub fn fleury(graph: &Graph) -> Result<AlgorithmResult> {
    let index = GraphIndex::build(graph)?;
    let mut recorder = StepRecorder::new("fleury");
    let start = match begin(&index, &mut recorder) {
        Ok(start) => start,
        Err(result) => return Ok(recorder.finish(result)),
    };

    let mut used = vec![false; graph.links.len()];
    let mut remaining = index.link_count();
    let mut current = start;
    let mut path = vec![start];
    let mut traversed: Vec<Link> = Vec::new();

    while remaining > 0 {
        let candidates: Vec<Adjacent> = index
            .neighbors(current)
            .iter()
            .filter(|adj| !used[adj.link])
            .copied()
            .collect();
        let Some(&fallback) = candidates.first() else {
            break;
        };

        let safe = candidates.iter().copied().find(|adj| {
            used[adj.link] = true;
            let ok = reachable_unused(&index, &used, adj.node) == remaining - 1;
            used[adj.link] = false;
            ok
        });
        let (chosen, is_bridge) = match safe {
            Some(adj) => (adj, false),
            None => (fallback, true),
        };

        used[chosen.link] = true;
        remaining -= 1;
        let next = chosen.node;
        traversed.push(index.link(chosen.link).oriented(index.id(current), index.id(next)));
        path.push(next);

        let note = if is_bridge { "（桥，唯一选择）" } else { "" };
        recorder.step_and_log(
            AlgorithmStep::new(format!(
                "走过 {} → {}{}",
                index.label(current),
                index.label(next),
                note
            ))
            .current_node(index.id(next))
            .current_link(index.id(current), index.id(next))
            .path(index.ids(&path))
            .traversed_edges(traversed.clone()),
        );
        current = next;
    }

    finish_circuit(&index, recorder, remaining, &path, traversed)
}

/// 从 `from` 出发沿未使用的边能走到的未使用边数
fn reachable_unused(index: &GraphIndex<'_>, used: &[bool], from: usize) -> usize {
    let mut visited = vec![false; index.node_count()];
    let mut counted = vec![false; used.len()];
    let mut count = 0;
    let mut stack = vec![from];
    visited[from] = true;

    while let Some(u) = stack.pop() {
        for adj in index.neighbors(u) {
            if used[adj.link] {
                continue;
            }
            if !counted[adj.link] {
                counted[adj.link] = true;
                count += 1;
            }
            if !visited[adj.node] {
                visited[adj.node] = true;
                stack.push(adj.node);
            }
        }
    }
    count
}

/// Hierholzer 算法
///
/// 从起点走到无路可走得到第一条子回路；之后在回路上找第一个仍有未用边的节点，
/// 从它出发走出新的子回路并拼接进去，直到所有边用完。
pub fn hierholzer(graph: &Graph) -> Result<AlgorithmResult> {
    let index = GraphIndex::build(graph)?;
    let mut recorder = StepRecorder::new("hierholzer");
    let start = match begin(&index, &mut recorder) {
        Ok(start) => start,
        Err(result) => return Ok(recorder.finish(result)),
    };

    let mut walker = Walker {
        index: &index,
        used: vec![false; graph.links.len()],
        cursor: vec![0; index.node_count()],
        remaining: index.link_count(),
    };

    let (mut circuit, mut links) = walker.walk(start);
    recorder.step_and_log(
        AlgorithmStep::new(format!("子回路 #1: {}", walker.describe(&circuit)))
            .current_node(index.id(start))
            .path(index.ids(&circuit))
            .traversed_edges(links.clone()),
    );

    let mut tours = 1;
    while walker.remaining > 0 {
        let Some(pos) = circuit.iter().position(|&u| walker.has_unused(u)) else {
            break;
        };
        let pivot = circuit[pos];
        let (tour, tour_links) = walker.walk(pivot);
        tours += 1;
        recorder.step_and_log(
            AlgorithmStep::new(format!(
                "从 {} 出发找到子回路 #{}: {}",
                index.label(pivot),
                tours,
                walker.describe(&tour)
            ))
            .current_node(index.id(pivot))
            .path(index.ids(&tour))
            .traversed_edges(tour_links.clone()),
        );

        // tour 首尾都是 pivot，替换 circuit[pos]
        circuit.splice(pos..=pos, tour);
        links.splice(pos..pos, tour_links);
        recorder.step_and_log(
            AlgorithmStep::new(format!(
                "在 {} 处拼接，回路长度 {}",
                index.label(pivot),
                links.len()
            ))
            .current_node(index.id(pivot))
            .path(index.ids(&circuit))
            .traversed_edges(links.clone()),
        );
    }

    let remaining = walker.remaining;
    finish_circuit(&index, recorder, remaining, &circuit, links)
}

/// 子回路行走状态：每个节点一个邻接游标，已用的边不再考虑
struct Walker<'a, 'g> {
    index: &'a GraphIndex<'g>,
    used: Vec<bool>,
    cursor: Vec<usize>,
    remaining: usize,
}

impl Walker<'_, '_> {
    fn next_unused(&mut self, u: usize) -> Option<Adjacent> {
        let neighbors = self.index.neighbors(u);
        while let Some(adj) = neighbors.get(self.cursor[u]) {
            if !self.used[adj.link] {
                return Some(*adj);
            }
            self.cursor[u] += 1;
        }
        None
    }

    fn has_unused(&mut self, u: usize) -> bool {
        self.next_unused(u).is_some()
    }

    /// 从 `start` 一直走到无边可走
    fn walk(&mut self, start: usize) -> (Vec<usize>, Vec<Link>) {
        let mut nodes = vec![start];
        let mut links = Vec::new();
        let mut current = start;
        while let Some(adj) = self.next_unused(current) {
            self.used[adj.link] = true;
            self.remaining -= 1;
            links.push(
                self.index
                    .link(adj.link)
                    .oriented(self.index.id(current), self.index.id(adj.node)),
            );
            nodes.push(adj.node);
            current = adj.node;
        }
        (nodes, links)
    }

    fn describe(&self, nodes: &[usize]) -> String {
        nodes
            .iter()
            .map(|&u| self.index.label(u))
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

fn finish_circuit(
    index: &GraphIndex<'_>,
    mut recorder: StepRecorder,
    remaining: usize,
    path: &[usize],
    traversed: Vec<Link>,
) -> Result<AlgorithmResult> {
    if remaining > 0 {
        recorder.log(format!("仍有 {} 条边无法走到，不存在欧拉回路", remaining));
        return Ok(recorder.finish(AlgorithmResult {
            euler_path: Some(None),
            traversed_edges: Some(traversed),
            ..Default::default()
        }));
    }

    let labels: Vec<&str> = path.iter().map(|&u| index.label(u)).collect();
    recorder.log(format!(
        "欧拉回路 ({} 条边): {}",
        traversed.len(),
        labels.join(" → ")
    ));
    Ok(recorder.finish(AlgorithmResult {
        euler_path: Some(Some(index.ids(path))),
        traversed_edges: Some(traversed),
        ..Default::default()
    }))
}
