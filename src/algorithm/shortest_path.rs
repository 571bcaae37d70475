//! 最短路径算法
//!
//! Dijkstra（非负权，最小优先队列）与 Bellman-Ford（可处理负权并检测负环）

use super::frontier::MinFrontier;
use crate::error::{Error, Result};
use crate::graph::{Graph, GraphIndex};
use crate::trace::{AlgorithmResult, AlgorithmStep, StepRecorder};
use crate::types::{NodeId, EPSILON};
use indexmap::IndexMap;

/// 解析起点与可选终点：任一给出但不存在时报 MissingEndpoints
fn resolve_endpoints(
    index: &GraphIndex<'_>,
    start_id: &str,
    end_id: Option<&str>,
) -> Result<(usize, Option<usize>)> {
    let missing = || Error::MissingEndpoints {
        start: start_id.to_string(),
        end: end_id.unwrap_or_default().to_string(),
    };
    let start = index.slot(start_id).ok_or_else(missing)?;
    let end = match end_id {
        None => None,
        Some(end) => Some(index.slot(end).ok_or_else(missing)?),
    };
    Ok((start, end))
}

/// 距离表快照（不可达为 None）
fn distance_table(index: &GraphIndex<'_>, dist: &[f64]) -> IndexMap<NodeId, Option<f64>> {
    dist.iter()
        .enumerate()
        .map(|(slot, &d)| {
            (
                index.id(slot).to_string(),
                if d.is_finite() { Some(d) } else { None },
            )
        })
        .collect()
}

/// 沿前驱重建路径；带长度保护，前驱表有环时也能终止
fn reconstruct_path(prev: &[Option<usize>], start: usize, end: usize) -> Vec<usize> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match prev[current] {
            Some(p) if path.len() <= prev.len() => {
                path.push(p);
                current = p;
            }
            _ => return Vec::new(),
        }
    }
    path.reverse();
    path
}

fn format_distance(d: f64) -> String {
    if d.is_finite() {
        format!("{}", d)
    } else {
        "∞".to_string()
    }
}

/// 填充终点相关的结果字段
fn finish_path(
    index: &GraphIndex<'_>,
    recorder: &mut StepRecorder,
    result: &mut AlgorithmResult,
    prev: &[Option<usize>],
    dist: &[f64],
    start: usize,
    end: Option<usize>,
) {
    let Some(end) = end else {
        return;
    };

    if dist[end].is_finite() {
        let path = reconstruct_path(prev, start, end);
        let labels: Vec<&str> = path.iter().map(|&s| index.label(s)).collect();
        let message = format!(
            "最短路径: {}，总距离 {}",
            labels.join(" → "),
            format_distance(dist[end])
        );
        recorder.step_and_log(AlgorithmStep::new(message).path(index.ids(&path)));
        result.path = Some(index.ids(&path));
        result.distance = Some(dist[end]);
    } else {
        recorder.step_and_log(AlgorithmStep::new(format!(
            "从 {} 无法到达 {}",
            index.label(start),
            index.label(end)
        )));
        result.path = Some(Vec::new());
    }
}

/// Dijkstra 最短路径
///
/// 只校验实际松弛到的边：遇到第一条负权边即返回 `NegativeWeight`。
/// 给出终点时，终点出队后提前结束。
pub fn dijkstra(graph: &Graph, start_id: &str, end_id: Option<&str>) -> Result<AlgorithmResult> {
    let index = GraphIndex::build(graph)?;
    let (start, end) = resolve_endpoints(&index, start_id, end_id)?;
    let mut recorder = StepRecorder::new("dijkstra");

    let n = index.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut settled_order: Vec<usize> = Vec::new();
    let mut frontier = MinFrontier::new();
    let mut seq = 0;

    dist[start] = 0.0;
    frontier.offer(start, 0.0, seq);
    recorder.step(
        AlgorithmStep::new(format!("从 {} 开始 Dijkstra", index.label(start)))
            .current_node(index.id(start))
            .distances(distance_table(&index, &dist)),
    );

    while let Some((u, rank)) = frontier.pop() {
        settled[u] = true;
        settled_order.push(u);
        recorder.step_and_log(
            AlgorithmStep::new(format!(
                "确定 {} 的最短距离 {}",
                index.label(u),
                format_distance(rank.key)
            ))
            .current_node(index.id(u))
            .visited(index.ids(&settled_order))
            .distances(distance_table(&index, &dist)),
        );

        if Some(u) == end {
            recorder.log(format!("已到达终点 {}，提前结束", index.label(u)));
            break;
        }

        for adj in index.neighbors(u) {
            let v = adj.node;
            if settled[v] {
                continue;
            }
            let link = index.link(adj.link);
            if link.weight < 0.0 {
                return Err(Error::NegativeWeight {
                    from: index.id(u).to_string(),
                    to: index.id(v).to_string(),
                    weight: link.weight,
                });
            }

            let alt = dist[u] + link.weight;
            if alt < dist[v] {
                dist[v] = alt;
                prev[v] = Some(u);
                seq += 1;
                frontier.offer(v, alt, seq);
                recorder.step(
                    AlgorithmStep::new(format!(
                        "松弛 {} → {}: 距离更新为 {}",
                        index.label(u),
                        index.label(v),
                        format_distance(alt)
                    ))
                    .current_node(index.id(u))
                    .current_link(index.id(u), index.id(v))
                    .distances(distance_table(&index, &dist)),
                );
            }
        }
    }

    let mut result = AlgorithmResult {
        distances: Some(distance_table(&index, &dist)),
        ..Default::default()
    };
    finish_path(&index, &mut recorder, &mut result, &prev, &dist, start, end);
    Ok(recorder.finish(result))
}

/// Bellman-Ford 最短路径
///
/// 进行 |V|-1 轮全边松弛（无更新时提前收敛），再做一轮检测从起点可达的负环。
/// 存在负环时 `hasNegativeCycle = true`，路径与距离视为无效。
pub fn bellman_ford(graph: &Graph, start_id: &str, end_id: Option<&str>) -> Result<AlgorithmResult> {
    let index = GraphIndex::build(graph)?;
    let (start, end) = resolve_endpoints(&index, start_id, end_id)?;
    let mut recorder = StepRecorder::new("bellman_ford");

    // 有向弧 (u, v, w)；无向边拆成两条
    let mut arcs: Vec<(usize, usize, f64)> = Vec::with_capacity(index.link_count() * 2);
    for &i in index.link_indices() {
        if let Some((u, v)) = index.endpoints(i) {
            let w = index.link(i).weight;
            arcs.push((u, v, w));
            if !graph.is_directed {
                arcs.push((v, u, w));
            }
        }
    }

    let n = index.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    dist[start] = 0.0;

    recorder.log(format!("从 {} 开始 Bellman-Ford", index.label(start)));
    recorder.step_and_log(
        AlgorithmStep::new(format!(
            "初始化: d[{}] = 0，其余节点 = ∞",
            index.label(start)
        ))
        .current_node(index.id(start))
        .distances(distance_table(&index, &dist)),
    );

    for round in 1..n.max(1) {
        recorder.log(format!("--- 第 {} 轮 ---", round));
        let mut updated = false;

        for &(u, v, w) in &arcs {
            if !dist[u].is_finite() {
                continue;
            }
            let alt = dist[u] + w;
            if alt < dist[v] {
                dist[v] = alt;
                prev[v] = Some(u);
                updated = true;
                recorder.step_and_log(
                    AlgorithmStep::new(format!(
                        "松弛 {} → {}: {}",
                        index.label(u),
                        index.label(v),
                        format_distance(alt)
                    ))
                    .current_link(index.id(u), index.id(v))
                    .distances(distance_table(&index, &dist)),
                );
            }
        }

        if !updated {
            recorder.step_and_log(
                AlgorithmStep::new(format!("第 {} 轮无更新，算法收敛", round))
                    .distances(distance_table(&index, &dist)),
            );
            break;
        }
    }

    let offending = arcs
        .iter()
        .find(|&&(u, v, w)| dist[u].is_finite() && dist[u] + w + EPSILON < dist[v]);
    if let Some(&(u, v, _)) = offending {
        recorder.step_and_log(
            AlgorithmStep::new(format!(
                "检测到负权环（边 {} → {} 仍可松弛）",
                index.label(u),
                index.label(v)
            ))
            .current_link(index.id(u), index.id(v)),
        );
        return Ok(recorder.finish(AlgorithmResult {
            has_negative_cycle: Some(true),
            ..Default::default()
        }));
    }

    recorder.log("Bellman-Ford 完成");
    let mut result = AlgorithmResult {
        distances: Some(distance_table(&index, &dist)),
        has_negative_cycle: Some(false),
        ..Default::default()
    };
    finish_path(&index, &mut recorder, &mut result, &prev, &dist, start, end);
    Ok(recorder.finish(result))
}
