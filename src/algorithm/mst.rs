//! 最小生成树
//!
//! Prim（优先队列扩展边界）与 Kruskal（排序 + 并查集）。
//! 非连通图得到最小生成森林，`mstLinks` 覆盖所有连通分量。

use super::frontier::MinFrontier;
use super::union_find::UnionFind;
use crate::error::{Error, Result};
use crate::graph::{Graph, GraphIndex, Link};
use crate::trace::{AlgorithmResult, AlgorithmStep, StepRecorder};

fn require_undirected(graph: &Graph, algorithm: &str) -> Result<()> {
    if graph.is_directed {
        return Err(Error::UnsupportedGraph(format!(
            "{} 只适用于无向图",
            algorithm
        )));
    }
    Ok(())
}

/// Prim 最小生成树
///
/// 从第一个节点出发；每个树外节点只保留一条最优横切边，
/// 权重相同时取插入顺序靠前的边。边界耗尽后从下一个未覆盖节点重新开始。
pub fn prim(graph: &Graph) -> Result<AlgorithmResult> {
    require_undirected(graph, "Prim")?;
    let index = GraphIndex::build(graph)?;
    let mut recorder = StepRecorder::new("prim");

    let n = index.node_count();
    let mut in_tree = vec![false; n];
    // 树外节点 -> (树内端点, 边下标)
    let mut best: Vec<Option<(usize, usize)>> = vec![None; n];
    let mut mst: Vec<Link> = Vec::new();
    let mut trees = 0;

    for root in 0..n {
        if in_tree[root] {
            continue;
        }
        trees += 1;
        if trees == 1 {
            recorder.log(format!("从 {} 开始构建最小生成树", index.label(root)));
        } else {
            recorder.log(format!(
                "图不连通，从 {} 开始新的生成树",
                index.label(root)
            ));
        }

        let mut frontier = MinFrontier::new();
        frontier.offer(root, 0.0, 0);

        while let Some((u, _)) = frontier.pop() {
            in_tree[u] = true;
            match best[u] {
                None => {
                    recorder.step(
                        AlgorithmStep::new(format!("将 {} 加入树", index.label(u)))
                            .current_node(index.id(u))
                            .mst_links(mst.clone()),
                    );
                }
                Some((from, link)) => {
                    let edge = index.link(link);
                    mst.push(edge.oriented(index.id(from), index.id(u)));
                    recorder.step_and_log(
                        AlgorithmStep::new(format!(
                            "选择边 {} - {} (权重 {})",
                            index.label(from),
                            index.label(u),
                            edge.weight
                        ))
                        .current_node(index.id(u))
                        .current_link(index.id(from), index.id(u))
                        .mst_links(mst.clone()),
                    );
                }
            }

            for adj in index.neighbors(u) {
                let v = adj.node;
                if in_tree[v] {
                    continue;
                }
                let weight = index.link(adj.link).weight;
                if frontier.offer(v, weight, adj.link) {
                    best[v] = Some((u, adj.link));
                }
            }
        }
    }

    let weight: f64 = mst.iter().map(|l| l.weight).sum();
    if trees > 1 {
        recorder.log(format!(
            "最小生成森林完成：{} 个连通分量，{} 条边，总权重 {}",
            trees,
            mst.len(),
            weight
        ));
    } else {
        recorder.log(format!(
            "最小生成树完成：{} 条边，总权重 {}",
            mst.len(),
            weight
        ));
    }

    Ok(recorder.finish(AlgorithmResult {
        mst_links: Some(mst),
        ..Default::default()
    }))
}

/// Kruskal 最小生成树
///
/// 按权重稳定排序（同权保持原顺序），用并查集跳过成环的边。
pub fn kruskal(graph: &Graph) -> Result<AlgorithmResult> {
    require_undirected(graph, "Kruskal")?;
    let index = GraphIndex::build(graph)?;
    let mut recorder = StepRecorder::new("kruskal");

    let n = index.node_count();
    let mut order: Vec<usize> = index.link_indices().to_vec();
    order.sort_by(|&a, &b| index.link(a).weight.total_cmp(&index.link(b).weight));
    recorder.log(format!("按权重排序 {} 条边", order.len()));

    let mut uf = UnionFind::new(n);
    let mut mst: Vec<Link> = Vec::new();

    for &i in &order {
        if n > 0 && mst.len() == n - 1 {
            break;
        }
        let Some((u, v)) = index.endpoints(i) else {
            continue;
        };
        let link = index.link(i);

        if uf.union(u, v) {
            mst.push(link.clone());
            recorder.step_and_log(
                AlgorithmStep::new(format!(
                    "加入边 {} - {} (权重 {})",
                    index.label(u),
                    index.label(v),
                    link.weight
                ))
                .current_link(index.id(u), index.id(v))
                .mst_links(mst.clone()),
            );
        } else {
            recorder.step_and_log(
                AlgorithmStep::new(format!(
                    "跳过边 {} - {}：会形成环",
                    index.label(u),
                    index.label(v)
                ))
                .current_link(index.id(u), index.id(v))
                .mst_links(mst.clone()),
            );
        }
    }

    let weight: f64 = mst.iter().map(|l| l.weight).sum();
    recorder.log(format!(
        "完成：{} 条边，总权重 {}，{} 个连通分量",
        mst.len(),
        weight,
        uf.components()
    ));

    Ok(recorder.finish(AlgorithmResult {
        mst_links: Some(mst),
        ..Default::default()
    }))
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
    fn test_kruskal_triangle() {
        let result = kruskal(&triangle()).unwrap();
        let links = result.mst_links.clone().unwrap();
        assert_eq!(links.len(), 2);
        assert!(links[0].connects("A", "B", false));
        assert!(links[1].connects("B", "C", false));
        assert_eq!(result.mst_weight(), Some(3.0));
    }

    #[test]
    fn test_prim_triangle() {
        let result = prim(&triangle()).unwrap();
        assert_eq!(result.mst_weight(), Some(3.0));
        let last = result.steps.last().unwrap();
        assert_eq!(last.mst_links.as_ref().unwrap().len(), 2);
        assert!(last.current_link_id.is_some());
    }

    #[test]
    fn test_kruskal_skips_cycle_edge() {
        let graph = triangle().with_link("A", "C", 0.5).with_link("B", "C", 0.5);
        let result = kruskal(&graph).unwrap();
        assert_eq!(result.mst_weight(), Some(1.0));
        let skipped = result.logs.iter().filter(|l| l.contains("跳过")).count();
        assert_eq!(skipped, 0);

        let square = Graph::undirected()
            .with_nodes(["A", "B", "C", "D"])
            .with_link("A", "B", 1.0)
            .with_link("B", "C", 1.0)
            .with_link("A", "C", 1.0)
            .with_link("C", "D", 5.0);
        let result = kruskal(&square).unwrap();
        let skipped = result.logs.iter().filter(|l| l.contains("跳过")).count();
        assert_eq!(skipped, 1);
        assert_eq!(result.mst_weight(), Some(7.0));
    }

    #[test]
    fn test_forest_on_disconnected_graph() {
        let graph = Graph::undirected()
            .with_nodes(["A", "B", "C", "D", "E"])
            .with_link("A", "B", 2.0)
            .with_link("C", "D", 3.0)
            .with_link("D", "E", 1.0);

        let k = kruskal(&graph).unwrap();
        let p = prim(&graph).unwrap();
        assert_eq!(k.mst_links.as_ref().unwrap().len(), 3);
        assert_eq!(p.mst_links.as_ref().unwrap().len(), 3);
        assert_eq!(k.mst_weight(), Some(6.0));
        assert_eq!(p.mst_weight(), Some(6.0));
        assert!(p.logs.iter().any(|l| l.contains("不连通")));
    }

    #[test]
    fn test_prim_tie_prefers_earlier_link() {
        let graph = Graph::undirected()
            .with_nodes(["A", "B", "C"])
            .with_link("A", "C", 1.0)
            .with_link("A", "B", 1.0)
            .with_link("B", "C", 1.0);
        let result = prim(&graph).unwrap();
        let links = result.mst_links.unwrap();
        assert_eq!(links[0].target, "C");
        assert_eq!(links[1].target, "B");
    }

    #[test]
    fn test_directed_rejected() {
        let graph = Graph::directed()
            .with_nodes(["A", "B"])
            .with_link("A", "B", 1.0);
        assert_eq!(prim(&graph).unwrap_err().kind(), "InvalidInput");
        assert_eq!(kruskal(&graph).unwrap_err().kind(), "InvalidInput");
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::undirected();
        assert_eq!(prim(&graph).unwrap().mst_links, Some(Vec::new()));
        assert_eq!(kruskal(&graph).unwrap().mst_links, Some(Vec::new()));
    }
}
