//! 二分图检测
//!
//! 对每个未着色的连通分量做 BFS 二着色，忽略边的方向。
//! 发现同色相邻节点时立即停止，集合取自当时的部分着色。

use crate::error::Result;
use crate::graph::{Graph, GraphIndex};
use crate::trace::{AlgorithmResult, AlgorithmStep, BipartiteSets, StepRecorder};
use std::collections::VecDeque;

const UNCOLORED: u8 = 0;
const COLOR_A: u8 = 1;
const COLOR_B: u8 = 2;

fn partition(index: &GraphIndex<'_>, colors: &[u8]) -> BipartiteSets {
    let mut sets = BipartiteSets::default();
    for (slot, &color) in colors.iter().enumerate() {
        match color {
            COLOR_A => sets.set_a.push(index.id(slot).to_string()),
            COLOR_B => sets.set_b.push(index.id(slot).to_string()),
            _ => {}
        }
    }
    sets
}

fn color_name(color: u8) -> &'static str {
    if color == COLOR_A {
        "A"
    } else {
        "B"
    }
}

/// 二分图检测
pub fn check_bipartite(graph: &Graph) -> Result<AlgorithmResult> {
    let index = GraphIndex::build(graph)?;
    let mut recorder = StepRecorder::new("bipartite");

    let n = index.node_count();
    let mut colors = vec![UNCOLORED; n];
    let mut is_bipartite = true;

    'components: for root in 0..n {
        if colors[root] != UNCOLORED {
            continue;
        }
        colors[root] = COLOR_A;
        recorder.step_and_log(
            AlgorithmStep::new(format!(
                "从 {} 开始着色，放入集合 A",
                index.label(root)
            ))
            .current_node(index.id(root))
            .bipartite_sets(partition(&index, &colors)),
        );

        let mut queue = VecDeque::from([root]);
        while let Some(u) = queue.pop_front() {
            let current = colors[u];
            let next = if current == COLOR_A { COLOR_B } else { COLOR_A };

            let mut newly: Vec<&str> = Vec::new();
            for adj in index.undirected_neighbors(u) {
                let v = adj.node;
                if colors[v] == UNCOLORED {
                    colors[v] = next;
                    newly.push(index.label(v));
                    queue.push_back(v);
                } else if colors[v] == current {
                    is_bipartite = false;
                    recorder.step_and_log(
                        AlgorithmStep::new(format!(
                            "冲突：{} 与 {} 相邻且同属集合 {}，不是二分图",
                            index.label(u),
                            index.label(v),
                            color_name(current)
                        ))
                        .current_node(index.id(u))
                        .current_link(index.id(u), index.id(v))
                        .bipartite_sets(partition(&index, &colors)),
                    );
                    break 'components;
                }
            }

            let message = if newly.is_empty() {
                format!("检查 {} (集合 {})", index.label(u), color_name(current))
            } else {
                format!(
                    "检查 {} (集合 {})，将 [{}] 放入集合 {}",
                    index.label(u),
                    color_name(current),
                    newly.join(", "),
                    color_name(next)
                )
            };
            recorder.step(
                AlgorithmStep::new(message)
                    .current_node(index.id(u))
                    .bipartite_sets(partition(&index, &colors)),
            );
        }
    }

    let sets = partition(&index, &colors);
    if is_bipartite {
        recorder.log(format!(
            "是二分图：集合 A {} 个节点，集合 B {} 个节点",
            sets.set_a.len(),
            sets.set_b.len()
        ));
    }

    Ok(recorder.finish(AlgorithmResult {
        is_bipartite: Some(is_bipartite),
        bipartite_sets: Some(sets),
        ..Default::default()
    }))
}
