//! 图遍历
//!
//! BFS 使用 FIFO 队列，DFS 使用显式栈（不递归，避免大图栈溢出）。
//! 邻居按邻接表中边的插入顺序枚举，发现顺序稳定可复现。

use crate::error::Result;
use crate::graph::{Graph, GraphIndex, Link};
use crate::trace::{AlgorithmResult, AlgorithmStep, StepRecorder};
use std::collections::VecDeque;

/// 边界的弹出策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frontier {
    /// 先进先出（广度优先）
    Fifo,
    /// 后进先出（深度优先）
    Lifo,
}

impl Frontier {
    fn algorithm(self) -> &'static str {
        match self {
            Frontier::Fifo => "bfs",
            Frontier::Lifo => "dfs",
        }
    }

    fn container(self) -> &'static str {
        match self {
            Frontier::Fifo => "队列",
            Frontier::Lifo => "栈",
        }
    }
}

/// 广度优先搜索
pub fn bfs(graph: &Graph, start_id: &str) -> Result<AlgorithmResult> {
    traverse(graph, start_id, Frontier::Fifo)
}

/// 深度优先搜索
pub fn dfs(graph: &Graph, start_id: &str) -> Result<AlgorithmResult> {
    traverse(graph, start_id, Frontier::Lifo)
}

/// 通用遍历
///
/// 每个可达节点恰好访问一次：变为"当前"时记录一步，展开完邻居变为"已访问"时再记录一步。
pub fn traverse(graph: &Graph, start_id: &str, frontier: Frontier) -> Result<AlgorithmResult> {
    let index = GraphIndex::build(graph)?;
    let start = index.require_start(start_id)?;
    let mut recorder = StepRecorder::new(frontier.algorithm());

    let n = index.node_count();
    let mut visited = vec![false; n];
    let mut order: Vec<usize> = Vec::new();
    let mut tree: Vec<Link> = Vec::new();
    // (节点, 经由的 (父节点, 边))
    let mut pending: VecDeque<(usize, Option<(usize, usize)>)> = VecDeque::new();
    pending.push_back((start, None));

    let name = match frontier {
        Frontier::Fifo => "广度优先搜索",
        Frontier::Lifo => "深度优先搜索",
    };
    recorder.step(
        AlgorithmStep::new(format!("从 {} 开始{}", index.label(start), name))
            .current_node(index.id(start))
            .visited(Vec::new()),
    );

    loop {
        let next = match frontier {
            Frontier::Fifo => pending.pop_front(),
            Frontier::Lifo => pending.pop_back(),
        };
        let Some((u, via)) = next else {
            break;
        };
        if visited[u] {
            continue;
        }
        visited[u] = true;

        let mut current = AlgorithmStep::new(format!("访问 {}", index.label(u)))
            .current_node(index.id(u))
            .visited(index.ids(&order));
        if let Some((parent, link)) = via {
            current = current.current_link(index.id(parent), index.id(u));
            tree.push(index.link(link).oriented(index.id(parent), index.id(u)));
        }
        recorder.step_and_log(current);
        order.push(u);

        let fresh: Vec<(usize, Option<(usize, usize)>)> = index
            .neighbors(u)
            .iter()
            .filter(|adj| !visited[adj.node])
            .map(|adj| (adj.node, Some((u, adj.link))))
            .collect();
        match frontier {
            Frontier::Fifo => pending.extend(fresh),
            // 逆序压栈，使第一个邻居最先弹出
            Frontier::Lifo => pending.extend(fresh.into_iter().rev()),
        }

        let waiting: Vec<&str> = pending
            .iter()
            .filter(|(node, _)| !visited[*node])
            .map(|(node, _)| index.label(*node))
            .collect();
        recorder.step(
            AlgorithmStep::new(format!(
                "{} 已访问，{}: [{}]",
                index.label(u),
                frontier.container(),
                waiting.join(", ")
            ))
            .visited(index.ids(&order))
            .traversed_edges(tree.clone()),
        );
    }

    recorder.log(format!(
        "遍历完成，共访问 {} / {} 个节点",
        order.len(),
        n
    ));

    Ok(recorder.finish(AlgorithmResult {
        visited: Some(index.ids(&order)),
        ..Default::default()
    }))
}
