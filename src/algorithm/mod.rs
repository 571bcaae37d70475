//! 图算法模块
//!
//! 每个算法都是独立的纯函数：`&Graph` -> `AlgorithmResult`，
//! 按 [`Algorithm`] 标签分发。

mod bipartite;
mod euler;
mod frontier;
mod max_flow;
mod mst;
mod shortest_path;
mod traversal;
mod union_find;

pub use bipartite::check_bipartite;
pub use euler::{fleury, hierholzer};
pub use max_flow::{ford_fulkerson, EdmondsKarp};
pub use mst::{kruskal, prim};
pub use shortest_path::{bellman_ford, dijkstra};
pub use traversal::{bfs, dfs, traverse, Frontier};
pub use union_find::UnionFind;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 算法标签（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Algorithm {
    Bfs,
    Dfs,
    Dijkstra,
    BellmanFord,
    Prim,
    Kruskal,
    FordFulkerson,
    Fleury,
    Hierholzer,
    Bipartite,
}

impl Algorithm {
    pub const ALL: [Algorithm; 10] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Dijkstra,
        Algorithm::BellmanFord,
        Algorithm::Prim,
        Algorithm::Kruskal,
        Algorithm::FordFulkerson,
        Algorithm::Fleury,
        Algorithm::Hierholzer,
        Algorithm::Bipartite,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::BellmanFord => "bellman_ford",
            Algorithm::Prim => "prim",
            Algorithm::Kruskal => "kruskal",
            Algorithm::FordFulkerson => "ford_fulkerson",
            Algorithm::Fleury => "fleury",
            Algorithm::Hierholzer => "hierholzer",
            Algorithm::Bipartite => "bipartite",
        }
    }

    /// 是否需要起点（最大流中为源点）
    pub fn needs_start(&self) -> bool {
        matches!(
            self,
            Algorithm::Bfs
                | Algorithm::Dfs
                | Algorithm::Dijkstra
                | Algorithm::BellmanFord
                | Algorithm::FordFulkerson
        )
    }

    /// 是否必须给出终点（最大流的汇点）；最短路径的终点可选
    pub fn needs_end(&self) -> bool {
        matches!(self, Algorithm::FordFulkerson)
    }

    pub fn accepts_end(&self) -> bool {
        matches!(
            self,
            Algorithm::Dijkstra | Algorithm::BellmanFord | Algorithm::FordFulkerson
        )
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let algorithm = match normalized.as_str() {
            "bfs" => Algorithm::Bfs,
            "dfs" => Algorithm::Dfs,
            "dijkstra" => Algorithm::Dijkstra,
            "bellman_ford" | "bellmanford" => Algorithm::BellmanFord,
            "prim" => Algorithm::Prim,
            "kruskal" => Algorithm::Kruskal,
            "ford_fulkerson" | "edmonds_karp" | "maxflow" | "max_flow" => {
                Algorithm::FordFulkerson
            }
            "fleury" => Algorithm::Fleury,
            "hierholzer" => Algorithm::Hierholzer,
            "bipartite" | "check_bipartite" => Algorithm::Bipartite,
            _ => return Err(Error::InvalidInput(format!("未知算法: {}", s))),
        };
        Ok(algorithm)
    }
}

impl TryFrom<String> for Algorithm {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
