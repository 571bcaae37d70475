//! GraphBench - 交互式图算法工作台引擎
//!
//! 对用户编辑的图执行经典算法，并为每次运行生成可回放的步骤轨迹：
//! - 遍历（BFS / DFS）、最短路径（Dijkstra / Bellman-Ford）
//! - 最小生成树（Prim / Kruskal）、最大流（Edmonds-Karp）
//! - 欧拉回路（Fleury / Hierholzer）、二分图判定
//! - 邻接矩阵、邻接表、边列表之间的互相转换

pub mod algorithm;
pub mod cli;
pub mod convert;
pub mod engine;
pub mod error;
pub mod graph;
pub mod import;
pub mod metrics;
pub mod server;
pub mod trace;
pub mod types;

// 重导出常用类型
pub use algorithm::Algorithm;
pub use engine::{AlgorithmRequest, Engine, EngineConfig};
pub use error::{Error, Result};
pub use graph::{Graph, Link, Node};
pub use trace::{AlgorithmResult, AlgorithmStep, StepRecorder};
pub use types::{LinkRef, NodeId, NodeType};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
