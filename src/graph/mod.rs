//! 图核心模块
//!
//! 定义节点、边、图快照与算法使用的稠密索引

mod graph;
mod index;
mod link;
mod node;

pub use graph::Graph;
pub use index::{Adjacent, GraphIndex};
pub use link::Link;
pub use node::Node;

pub(crate) use node::grid_position;
