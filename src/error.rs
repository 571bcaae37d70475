//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// 图结构不合法（悬空边、重复 ID、非法权重等）
    #[error("输入无效: {0}")]
    InvalidInput(String),

    #[error("起点不存在: {0}")]
    InvalidStart(String),

    /// 最短路径的起点/终点或最大流的源点/汇点不存在
    #[error("端点不存在: start={start}, end={end}")]
    MissingEndpoints { start: String, end: String },

    #[error("Dijkstra 不支持负权边: {from} -> {to} (权重 {weight})")]
    NegativeWeight { from: String, to: String, weight: f64 },

    /// 算法不支持该类型的图（例如有向图上的最小生成树）
    #[error("不支持的图类型: {0}")]
    UnsupportedGraph(String),

    #[error("未找到: {0}")]
    NotFound(String),

    #[error("导入错误: {0}")]
    Import(String),

    #[error("服务器错误: {0}")]
    Server(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(String),
}

impl Error {
    /// 机器可读的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) | Error::UnsupportedGraph(_) => "InvalidInput",
            Error::InvalidStart(_) => "InvalidStart",
            Error::MissingEndpoints { .. } => "MissingEndpoints",
            Error::NegativeWeight { .. } => "NegativeWeightError",
            Error::NotFound(_) => "NotFound",
            Error::Import(_) => "ImportError",
            Error::Server(_) => "ServerError",
            Error::Io(_) => "IoError",
            Error::Serialization(_) => "SerializationError",
        }
    }

    /// 是否属于请求本身不合法（而非内部故障）
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_)
                | Error::UnsupportedGraph(_)
                | Error::InvalidStart(_)
                | Error::MissingEndpoints { .. }
                | Error::NegativeWeight { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Import(e.to_string())
    }
}
