//! HTTP 服务器模块
//!
//! 薄封装：把请求体中的图快照交给引擎，结果原样返回。
//! 路由与前端约定一致（`/bfs`、`/dijkstra`、`/to_matrix` ...）。

use crate::algorithm::Algorithm;
use crate::convert::{self, AdjacencyEntry};
use crate::engine::{AlgorithmRequest, Engine, EngineConfig};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::import;
use crate::metrics;
use crate::trace::AlgorithmResult;
use crate::types::NodeId;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, MethodRouter},
    Router,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `/save` 与 `/load` 使用的文件
    pub save_path: PathBuf,
    pub strict_links: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            save_path: PathBuf::from("graph.json"),
            strict_links: false,
        }
    }
}

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub save_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            engine: Arc::new(Engine::new(EngineConfig {
                strict_links: config.strict_links,
            })),
            save_path: Arc::new(config.save_path.clone()),
        }
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 指标
        .route("/metrics", get(metrics_handler))
        // 通用入口：算法在请求体中
        .route("/run", post(run_handler))
        // 表示形式转换
        .route("/to_matrix", post(to_matrix))
        .route("/to_adj_list", post(to_adj_list))
        .route("/to_edge_list", post(to_edge_list))
        .route("/from_matrix", post(from_matrix))
        .route("/from_adj_list", post(from_adj_list))
        .route("/from_edge_list", post(from_edge_list))
        // 保存与加载
        .route("/save", post(save_graph))
        .route("/load", get(load_graph));

    // 每个算法一个端点
    for algorithm in Algorithm::ALL {
        app = app.route(&format!("/{}", algorithm.name()), algorithm_route(algorithm));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 启动服务器
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let app = router(AppState::new(&config));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Server(format!("绑定地址失败: {}", e)))?;
    tracing::info!("GraphBench 服务器启动于 http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Server(format!("服务器错误: {}", e)))?;

    Ok(())
}

// ==================== 请求体 ====================

/// 算法端点的请求体
///
/// 既接受 `{graph, start_id, end_id}`，也接受直接传入的图。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AlgoInput {
    Wrapped {
        graph: Graph,
        #[serde(default, alias = "startId")]
        start_id: Option<String>,
        #[serde(default, alias = "endId")]
        end_id: Option<String>,
    },
    Bare(Graph),
}

impl AlgoInput {
    fn into_request(self, algorithm: Algorithm) -> AlgorithmRequest {
        match self {
            AlgoInput::Wrapped {
                graph,
                start_id,
                end_id,
            } => AlgorithmRequest {
                algorithm,
                graph,
                start_id,
                end_id,
            },
            AlgoInput::Bare(graph) => AlgorithmRequest::new(algorithm, graph),
        }
    }
}

/// 转换端点的请求体
#[derive(Debug, Deserialize)]
pub struct ConvertInput {
    pub data: serde_json::Value,
    #[serde(default, alias = "isDirected")]
    pub is_directed: bool,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

// ==================== 响应 ====================

/// API 响应
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            kind: None,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            kind: Some(err.kind().to_string()),
            error: Some(err.to_string()),
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// 错误响应：请求不合法返回 400，没有已保存的图返回 404
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            e if e.is_rejection() => StatusCode::BAD_REQUEST,
            Error::Serialization(_) | Error::Import(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ApiResponse::error(&self.0))).into_response()
    }
}

type ApiResult<T> = std::result::Result<ApiResponse<T>, ApiError>;

// ==================== 处理器 ====================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Prometheus 格式指标
async fn metrics_handler() -> Response {
    let prom = metrics::global_metrics().to_prometheus();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        prom.content,
    )
        .into_response()
}

fn algorithm_route(algorithm: Algorithm) -> MethodRouter<AppState> {
    post(
        move |State(state): State<AppState>, Json(input): Json<AlgoInput>| async move {
            run_algorithm(&state, input.into_request(algorithm)).await
        },
    )
}

async fn run_handler(
    State(state): State<AppState>,
    Json(request): Json<AlgorithmRequest>,
) -> ApiResult<AlgorithmResult> {
    run_algorithm(&state, request).await
}

/// 算法在阻塞线程池中执行，不占用异步工作线程
async fn run_algorithm(
    state: &AppState,
    request: AlgorithmRequest,
) -> ApiResult<AlgorithmResult> {
    let engine = Arc::clone(&state.engine);
    let result = tokio::task::spawn_blocking(move || engine.run(&request))
        .await
        .map_err(|e| Error::Server(format!("算法任务异常终止: {}", e)))??;
    Ok(ApiResponse::success(result))
}

/// 记录转换指标
fn converted<T>(outcome: Result<T>) -> ApiResult<T>
where
    T: Serialize,
{
    metrics::global_metrics().record_conversion(outcome.is_ok());
    Ok(ApiResponse::success(outcome?))
}

#[derive(Serialize)]
struct MatrixOutput {
    matrix: convert::AdjacencyMatrix,
}

#[derive(Serialize)]
struct AdjListOutput {
    adj_list: convert::AdjacencyList,
}

#[derive(Serialize)]
struct EdgeListOutput {
    edge_list: convert::EdgeList,
}

async fn to_matrix(Json(graph): Json<Graph>) -> ApiResult<MatrixOutput> {
    converted(convert::to_matrix(&graph).map(|matrix| MatrixOutput { matrix }))
}

async fn to_adj_list(Json(graph): Json<Graph>) -> ApiResult<AdjListOutput> {
    converted(convert::to_adj_list(&graph).map(|adj_list| AdjListOutput { adj_list }))
}

async fn to_edge_list(Json(graph): Json<Graph>) -> ApiResult<EdgeListOutput> {
    converted(convert::to_edge_list(&graph).map(|edge_list| EdgeListOutput { edge_list }))
}

fn parse_data<T: serde::de::DeserializeOwned>(data: serde_json::Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| Error::InvalidInput(format!("数据格式错误: {}", e)))
}

async fn from_matrix(Json(input): Json<ConvertInput>) -> ApiResult<Graph> {
    converted(parse_data::<Vec<Vec<f64>>>(input.data).and_then(|matrix| {
        convert::from_matrix(&matrix, input.is_directed, input.labels.as_deref())
    }))
}

async fn from_adj_list(Json(input): Json<ConvertInput>) -> ApiResult<Graph> {
    converted(
        parse_data::<IndexMap<NodeId, Vec<AdjacencyEntry>>>(input.data).and_then(|list| {
            convert::from_adj_list(&list, input.is_directed, input.labels.as_deref())
        }),
    )
}

async fn from_edge_list(Json(input): Json<ConvertInput>) -> ApiResult<Graph> {
    converted(
        parse_data::<Vec<(NodeId, NodeId, f64)>>(input.data).and_then(|edges| {
            convert::from_edge_list(&edges, input.is_directed, input.labels.as_deref())
        }),
    )
}

#[derive(Serialize)]
struct SaveStatus {
    status: &'static str,
}

async fn save_graph(
    State(state): State<AppState>,
    Json(graph): Json<Graph>,
) -> ApiResult<SaveStatus> {
    graph.validate(false)?;
    import::save_graph_async(&graph, state.save_path.as_path()).await?;
    tracing::info!(path = %state.save_path.display(), "图已保存");
    Ok(ApiResponse::success(SaveStatus {
        status: "Graph saved successfully",
    }))
}

async fn load_graph(State(state): State<AppState>) -> ApiResult<Graph> {
    let graph = import::load_graph_async(state.save_path.as_path()).await?;
    Ok(ApiResponse::success(graph))
}
