//! 性能指标收集模块
//!
//! 按算法统计运行次数、失败次数、耗时与记录的步骤数，支持 Prometheus 导出

use crate::algorithm::Algorithm;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 系统全局指标
#[derive(Debug)]
pub struct Metrics {
    /// 按 `Algorithm::ALL` 的顺序排列
    algorithms: Vec<AlgorithmStats>,
    /// 表示形式转换统计
    conversions: ConversionStats,
    /// 启动时间
    start_time: Instant,
}

/// 单个算法的统计
#[derive(Debug, Default)]
struct AlgorithmStats {
    runs: AtomicU64,
    failures: AtomicU64,
    total_duration_us: AtomicU64,
    steps: AtomicU64,
}

#[derive(Debug, Default)]
struct ConversionStats {
    conversions: AtomicU64,
    failed_conversions: AtomicU64,
}

/// 单个算法的指标快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmSnapshot {
    pub algorithm: String,
    pub runs: u64,
    pub failures: u64,
    pub avg_duration_ms: f64,
    pub steps: u64,
}

/// 可导出的指标快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub algorithms: Vec<AlgorithmSnapshot>,
    pub total_runs: u64,
    pub total_failures: u64,
    pub conversions: u64,
    pub failed_conversions: u64,
    pub uptime_seconds: u64,
}

/// Prometheus 格式指标
#[derive(Debug, Clone)]
pub struct PrometheusMetrics {
    pub content: String,
}

impl Metrics {
    /// 创建新的指标收集器
    pub fn new() -> Self {
        Self {
            algorithms: Algorithm::ALL.iter().map(|_| AlgorithmStats::default()).collect(),
            conversions: ConversionStats::default(),
            start_time: Instant::now(),
        }
    }

    fn stats(&self, algorithm: Algorithm) -> &AlgorithmStats {
        &self.algorithms[algorithm as usize]
    }

    /// 记录算法开始
    pub fn record_run_start(&self, algorithm: Algorithm) -> RunTimer {
        self.stats(algorithm).runs.fetch_add(1, Ordering::Relaxed);
        RunTimer::new(algorithm)
    }

    /// 记录算法完成；失败时 `steps` 为 None
    pub fn record_run_complete(&self, timer: RunTimer, steps: Option<usize>) {
        let stats = self.stats(timer.algorithm);
        stats
            .total_duration_us
            .fetch_add(timer.elapsed().as_micros() as u64, Ordering::Relaxed);
        match steps {
            Some(n) => {
                stats.steps.fetch_add(n as u64, Ordering::Relaxed);
            }
            None => {
                stats.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// 记录一次表示形式转换
    pub fn record_conversion(&self, success: bool) {
        self.conversions.conversions.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.conversions
                .failed_conversions
                .fetch_add(1, Ordering::Relaxed);
        }
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        let algorithms: Vec<AlgorithmSnapshot> = Algorithm::ALL
            .iter()
            .map(|&algorithm| {
                let stats = self.stats(algorithm);
                let runs = stats.runs.load(Ordering::Relaxed);
                let total_us = stats.total_duration_us.load(Ordering::Relaxed);
                AlgorithmSnapshot {
                    algorithm: algorithm.name().to_string(),
                    runs,
                    failures: stats.failures.load(Ordering::Relaxed),
                    avg_duration_ms: if runs > 0 {
                        (total_us as f64) / (runs as f64) / 1000.0
                    } else {
                        0.0
                    },
                    steps: stats.steps.load(Ordering::Relaxed),
                }
            })
            .collect();

        MetricsSnapshot {
            total_runs: algorithms.iter().map(|a| a.runs).sum(),
            total_failures: algorithms.iter().map(|a| a.failures).sum(),
            algorithms,
            conversions: self.conversions.conversions.load(Ordering::Relaxed),
            failed_conversions: self.conversions.failed_conversions.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// 导出为 Prometheus 格式
    pub fn to_prometheus(&self) -> PrometheusMetrics {
        let snapshot = self.snapshot();
        let mut content = String::new();

        let families: [(&str, &str, &str, fn(&AlgorithmSnapshot) -> String); 4] = [
            (
                "graphbench_algorithm_runs_total",
                "Number of algorithm runs",
                "counter",
                |a: &AlgorithmSnapshot| a.runs.to_string(),
            ),
            (
                "graphbench_algorithm_failures_total",
                "Number of rejected algorithm runs",
                "counter",
                |a: &AlgorithmSnapshot| a.failures.to_string(),
            ),
            (
                "graphbench_algorithm_duration_avg_ms",
                "Average algorithm duration in milliseconds",
                "gauge",
                |a: &AlgorithmSnapshot| format!("{:.3}", a.avg_duration_ms),
            ),
            (
                "graphbench_algorithm_steps_total",
                "Number of recorded trace steps",
                "counter",
                |a: &AlgorithmSnapshot| a.steps.to_string(),
            ),
        ];

        for (name, help, kind, value) in families {
            let _ = writeln!(content, "# HELP {} {}", name, help);
            let _ = writeln!(content, "# TYPE {} {}", name, kind);
            for algorithm in &snapshot.algorithms {
                let _ = writeln!(
                    content,
                    "{}{{algorithm=\"{}\"}} {}",
                    name,
                    algorithm.algorithm,
                    value(algorithm)
                );
            }
        }

        content.push_str("# HELP graphbench_conversions_total Representation conversions\n");
        content.push_str("# TYPE graphbench_conversions_total counter\n");
        let _ = writeln!(content, "graphbench_conversions_total {}", snapshot.conversions);

        content.push_str(
            "# HELP graphbench_conversions_failed_total Rejected representation conversions\n",
        );
        content.push_str("# TYPE graphbench_conversions_failed_total counter\n");
        let _ = writeln!(
            content,
            "graphbench_conversions_failed_total {}",
            snapshot.failed_conversions
        );

        content.push_str("# HELP graphbench_uptime_seconds Uptime in seconds\n");
        content.push_str("# TYPE graphbench_uptime_seconds counter\n");
        let _ = writeln!(content, "graphbench_uptime_seconds {}", snapshot.uptime_seconds);

        PrometheusMetrics { content }
    }

    /// 重置所有指标
    pub fn reset(&self) {
        for stats in &self.algorithms {
            stats.runs.store(0, Ordering::Relaxed);
            stats.failures.store(0, Ordering::Relaxed);
            stats.total_duration_us.store(0, Ordering::Relaxed);
            stats.steps.store(0, Ordering::Relaxed);
        }
        self.conversions.conversions.store(0, Ordering::Relaxed);
        self.conversions.failed_conversions.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// 算法计时器
pub struct RunTimer {
    algorithm: Algorithm,
    start: Instant,
}

impl RunTimer {
    fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// 全局指标实例
static METRICS: once_cell::sync::Lazy<Arc<Metrics>> =
    once_cell::sync::Lazy::new(|| Arc::new(Metrics::new()));

/// 获取全局指标实例
pub fn global_metrics() -> Arc<Metrics> {
    METRICS.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot() {
        let metrics = Metrics::new();

        let timer = metrics.record_run_start(Algorithm::Dijkstra);
        std::thread::sleep(Duration::from_millis(10));
        metrics.record_run_complete(timer, Some(12));

        let timer = metrics.record_run_start(Algorithm::Dijkstra);
        metrics.record_run_complete(timer, None);
        metrics.record_conversion(true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_runs, 2);
        assert_eq!(snapshot.total_failures, 1);
        assert_eq!(snapshot.conversions, 1);

        let dijkstra = snapshot
            .algorithms
            .iter()
            .find(|a| a.algorithm == "dijkstra")
            .unwrap();
        assert_eq!(dijkstra.steps, 12);
        assert!(dijkstra.avg_duration_ms >= 5.0);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = Metrics::new();
        let timer = metrics.record_run_start(Algorithm::Bfs);
        metrics.record_run_complete(timer, Some(3));

        let prom = metrics.to_prometheus();
        assert!(prom
            .content
            .contains("graphbench_algorithm_runs_total{algorithm=\"bfs\"} 1"));
        assert!(prom.content.contains("graphbench_conversions_total 0"));
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();
        let timer = metrics.record_run_start(Algorithm::Prim);
        metrics.record_run_complete(timer, Some(1));
        metrics.reset();
        assert_eq!(metrics.snapshot().total_runs, 0);
    }
}
