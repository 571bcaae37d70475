//! 结果打印器
//!
//! 把图、各种表示形式和算法步骤格式化为表格

use crate::convert::{AdjacencyList, AdjacencyMatrix, EdgeList};
use crate::graph::{Graph, Link};
use crate::trace::{AlgorithmResult, AlgorithmStep};
use prettytable::{format, row, Cell, Row, Table};

/// 打印模式
#[derive(Clone, Copy, PartialEq)]
pub enum PrintMode {
    /// 表格模式
    Table,
    /// 垂直模式
    Vertical,
}

/// 结果打印器
pub struct Printer {
    mode: PrintMode,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(PrintMode::Table)
    }
}

fn join_ids(ids: &[String]) -> String {
    ids.join(" → ")
}

fn format_links(links: &[Link]) -> String {
    links
        .iter()
        .map(|l| format!("{}-{}({})", l.source, l.target, l.weight))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.3}", value)
    }
}

impl Printer {
    pub fn new(mode: PrintMode) -> Self {
        Self { mode }
    }

    /// 设置打印模式
    pub fn set_mode(&mut self, mode: PrintMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> PrintMode {
        self.mode
    }

    /// 按当前模式输出行数据
    pub fn print_rows(&self, columns: &[String], rows: &[Vec<String>]) -> String {
        if columns.is_empty() || rows.is_empty() {
            return "Empty set\n".to_string();
        }
        match self.mode {
            PrintMode::Table => self.format_table(columns, rows),
            PrintMode::Vertical => self.format_vertical(columns, rows),
        }
    }

    /// 表格格式
    fn format_table(&self, columns: &[String], rows: &[Vec<String>]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        let header: Vec<Cell> = columns.iter().map(|c| Cell::new(c)).collect();
        table.set_titles(Row::new(header));

        for row_data in rows {
            let cells: Vec<Cell> = row_data.iter().map(|v| Cell::new(v)).collect();
            table.add_row(Row::new(cells));
        }

        table.to_string()
    }

    /// 垂直格式
    fn format_vertical(&self, columns: &[String], rows: &[Vec<String>]) -> String {
        let max_col_width = columns.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        let mut output = String::new();

        for (i, row_data) in rows.iter().enumerate() {
            output.push_str(&format!(
                "*************************** {}. row ***************************\n",
                i + 1
            ));

            for (j, col) in columns.iter().enumerate() {
                let value = row_data.get(j).map(|s| s.as_str()).unwrap_or("");
                output.push_str(&format!("{:>width$}: {}\n", col, value, width = max_col_width));
            }
        }

        output
    }

    /// 图概况
    pub fn print_graph_info(&self, graph: &Graph) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Property", "Value"]);
        table.add_row(row!["Directed", graph.is_directed.to_string()]);
        table.add_row(row!["Node Count", graph.node_count().to_string()]);
        table.add_row(row!["Link Count", graph.link_count().to_string()]);
        table.add_row(row!["Total Weight", format_number(graph.total_weight())]);
        let dangling = graph.dangling_links().len();
        if dangling > 0 {
            table.add_row(row!["Dangling Links", dangling.to_string()]);
        }
        table.to_string()
    }

    /// 邻接矩阵，行列标题为节点显示名
    pub fn print_matrix(&self, graph: &Graph, matrix: &AdjacencyMatrix) -> String {
        let mut columns = vec![String::new()];
        columns.extend(graph.nodes.iter().map(|n| n.display_name().to_string()));
        let rows: Vec<Vec<String>> = graph
            .nodes
            .iter()
            .zip(matrix)
            .map(|(node, values)| {
                let mut row = vec![node.display_name().to_string()];
                row.extend(values.iter().map(|&v| format_number(v)));
                row
            })
            .collect();
        self.print_rows(&columns, &rows)
    }

    pub fn print_adj_list(&self, list: &AdjacencyList) -> String {
        let columns = vec!["Node".to_string(), "Neighbors".to_string()];
        let rows: Vec<Vec<String>> = list
            .iter()
            .map(|(node, neighbors)| vec![node.clone(), neighbors.join(", ")])
            .collect();
        self.print_rows(&columns, &rows)
    }

    pub fn print_edge_list(&self, edges: &EdgeList) -> String {
        let columns = vec![
            "Source".to_string(),
            "Target".to_string(),
            "Weight".to_string(),
        ];
        let rows: Vec<Vec<String>> = edges
            .iter()
            .map(|(u, v, w)| vec![u.clone(), v.clone(), format_number(*w)])
            .collect();
        self.print_rows(&columns, &rows)
    }

    /// 单个步骤的详细内容
    pub fn print_step(&self, index: usize, total: usize, step: &AlgorithmStep) -> String {
        let mut rows: Vec<Vec<String>> = Vec::new();
        if let Some(id) = &step.current_node_id {
            rows.push(vec!["Current Node".into(), id.clone()]);
        }
        if let Some(link) = &step.current_link_id {
            rows.push(vec!["Current Link".into(), link.to_string()]);
        }
        if let Some(visited) = &step.visited {
            rows.push(vec!["Visited".into(), visited.join(", ")]);
        }
        if let Some(path) = &step.path {
            rows.push(vec!["Path".into(), join_ids(path)]);
        }
        if let Some(links) = &step.mst_links {
            rows.push(vec!["MST Links".into(), format_links(links)]);
        }
        if let Some(links) = &step.traversed_edges {
            rows.push(vec!["Traversed".into(), format_links(links)]);
        }
        if let Some(flow) = &step.flow_details {
            let text = flow
                .iter()
                .map(|(k, v)| format!("{}={}", k, format_number(*v)))
                .collect::<Vec<_>>()
                .join(", ");
            rows.push(vec!["Flow".into(), text]);
        }
        if let Some(sets) = &step.bipartite_sets {
            rows.push(vec!["Set A".into(), sets.set_a.join(", ")]);
            rows.push(vec!["Set B".into(), sets.set_b.join(", ")]);
        }
        if let Some(distances) = &step.distances {
            let text = distances
                .iter()
                .map(|(k, v)| match v {
                    Some(d) => format!("{}={}", k, format_number(*d)),
                    None => format!("{}=∞", k),
                })
                .collect::<Vec<_>>()
                .join(", ");
            rows.push(vec!["Distances".into(), text]);
        }

        let mut output = format!("[{}/{}] {}\n", index + 1, total, step.log);
        if !rows.is_empty() {
            let columns = vec!["Field".to_string(), "Value".to_string()];
            output.push_str(&self.print_rows(&columns, &rows));
        }
        output
    }

    /// 步骤列表（只含日志）
    pub fn print_step_list(&self, result: &AlgorithmResult) -> String {
        let columns = vec!["#".to_string(), "Log".to_string()];
        let rows: Vec<Vec<String>> = result
            .steps
            .iter()
            .enumerate()
            .map(|(i, s)| vec![(i + 1).to_string(), s.log.clone()])
            .collect();
        self.print_rows(&columns, &rows)
    }

    /// 最终结果中已填充的字段
    pub fn print_result(&self, result: &AlgorithmResult) -> String {
        let mut rows: Vec<Vec<String>> = Vec::new();
        if let Some(visited) = &result.visited {
            rows.push(vec!["Visited".into(), visited.join(", ")]);
        }
        if let Some(path) = &result.path {
            let text = if path.is_empty() {
                "(unreachable)".to_string()
            } else {
                join_ids(path)
            };
            rows.push(vec!["Path".into(), text]);
        }
        if let Some(d) = result.distance {
            rows.push(vec!["Distance".into(), format_number(d)]);
        }
        if let Some(neg) = result.has_negative_cycle {
            rows.push(vec!["Negative Cycle".into(), neg.to_string()]);
        }
        if let Some(links) = &result.mst_links {
            rows.push(vec!["MST Links".into(), format_links(links)]);
            if let Some(w) = result.mst_weight() {
                rows.push(vec!["MST Weight".into(), format_number(w)]);
            }
        }
        if let Some(flow) = result.max_flow {
            rows.push(vec!["Max Flow".into(), format_number(flow)]);
        }
        if let Some(cut) = &result.min_cut {
            rows.push(vec!["Min Cut".into(), format_links(cut)]);
        }
        if let Some(euler) = &result.euler_path {
            let text = match euler {
                Some(path) => join_ids(path),
                None => "(none)".to_string(),
            };
            rows.push(vec!["Euler Circuit".into(), text]);
        }
        if let Some(b) = result.is_bipartite {
            rows.push(vec!["Bipartite".into(), b.to_string()]);
        }
        if let Some(sets) = &result.bipartite_sets {
            rows.push(vec!["Set A".into(), sets.set_a.join(", ")]);
            rows.push(vec!["Set B".into(), sets.set_b.join(", ")]);
        }
        rows.push(vec!["Steps".into(), result.step_count().to_string()]);

        let columns = vec!["Field".to_string(), "Value".to_string()];
        self.print_rows(&columns, &rows)
    }

    /// 打印帮助信息
    pub fn print_help() -> String {
        r#"
═══════════════════════════════════════════════════════════════
                   GraphBench CLI 命令帮助
═══════════════════════════════════════════════════════════════

图文件:
  load <file.json>          读取图 JSON
  save <file.json>          保存当前图
  import <file.csv> [directed]
                            从 CSV 边列表导入 (source,target,weight[,capacity])
  info                      显示图概况
  show matrix|adj|edges     以邻接矩阵 / 邻接表 / 边列表显示

算法:
  run <algo> [start] [end]  执行算法
                            bfs dfs dijkstra bellman_ford prim kruskal
                            ford_fulkerson fleury hierholzer bipartite
                            示例: run dijkstra A C
                            示例: run ford_fulkerson S T
  result                    显示最终结果

步骤回放:
  steps                     列出全部步骤
  step <n>                  跳到第 n 步
  next, n                   下一步
  prev, p                   上一步

其他:
  vertical on|off           切换垂直显示
  clear                     清屏
  help, h, ?                显示帮助
  quit, exit, q             退出

═══════════════════════════════════════════════════════════════
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert;

    #[test]
    fn test_print_matrix() {
        let graph = Graph::undirected()
            .with_nodes(["A", "B"])
            .with_link("A", "B", 2.0);
        let matrix = convert::to_matrix(&graph).unwrap();
        let output = Printer::default().print_matrix(&graph, &matrix);
        assert!(output.contains('A'));
        assert!(output.contains('2'));
    }

    #[test]
    fn test_print_step_vertical() {
        let step = AlgorithmStep::new("访问 A")
            .current_node("A")
            .visited(vec!["A".into()]);
        let printer = Printer::new(PrintMode::Vertical);
        let output = printer.print_step(0, 3, &step);
        assert!(output.starts_with("[1/3] 访问 A"));
        assert!(output.contains("Field: Current Node"));
        assert!(output.contains("Value: A"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(0.5), "0.500");
    }
}
