//! 工作台命令处理
//!
//! 解析一行输入并作用于 [`Workbench`]：读写图、执行算法、回放步骤

use crate::algorithm::Algorithm;
use crate::cli::printer::{PrintMode, Printer};
use crate::convert;
use crate::engine::{AlgorithmRequest, Engine};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::import;
use crate::trace::AlgorithmResult;

/// 命令执行结果
#[derive(Debug)]
pub enum CommandResult {
    /// 继续运行
    Continue,
    /// 退出程序
    Exit,
    /// 显示消息
    Message(String),
    /// 错误
    Error(String),
}

impl From<Result<String>> for CommandResult {
    fn from(outcome: Result<String>) -> Self {
        match outcome {
            Ok(message) => CommandResult::Message(message),
            Err(e) => CommandResult::Error(format!("{}: {}", e.kind(), e)),
        }
    }
}

/// 最近一次运行
struct LastRun {
    algorithm: Algorithm,
    result: AlgorithmResult,
    cursor: usize,
}

/// 工作台状态
///
/// 运行结果是执行时的快照，之后重新加载图不会改变已记录的步骤。
pub struct Workbench {
    graph: Option<Graph>,
    engine: Engine,
    printer: Printer,
    last_run: Option<LastRun>,
}

impl Workbench {
    pub fn new(engine: Engine) -> Self {
        Self {
            graph: None,
            engine,
            printer: Printer::default(),
            last_run: None,
        }
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    pub fn set_graph(&mut self, graph: Graph) {
        self.graph = Some(graph);
    }

    pub fn last_result(&self) -> Option<&AlgorithmResult> {
        self.last_run.as_ref().map(|run| &run.result)
    }

    /// 当前步骤下标（从 0 开始）
    pub fn cursor(&self) -> Option<usize> {
        self.last_run.as_ref().map(|run| run.cursor)
    }

    fn require_graph(&self) -> Result<&Graph> {
        self.graph
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("尚未加载图，请先执行 load 或 import".to_string()))
    }

    fn require_run(&self) -> Result<&LastRun> {
        self.last_run
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("尚未执行算法，请先执行 run".to_string()))
    }

    fn load(&mut self, path: &str) -> Result<String> {
        let graph = import::load_graph(path)?;
        let message = format!(
            "已加载 {} 个节点、{} 条边 ({})",
            graph.node_count(),
            graph.link_count(),
            if graph.is_directed { "有向" } else { "无向" }
        );
        self.graph = Some(graph);
        Ok(message)
    }

    fn save(&self, path: &str) -> Result<String> {
        import::save_graph(self.require_graph()?, path)?;
        Ok(format!("已保存到 {}", path))
    }

    fn import(&mut self, path: &str, is_directed: bool) -> Result<String> {
        let (graph, stats) = import::import_edges_csv(path, is_directed)?;
        self.graph = Some(graph);
        Ok(format!(
            "导入完成: {} 个节点, {} 条边, {} 条错误, 耗时 {}ms",
            stats.nodes_imported, stats.links_imported, stats.errors, stats.duration_ms
        ))
    }

    fn show(&self, what: &str) -> Result<String> {
        let graph = self.require_graph()?;
        match what {
            "matrix" => Ok(self.printer.print_matrix(graph, &convert::to_matrix(graph)?)),
            "adj" | "adj_list" => Ok(self.printer.print_adj_list(&convert::to_adj_list(graph)?)),
            "edges" | "edge_list" => Ok(self.printer.print_edge_list(&convert::to_edge_list(graph)?)),
            _ => Err(Error::InvalidInput(
                "用法: show matrix|adj|edges".to_string(),
            )),
        }
    }

    fn run(&mut self, args: &[&str]) -> Result<String> {
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| Error::InvalidInput("用法: run <algo> [start] [end]".to_string()))?;
        let algorithm: Algorithm = name.parse()?;

        let mut request = AlgorithmRequest::new(algorithm, self.require_graph()?.clone());
        if let Some(start) = rest.first() {
            request = request.with_start(*start);
        }
        if let Some(end) = rest.get(1) {
            request = request.with_end(*end);
        }

        let result = self.engine.run(&request)?;
        let mut output = self.printer.print_result(&result);
        if let Some(first) = result.step(0) {
            output.push_str(&self.printer.print_step(0, result.step_count(), first));
        }
        self.last_run = Some(LastRun {
            algorithm,
            result,
            cursor: 0,
        });
        Ok(output)
    }

    fn result(&self) -> Result<String> {
        let run = self.require_run()?;
        let header = format!("{}\n", run.algorithm);
        Ok(header + &self.printer.print_result(&run.result))
    }

    fn steps(&self) -> Result<String> {
        let run = self.require_run()?;
        Ok(self.printer.print_step_list(&run.result))
    }

    /// 移动步骤游标并显示该步骤
    fn seek(&mut self, target: impl FnOnce(usize, usize) -> Option<usize>) -> Result<String> {
        let printer = &self.printer;
        let run = self
            .last_run
            .as_mut()
            .ok_or_else(|| Error::InvalidInput("尚未执行算法，请先执行 run".to_string()))?;
        let total = run.result.step_count();
        let index = target(run.cursor, total)
            .filter(|&i| i < total)
            .ok_or_else(|| Error::InvalidInput(format!("步骤超出范围 (共 {} 步)", total)))?;
        run.cursor = index;
        match run.result.step(index) {
            Some(step) => Ok(printer.print_step(index, total, step)),
            None => Err(Error::NotFound(format!("步骤 {}", index + 1))),
        }
    }

    fn set_vertical(&mut self, arg: &str) -> Result<String> {
        let mode = match arg {
            "on" => PrintMode::Vertical,
            "off" => PrintMode::Table,
            _ => return Err(Error::InvalidInput("用法: vertical on|off".to_string())),
        };
        self.printer.set_mode(mode);
        Ok(format!("垂直显示: {}", arg))
    }
}

/// 解析并执行一行命令
pub fn execute_command(input: &str, bench: &mut Workbench) -> CommandResult {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some((cmd, args)) = parts.split_first() else {
        return CommandResult::Continue;
    };

    match cmd.to_lowercase().as_str() {
        "help" | "h" | "?" => CommandResult::Message(Printer::print_help()),

        "quit" | "q" | "exit" => CommandResult::Exit,

        "clear" => {
            print!("\x1B[2J\x1B[1;1H");
            CommandResult::Continue
        }

        "load" => match args.first() {
            Some(path) => bench.load(path).into(),
            None => CommandResult::Error("用法: load <file.json>".to_string()),
        },

        "save" => match args.first() {
            Some(path) => bench.save(path).into(),
            None => CommandResult::Error("用法: save <file.json>".to_string()),
        },

        "import" => match args {
            [path] => bench.import(path, false).into(),
            [path, flag] if flag.eq_ignore_ascii_case("directed") => {
                bench.import(path, true).into()
            }
            _ => CommandResult::Error("用法: import <file.csv> [directed]".to_string()),
        },

        "info" => bench
            .require_graph()
            .map(|graph| bench.printer.print_graph_info(graph))
            .into(),

        "show" => bench
            .show(&args.first().map(|s| s.to_lowercase()).unwrap_or_default())
            .into(),

        "run" => bench.run(args).into(),

        "result" => bench.result().into(),

        "steps" => bench.steps().into(),

        "step" => match args.first().map(|s| s.parse::<usize>()) {
            Some(Ok(n)) if n >= 1 => bench.seek(|_, _| Some(n - 1)).into(),
            _ => CommandResult::Error("用法: step <n> (从 1 开始)".to_string()),
        },

        "next" | "n" => bench.seek(|cursor, _| Some(cursor + 1)).into(),

        "prev" | "p" => bench.seek(|cursor, _| cursor.checked_sub(1)).into(),

        "vertical" => bench
            .set_vertical(&args.first().map(|s| s.to_lowercase()).unwrap_or_default())
            .into(),

        other => CommandResult::Error(format!("未知命令: {}，输入 help 查看帮助", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn bench_with_diamond() -> Workbench {
        let mut bench = Workbench::new(Engine::default());
        bench.set_graph(
            Graph::directed()
                .with_nodes(["S", "A", "B", "T"])
                .with_capacity_link("S", "A", 2.0)
                .with_capacity_link("S", "B", 2.0)
                .with_capacity_link("A", "T", 2.0)
                .with_capacity_link("B", "T", 2.0),
        );
        bench
    }

    fn message(result: CommandResult) -> String {
        match result {
            CommandResult::Message(m) => m,
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[test]
    fn test_requires_graph() {
        let mut bench = Workbench::new(Engine::default());
        assert!(matches!(
            execute_command("info", &mut bench),
            CommandResult::Error(_)
        ));
        assert!(matches!(
            execute_command("run bfs A", &mut bench),
            CommandResult::Error(_)
        ));
    }

    #[test]
    fn test_run_and_step_through() {
        let mut bench = bench_with_diamond();
        let output = message(execute_command("run ford_fulkerson S T", &mut bench));
        assert!(output.contains("Max Flow"));
        assert_eq!(bench.cursor(), Some(0));

        let total = bench.last_result().unwrap().step_count();
        assert_eq!(total, 4);

        message(execute_command("next", &mut bench));
        assert_eq!(bench.cursor(), Some(1));
        message(execute_command("step 4", &mut bench));
        assert_eq!(bench.cursor(), Some(3));
        assert!(matches!(
            execute_command("next", &mut bench),
            CommandResult::Error(_)
        ));
        assert_eq!(bench.cursor(), Some(3));
        message(execute_command("prev", &mut bench));
        assert_eq!(bench.cursor(), Some(2));
        assert!(matches!(
            execute_command("step 0", &mut bench),
            CommandResult::Error(_)
        ));
    }

    #[test]
    fn test_rejected_run_keeps_previous() {
        let mut bench = bench_with_diamond();
        message(execute_command("run bfs S", &mut bench));
        match execute_command("run dijkstra Q", &mut bench) {
            CommandResult::Error(e) => assert!(e.starts_with("MissingEndpoints")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(bench.last_result().unwrap().visited.is_some());
    }

    #[test]
    fn test_trace_survives_reload() {
        let mut bench = bench_with_diamond();
        message(execute_command("run bfs S", &mut bench));
        let before = bench.last_result().unwrap().clone();

        bench.set_graph(Graph::undirected().with_nodes(["X"]));
        message(execute_command("steps", &mut bench));
        assert_eq!(bench.last_result().unwrap(), &before);
    }

    #[test]
    fn test_save_load_and_import() {
        let mut bench = bench_with_diamond();
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();
        message(execute_command(&format!("save {}", path), &mut bench));

        let mut other = Workbench::new(Engine::default());
        message(execute_command(&format!("load {}", path), &mut other));
        assert_eq!(other.graph(), bench.graph());

        let mut csv = NamedTempFile::new().unwrap();
        writeln!(csv, "source,target,weight").unwrap();
        writeln!(csv, "A,B,1").unwrap();
        let csv_path = csv.path().to_string_lossy().to_string();
        message(execute_command(&format!("import {} directed", csv_path), &mut other));
        assert!(other.graph().unwrap().is_directed);
        assert_eq!(other.graph().unwrap().link_count(), 1);
    }

    #[test]
    fn test_show_and_unknown() {
        let mut bench = bench_with_diamond();
        message(execute_command("show edges", &mut bench));
        message(execute_command("show matrix", &mut bench));
        assert!(matches!(
            execute_command("show nothing", &mut bench),
            CommandResult::Error(_)
        ));
        assert!(matches!(
            execute_command("frobnicate", &mut bench),
            CommandResult::Error(_)
        ));
        assert!(matches!(execute_command("   ", &mut bench), CommandResult::Continue));
        assert!(matches!(execute_command("quit", &mut bench), CommandResult::Exit));
    }
}
