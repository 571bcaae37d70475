//! 交互式工作台
//!
//! 命令解析、Tab 补全与表格输出

pub mod commands;
pub mod completer;
pub mod printer;

pub use commands::{execute_command, CommandResult, Workbench};
pub use completer::WorkbenchCompleter;
pub use printer::{PrintMode, Printer};
