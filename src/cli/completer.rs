//! 工作台命令补全器
//!
//! 基于 rustyline 实现 Tab 补全功能

use crate::algorithm::Algorithm;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// 工作台命令列表
const COMMANDS: &[&str] = &[
    "load", "save", "import", "info", "show", "run", "result", "steps", "step", "next", "prev",
    "vertical", "clear", "help", "quit", "exit",
];

/// 子命令映射
fn sub_commands(command: &str) -> Option<Vec<&'static str>> {
    match command {
        "show" => Some(vec!["matrix", "adj", "edges"]),
        "run" => Some(Algorithm::ALL.iter().map(|a| a.name()).collect()),
        "import" => Some(vec!["directed"]),
        "vertical" => Some(vec!["on", "off"]),
        _ => None,
    }
}

fn pairs<'a>(candidates: impl Iterator<Item = &'a str>, prefix: &str) -> Vec<Pair> {
    candidates
        .filter(|c| c.starts_with(prefix))
        .map(|c| Pair {
            display: c.to_string(),
            replacement: c.to_string(),
        })
        .collect()
}

/// GraphBench CLI 补全器
#[derive(Default)]
pub struct WorkbenchCompleter;

impl WorkbenchCompleter {
    pub fn new() -> Self {
        Self
    }

    /// 返回补全起始位置与候选项
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let line_to_cursor = &line[..pos];
        let words: Vec<&str> = line_to_cursor.split_whitespace().collect();
        let at_word_end = !line_to_cursor.is_empty() && !line_to_cursor.ends_with(' ');

        match (words.as_slice(), at_word_end) {
            ([], _) => (pos, pairs(COMMANDS.iter().copied(), "")),
            ([current], true) => {
                let prefix = current.to_lowercase();
                (pos - current.len(), pairs(COMMANDS.iter().copied(), &prefix))
            }
            ([command], false) => match sub_commands(&command.to_lowercase()) {
                Some(subs) => (pos, pairs(subs.into_iter(), "")),
                None => (pos, vec![]),
            },
            ([command, current], true) => match sub_commands(&command.to_lowercase()) {
                Some(subs) => {
                    let prefix = current.to_lowercase();
                    (pos - current.len(), pairs(subs.into_iter(), &prefix))
                }
                None => (pos, vec![]),
            },
            _ => (pos, vec![]),
        }
    }
}

impl Completer for WorkbenchCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

impl Hinter for WorkbenchCompleter {
    type Hint = String;
}

impl Highlighter for WorkbenchCompleter {}

impl Validator for WorkbenchCompleter {}

impl Helper for WorkbenchCompleter {}
