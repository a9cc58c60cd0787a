//! Interactive inspector for a loaded semantic layer.
//!
//! Each line is a short command that maps onto a tool call; results are
//! printed as pretty JSON.

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::index::SemanticIndex;
use crate::tools;

const HELP: &str = "Available: cubes, cube <name>, search <term>, measures [cube], \
                    dimensions [cube], reload, help, quit";

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Cubes,
    Cube(String),
    Search(String),
    Measures(Option<String>),
    Dimensions(Option<String>),
    Reload,
    Help,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse one input line. Returns `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let command = parts.next()?.to_lowercase();
        let rest: Vec<&str> = parts.collect();

        let cmd = match (command.as_str(), rest.as_slice()) {
            ("quit" | "exit" | "q", _) => ReplCommand::Quit,
            ("help" | "?", _) => ReplCommand::Help,
            ("cubes", _) => ReplCommand::Cubes,
            ("cube", [name, ..]) => ReplCommand::Cube(name.to_string()),
            ("search", [_, ..]) => ReplCommand::Search(rest.join(" ")),
            ("measures", args) => ReplCommand::Measures(args.first().map(|s| s.to_string())),
            ("dimensions", args) => ReplCommand::Dimensions(args.first().map(|s| s.to_string())),
            ("reload", _) => ReplCommand::Reload,
            _ => ReplCommand::Unknown(line.trim().to_string()),
        };
        Some(cmd)
    }

    /// The tool call this command corresponds to, if any.
    pub fn tool_call(&self) -> Option<(&'static str, Value)> {
        match self {
            ReplCommand::Cubes => Some((tools::LIST_CUBES, Value::Null)),
            ReplCommand::Cube(name) => Some((tools::GET_CUBE, json!({ "cube": name }))),
            ReplCommand::Search(term) => Some((tools::SEARCH, json!({ "term": term }))),
            ReplCommand::Measures(cube) => Some((tools::LIST_MEASURES, json!({ "cube": cube }))),
            ReplCommand::Dimensions(cube) => {
                Some((tools::LIST_DIMENSIONS, json!({ "cube": cube })))
            }
            _ => None,
        }
    }
}

fn history_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cube_analyst_history")
}

/// Run the interactive loop until `quit` or end of input.
pub fn run(index: &SemanticIndex) -> Result<(), ReadlineError> {
    let rl_config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();
    let mut rl: Editor<(), DefaultHistory> = Editor::with_config(rl_config)?;

    let hist_path = history_path();
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    println!("=== Cube Analyst Interactive Mode ===");
    println!("Examples: cubes, cube Orders, search sales, measures Goods, dimensions Buyer");
    println!("Type 'quit' or 'exit' to end.\n");

    loop {
        let line = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e),
        };

        let Some(command) = ReplCommand::parse(&line) else {
            continue;
        };

        match &command {
            ReplCommand::Quit => break,
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Reload => match index.reload() {
                Ok(report) => println!("{}", report),
                Err(e) => println!("Reload failed: {}", e),
            },
            ReplCommand::Unknown(input) => println!("Unknown command '{}'. {}", input, HELP),
            _ => {
                if let Some((tool, args)) = command.tool_call() {
                    println!("{}", tools::call(index, tool, &args));
                }
            }
        }
    }

    let _ = rl.save_history(&hist_path);
    Ok(())
}
