//! Cube Analyst CLI - Inspect a semantic layer the way the agent sees it
//!
//! Usage:
//!   cube-analyst [--file <layer.txt>] cubes
//!   cube-analyst [--file <layer.txt>] cube <name>
//!   cube-analyst [--file <layer.txt>] search <term> [--cube <name>] [--kind measure|dimension]
//!   cube-analyst [--file <layer.txt>] measures [cube]
//!   cube-analyst [--file <layer.txt>] dimensions [cube]
//!   cube-analyst [--file <layer.txt>] validate
//!   cube-analyst tools
//!   cube-analyst [--config <cube-analyst.toml>] config
//!   cube-analyst [--file <layer.txt>] repl
//!
//! Examples:
//!   cube-analyst --file assets/semantic_layer.txt cube Orders
//!   cube-analyst search net_sales --kind measure

use clap::{Parser, Subcommand, ValueEnum};
use cube_analyst::config::Settings;
use cube_analyst::tools;
use cube_analyst::{FieldKind, SearchFilter, SemanticIndex};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cube-analyst")]
#[command(about = "Cube Analyst - Semantic layer inspector for BI agents")]
#[command(version)]
struct Cli {
    /// Path to the semantic layer file (overrides the config file)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Path to a cube-analyst.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Layer(LayerCommand),

    /// Print the tool definitions exposed to the agent
    Tools,

    /// Print the effective configuration
    Config,
}

/// Commands that need a loaded semantic layer.
#[derive(Subcommand)]
enum LayerCommand {
    /// List all cubes
    Cubes,

    /// Show every measure and dimension of a cube
    Cube {
        /// Exact cube name (e.g. Orders)
        name: String,
    },

    /// Search cubes, measures and dimensions
    Search {
        /// Case-insensitive search term
        term: String,

        /// Only search this cube
        #[arg(long)]
        cube: Option<String>,

        /// Only return fields of this kind
        #[arg(long)]
        kind: Option<KindArg>,
    },

    /// List measures, optionally for one cube
    Measures {
        /// Cube name
        cube: Option<String>,
    },

    /// List dimensions, optionally for one cube
    Dimensions {
        /// Cube name
        cube: Option<String>,
    },

    /// Load the semantic layer and report skipped lines
    Validate,

    /// Interactive mode
    Repl,
}

#[derive(Clone, ValueEnum)]
enum KindArg {
    Measure,
    Dimension,
}

impl From<KindArg> for FieldKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Measure => FieldKind::Measure,
            KindArg::Dimension => FieldKind::Dimension,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging.level);

    match cli.command {
        Commands::Tools => print_json(&tools::tool_definitions()),
        Commands::Config => cmd_config(&settings, cli.file.as_deref()),
        Commands::Layer(command) => run_layer_command(command, &settings, cli.file.as_deref()),
    }
}

fn resolve_path(settings: &Settings, file: Option<&Path>) -> Option<PathBuf> {
    match settings.semantic_layer_path(file) {
        Ok(path) => Some(path),
        Err(e) => {
            eprintln!("Error resolving semantic layer path: {}", e);
            None
        }
    }
}

fn cmd_config(settings: &Settings, file: Option<&Path>) -> ExitCode {
    let Some(path) = resolve_path(settings, file) else {
        return ExitCode::FAILURE;
    };

    print_json(&serde_json::json!({
        "settings": settings,
        "semantic_layer_path": path,
        "api_key_set": settings.agent.api_key().is_ok(),
    }))
}

fn run_layer_command(command: LayerCommand, settings: &Settings, file: Option<&Path>) -> ExitCode {
    let Some(path) = resolve_path(settings, file) else {
        return ExitCode::FAILURE;
    };

    let index = SemanticIndex::new();
    let report = match index.load(&path) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Check semantic_layer.file_path in the config file or pass --file.");
            return ExitCode::FAILURE;
        }
    };

    let cubes = index.catalog().map(|c| c.cube_count()).unwrap_or_default();
    tracing::info!(
        path = %path.display(),
        cubes,
        records = report.loaded_count,
        skipped = report.skipped_lines.len(),
        "loaded semantic layer"
    );
    for skipped in &report.skipped_lines {
        tracing::warn!(path = %path.display(), "{}", skipped);
    }

    match command {
        LayerCommand::Cubes => print_result(index.list_cubes()),
        LayerCommand::Cube { name } => print_result(index.get_cube(&name)),
        LayerCommand::Search { term, cube, kind } => {
            let filter = SearchFilter {
                cube,
                kind: kind.map(FieldKind::from),
            };
            print_result(index.search_with(&term, &filter))
        }
        LayerCommand::Measures { cube } => print_result(index.list_measures(cube.as_deref())),
        LayerCommand::Dimensions { cube } => print_result(index.list_dimensions(cube.as_deref())),
        LayerCommand::Validate => cmd_validate(&path, &report),
        LayerCommand::Repl => match cube_analyst::repl::run(&index) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_validate(path: &Path, report: &cube_analyst::LoadReport) -> ExitCode {
    if report.has_skipped() {
        eprintln!("Validation errors in {}:", path.display());
        for skipped in &report.skipped_lines {
            eprintln!("  {}", skipped);
        }
        let _ = print_json(report);
        return ExitCode::FAILURE;
    }

    println!("OK: {} ({})", path.display(), report);
    ExitCode::SUCCESS
}

fn print_result<T: Serialize, E: std::fmt::Display>(result: Result<T, E>) -> ExitCode {
    match result {
        Ok(value) => print_json(&value),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error encoding output: {}", e);
            ExitCode::FAILURE
        }
    }
}
