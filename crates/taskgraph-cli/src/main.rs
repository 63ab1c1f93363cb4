#![forbid(unsafe_code)]

mod cmd;
mod config;
mod input;
mod output;
mod report;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "tg",
    author,
    version,
    about = "taskgraph: dependency-graph analysis for task scheduling",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file (defaults to ./taskgraph.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        OutputMode::resolve(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Analyze a graph document",
        long_about = "Find strongly connected components, order the condensation, compute \
                      shortest paths from the source and the critical path, and write CSV reports.",
        after_help = "EXAMPLES:\n    # Analyze a dataset\n    tg analyze data/small/small_dag_1.json\n\n    # Override the source node and skip reports\n    tg analyze tasks.json --source 3 --no-reports\n\n    # Emit machine-readable output\n    tg analyze tasks.json --format json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Datasets",
        about = "Generate synthetic datasets",
        long_about = "Write deterministic small, medium and large DAG, cyclic and mixed datasets.",
        after_help = "EXAMPLES:\n    # Generate all nine datasets into ./data\n    tg generate\n\n    # Only the small tier, with another seed\n    tg generate --tier small --seed 7"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    tg completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TASKGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "taskgraph=debug,tg=debug,info"
        } else {
            "taskgraph=info,tg=info,warn"
        })
    });

    let format = env::var("TASKGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let output = cli.output_mode();
    let config = config::load_config(cli.config.as_deref(), &project_root)?;

    match cli.command {
        Commands::Analyze(ref args) => {
            cmd::analyze::run_analyze(args, &config, output, &project_root)
        }
        Commands::Generate(ref args) => {
            cmd::generate::run_generate(args, &config, output, &project_root)
        }
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
