#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "topograph: knowledge-graph analysis for topical maps",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Inputs",
        about = "Build a graph snapshot from semantic triples",
        long_about = "Turn a JSON array of entity-attribute-value triples into a graph \
                      snapshot: one node per entity, one edge per subject/object pair.",
        after_help = "EXAMPLES:\n    # Print the snapshot\n    tg build triples.json\n\n    # Save it for later analysis\n    tg build triples.json --out graph.json"
    )]
    Build(cmd::build::BuildArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Rank vertices by betweenness centrality",
        long_about = "Compute betweenness centrality for every vertex, normalized so the \
                      most central vertex scores 1.0.",
        after_help = "EXAMPLES:\n    # Ten most central vertices\n    tg centrality graph.json --top 10\n\n    # Straight from triples, as JSON\n    tg centrality --triples triples.json --format json"
    )]
    Centrality(cmd::centrality::CentralityArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Find structural holes between clusters",
        long_about = "List disconnected clusters and clusters joined only by a weak bridge, \
                      with the vertices best placed to connect them.",
        after_help = "EXAMPLES:\n    # Default threshold (0.15 or the project config)\n    tg holes graph.json\n\n    # Include looser connections\n    tg holes graph.json --threshold 0.5"
    )]
    Holes(cmd::holes::HolesArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Score extracted entities by criticality",
        long_about = "Extract entities from semantic triples and score each one from its \
                      attribute category, topic co-occurrence, core-section membership, \
                      and bridging centrality.",
        after_help = "EXAMPLES:\n    # Rank every entity\n    tg entities triples.json --central \"Solar Panel\"\n\n    # Only critical entities, with core topics\n    tg entities triples.json --core-topic Inverter --core-topic Battery --critical-only"
    )]
    Entities(cmd::entities::EntitiesArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Summarize a graph: stats, centrality, and holes",
        after_help = "EXAMPLES:\n    # Human-readable overview\n    tg report graph.json\n\n    # Machine-readable\n    tg report graph.json --json"
    )]
    Report(cmd::report::ReportArgs),

    #[command(
        next_help_heading = "Shell",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Bash\n    tg completions bash > /etc/bash_completion.d/tg"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("TOPOGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "topograph=debug,info"
        } else if quiet {
            "error"
        } else {
            "topograph=info,warn"
        })
    });

    let format = env::var("TOPOGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

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
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::Build(ref args) => cmd::build::run_build(args, output, &project_root),
        Commands::Centrality(ref args) => {
            cmd::centrality::run_centrality(args, output, &project_root)
        }
        Commands::Holes(ref args) => cmd::holes::run_holes(args, output, &project_root),
        Commands::Entities(ref args) => cmd::entities::run_entities(args, output, &project_root),
        Commands::Report(ref args) => cmd::report::run_report(args, output, &project_root),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
