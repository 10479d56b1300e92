mod fmt;
mod render;
mod sources;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};

use creditcalc_core::{fact_paths, merge};
use creditcalc_eval::{
    evaluate, EstimateInput, FactGraph, FilingStatus, GraphLoader, ScriptedGraph, ScriptedLoader,
    TaxIdKind,
};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Credit Calculator toolchain.
#[derive(Parser)]
#[command(name = "creditcalc", version, about = "Tax credit eligibility estimator")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge fact dictionary modules into one complete dictionary
    Merge {
        /// Module documents: file paths or http(s) URLs, first is the base
        #[arg(required = true)]
        sources: Vec<String>,
        /// Write the combined dictionary to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Estimate credit eligibility from form answers
    Estimate(EstimateArgs),
}

#[derive(Args)]
struct EstimateArgs {
    /// Scripted engine results: JSON object mapping fact paths to raw results
    #[arg(long)]
    results: PathBuf,

    /// Filing state code, e.g. CO or MD
    #[arg(long)]
    state: Option<String>,

    /// Filing status, e.g. Single or MarriedFilingJointly
    #[arg(long)]
    filing_status: Option<String>,

    /// Primary filer tax ID kind: SSN, ITIN or Neither
    #[arg(long)]
    primary_id: Option<String>,

    /// Secondary filer tax ID kind (honored for joint filers only)
    #[arg(long)]
    secondary_id: Option<String>,

    /// Number of qualifying children
    #[arg(long)]
    children: Option<u32>,

    /// Print the serialized fact state after evaluation
    #[arg(long)]
    show_graph: bool,

    /// Dictionary documents to merge and load before evaluating
    sources: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Merge { sources, out } => {
            run_merge(sources, out.as_deref(), cli.output, cli.quiet)
        }
        Commands::Estimate(args) => run_estimate(args, cli.output, cli.quiet),
    };
    if let Err(message) = result {
        eprintln!("error: {}", message);
        process::exit(1);
    }
}

fn run_merge(
    source_args: &[String],
    out: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), String> {
    let docs = sources::fetch_all(source_args)?;
    let refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    let combined = merge(&refs).map_err(|e| e.to_string())?;
    let entries = fact_paths(&combined).map_err(|e| e.to_string())?.len();

    match out {
        Some(path) => fs::write(path, &combined)
            .map_err(|e| format!("could not write '{}': {}", path.display(), e))?,
        None => println!("{}", combined),
    }
    if output == OutputFormat::Text && !quiet {
        eprintln!(
            "merged {} documents, {} fact entries",
            source_args.len(),
            entries
        );
    }
    Ok(())
}

fn run_estimate(args: &EstimateArgs, output: OutputFormat, quiet: bool) -> Result<(), String> {
    // Compose the dictionary first when rule modules are given -- a
    // malformed module fails the run before any engine interaction.
    let combined = if args.sources.is_empty() {
        None
    } else {
        let docs = sources::fetch_all(&args.sources)?;
        let refs: Vec<&str> = docs.iter().map(String::as_str).collect();
        Some(merge(&refs).map_err(|e| e.to_string())?)
    };

    let script = fs::read_to_string(&args.results)
        .map_err(|e| format!("could not read '{}': {}", args.results.display(), e))?;
    let script: serde_json::Value = serde_json::from_str(&script)
        .map_err(|e| format!("could not parse results '{}': {}", args.results.display(), e))?;

    let mut graph: Box<dyn FactGraph> = match &combined {
        Some(xml) => ScriptedLoader::new(script)
            .load(xml)
            .map_err(|e| e.to_string())?,
        None => Box::new(ScriptedGraph::from_json(&script).map_err(|e| e.to_string())?),
    };

    let input = EstimateInput {
        filing_state: args.state.clone(),
        filing_status: parse_opt::<FilingStatus>(args.filing_status.as_deref())?,
        primary_tax_id: parse_opt::<TaxIdKind>(args.primary_id.as_deref())?,
        secondary_tax_id: parse_opt::<TaxIdKind>(args.secondary_id.as_deref())?,
        num_qualifying_children: args.children,
    };

    let estimate = evaluate(graph.as_mut(), &input).map_err(|e| e.to_string())?;

    match output {
        OutputFormat::Text => print!("{}", render::render_text(&estimate, quiet)),
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&estimate.to_json_value())
                .map_err(|e| e.to_string())?;
            println!("{}", rendered);
        }
    }
    if args.show_graph {
        println!("{}", graph.to_json());
    }
    Ok(())
}

fn parse_opt<T: FromStr<Err = String>>(value: Option<&str>) -> Result<Option<T>, String> {
    value.map(T::from_str).transpose()
}
