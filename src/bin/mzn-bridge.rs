//! Command-line front end: solve a MiniZinc model file and print the
//! normalized result.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use mzn_bridge::solve::minizinc::MiniZincCli;
use mzn_bridge::solve::normalize;
use mzn_bridge::solve::request::SolveRequest;
use mzn_bridge::solve::stats::render_result_table;

#[derive(Debug, Parser)]
#[command(name = "mzn-bridge", about = "Solve a MiniZinc model and normalize the result")]
struct Args {
    /// Path to the MiniZinc model file.
    #[arg(required_unless_present = "list_solvers")]
    model: Option<PathBuf>,

    /// JSON file with named parameter bindings for the model.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Solver backend identifier.
    #[arg(long, default_value = "gecode")]
    solver: String,

    /// Enumerate every solution instead of stopping at the first.
    #[arg(long)]
    all_solutions: bool,

    /// Wall-clock budget in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the result as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// List the installed solver backends and exit.
    #[arg(long)]
    list_solvers: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let engine = MiniZincCli::new();

    if args.list_solvers {
        return match engine.solvers() {
            Ok(catalogue) => {
                for entry in catalogue {
                    println!("{}\t{} {}", entry.id, entry.name, entry.version);
                }
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("{error}");
                ExitCode::FAILURE
            }
        };
    }

    // clap enforces the presence of the model path unless --list-solvers.
    let Some(model_path) = args.model.as_deref() else {
        eprintln!("missing model path");
        return ExitCode::FAILURE;
    };
    let model = match std::fs::read_to_string(model_path) {
        Ok(model) => model,
        Err(error) => {
            eprintln!("cannot read {}: {error}", model_path.display());
            return ExitCode::FAILURE;
        }
    };
    let data = match args.data.as_deref().map(read_data).transpose() {
        Ok(data) => data,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let request = SolveRequest {
        model,
        data,
        solver: args.solver,
        all_solutions: args.all_solutions,
        timeout: args.timeout,
    };

    // The normalized result is the report, even when it carries an ERROR
    // status.
    let result = normalize::solve(&engine, &request);
    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(rendered) => println!("{rendered}"),
            Err(error) => {
                eprintln!("cannot render result: {error}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", render_result_table(&result));
    }
    ExitCode::SUCCESS
}

fn read_data(path: &std::path::Path) -> Result<BTreeMap<String, Value>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|error| format!("cannot read {}: {error}", path.display()))?;
    serde_json::from_str(&text)
        .map_err(|error| format!("{} is not a JSON object of parameters: {error}", path.display()))
}
