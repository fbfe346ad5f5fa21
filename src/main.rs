//! bender-overrides CLI
//!
//! Entry point for the `bender-overrides` command-line tool.

use bender_overrides::{process_label, EffectiveConfig, Error, RunReport};
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bender-overrides")]
#[command(
    about = "Pin undeclared Bender.lock dependencies into .bender.yml overrides",
    version
)]
struct Cli {
    /// Label of the input set, e.g. 20251115 (a directory under the input root)
    label: String,

    /// Path to config file (default: bender-overrides.toml if present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Directory holding one sub-directory per label
    #[arg(long)]
    input_root: Option<PathBuf>,

    /// Directory the rewritten .bender.yml is written under
    #[arg(long)]
    output_root: Option<PathBuf>,

    /// Compute and report, but do not write the output file
    #[arg(long)]
    dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cli_overrides(cli: &Cli) -> Option<serde_json::Value> {
    let mut map = serde_json::Map::new();
    if let Some(ref root) = cli.input_root {
        map.insert("input_root".to_string(), root.to_string_lossy().into());
    }
    if let Some(ref root) = cli.output_root {
        map.insert("output_root".to_string(), root.to_string_lossy().into());
    }
    (!map.is_empty()).then_some(serde_json::Value::Object(map))
}

fn fail(err: &dyn std::error::Error) -> ! {
    eprintln!("Error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
    process::exit(1);
}

fn run(cli: &Cli) -> Result<RunReport, Error> {
    let config_path = EffectiveConfig::locate(cli.config.clone());
    let effective = EffectiveConfig::build(config_path.as_deref(), cli_overrides(cli))?;
    let outcome = process_label(&cli.label, &effective, cli.dry_run)?;
    Ok(outcome.report)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let report = match run(&cli) {
        Ok(r) => r,
        Err(e) => fail(&e),
    };

    if cli.json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => fail(&e),
        }
    } else {
        println!("{}", report.to_human());
    }
}
