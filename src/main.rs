//! cwl2argo CLI
//!
//! Transpiles a CWL CommandLineTool plus its job inputs into an Argo Workflow
//! manifest.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cwl2argo::{loader, runtime, FileLocations, Workflow};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "cwl2argo", version, about = "Transpile a CWL CommandLineTool into an Argo Workflow")]
struct Cli {
    /// CommandLineTool descriptor (`.cwl`, `.yaml`, `.yml` or `.json`)
    tool: PathBuf,

    /// Job input document
    #[arg(short, long)]
    inputs: PathBuf,

    /// File locations document for file inputs and outputs
    #[arg(short, long)]
    locations: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the manifest here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let tool = loader::read_tool(&cli.tool)
        .with_context(|| format!("failed to read tool `{}`", cli.tool.display()))?;
    let inputs = loader::read_inputs(&cli.inputs)
        .with_context(|| format!("failed to read inputs `{}`", cli.inputs.display()))?;
    let locations = match &cli.locations {
        Some(path) => loader::read_locations(path)
            .with_context(|| format!("failed to read locations `{}`", path.display()))?,
        None => FileLocations::default(),
    };
    let config = match &cli.config {
        Some(path) => runtime::load_config(path)?,
        None => runtime::TranspilerConfig::default(),
    };

    let workflow = runtime::transpile_with_config(&tool, &inputs, &locations, &config)
        .with_context(|| format!("failed to transpile `{}`", cli.tool.display()))?;

    let rendered = render(&workflow, cli.format)?;
    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write `{}`", path.display()))?,
        None => print!("{}", rendered),
    }
    Ok(())
}

fn render(workflow: &Workflow, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Yaml => serde_yaml_ng::to_string(workflow)?,
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(workflow)?;
            text.push('\n');
            text
        }
    };
    Ok(text)
}
